//! Bulk catalog operations
//!
//! Ownership changes and deletions over many tables or a whole schema.
//! Unlike the job dispatcher, these operations tolerate per-item failures:
//! each table gets its own outcome record and the batch always runs to the
//! end. Every operation has a dry-run mode that reports the plan without
//! issuing a single mutating call.

use regex::Regex;
use tracing::warn;

use lakeops_core::domain::catalog::{
    OwnerChangeOutcome, SchemaDeleteReport, TableDeleteOutcome, TableInfo,
};

use crate::adapter::CatalogOps;
use crate::error::{ClientError, Result};

/// Split `catalog.schema` into its two components.
pub fn parse_schema_full_name(schema_full_name: &str) -> Result<(String, String)> {
    let trimmed = schema_full_name.trim();
    match trimmed.split_once('.') {
        Some((catalog, schema))
            if !catalog.is_empty() && !schema.is_empty() && !schema.contains('.') =>
        {
            Ok((catalog.to_string(), schema.to_string()))
        }
        _ => Err(ClientError::InvalidRequest(format!(
            "schema must be in the form catalog.schema, got '{schema_full_name}'"
        ))),
    }
}

/// Filter tables by a regex over their full names; `None` keeps all.
pub fn filter_tables(tables: Vec<TableInfo>, name_regex: Option<&str>) -> Result<Vec<TableInfo>> {
    let Some(pattern) = name_regex else {
        return Ok(tables);
    };
    let regex = Regex::new(pattern)
        .map_err(|e| ClientError::InvalidRequest(format!("invalid table filter: {e}")))?;
    Ok(tables
        .into_iter()
        .filter(|t| regex.is_match(&t.full_name))
        .collect())
}

/// Set the owner of each named table, collecting one outcome per table.
///
/// Failures are captured in the outcome and never abort the batch.
pub async fn set_tables_owner<A>(
    api: &A,
    table_full_names: &[String],
    owner: &str,
    dry_run: bool,
) -> Vec<OwnerChangeOutcome>
where
    A: CatalogOps + ?Sized,
{
    let mut results = Vec::with_capacity(table_full_names.len());

    for full_name in table_full_names {
        if dry_run {
            results.push(OwnerChangeOutcome {
                full_name: full_name.clone(),
                new_owner: owner.to_string(),
                ok: true,
                error: None,
            });
            continue;
        }

        let outcome = match api.set_table_owner(full_name, owner).await {
            Ok(()) => OwnerChangeOutcome {
                full_name: full_name.clone(),
                new_owner: owner.to_string(),
                ok: true,
                error: None,
            },
            Err(e) => {
                warn!(table = %full_name, error = %e, "owner change failed");
                OwnerChangeOutcome {
                    full_name: full_name.clone(),
                    new_owner: owner.to_string(),
                    ok: false,
                    error: Some(e.to_string()),
                }
            }
        };
        results.push(outcome);
    }

    results
}

/// Delete each named table, taking ownership first.
///
/// For every table: set its owner to the calling user, then drop it. A
/// failing table is recorded and the batch continues. Resolving the
/// calling user is the only step whose failure aborts the whole call.
pub async fn delete_tables<A>(
    api: &A,
    table_full_names: &[String],
    dry_run: bool,
) -> Result<Vec<TableDeleteOutcome>>
where
    A: CatalogOps + ?Sized,
{
    let owner = if dry_run {
        None
    } else {
        Some(api.current_username().await?)
    };

    let mut results = Vec::with_capacity(table_full_names.len());

    for full_name in table_full_names {
        let Some(owner) = owner.as_deref() else {
            results.push(TableDeleteOutcome {
                table: full_name.clone(),
                owner_set: false,
                deleted: false,
                error: None,
            });
            continue;
        };

        let outcome = delete_one_table(api, full_name, owner).await;
        if let Some(error) = &outcome.error {
            warn!(table = %full_name, %error, "table delete failed");
        }
        results.push(outcome);
    }

    Ok(results)
}

async fn delete_one_table<A>(api: &A, full_name: &str, owner: &str) -> TableDeleteOutcome
where
    A: CatalogOps + ?Sized,
{
    if let Err(e) = api.set_table_owner(full_name, owner).await {
        return TableDeleteOutcome {
            table: full_name.to_string(),
            owner_set: false,
            deleted: false,
            error: Some(e.to_string()),
        };
    }

    match api.delete_table(full_name).await {
        Ok(()) => TableDeleteOutcome {
            table: full_name.to_string(),
            owner_set: true,
            deleted: true,
            error: None,
        },
        Err(e) => TableDeleteOutcome {
            table: full_name.to_string(),
            owner_set: true,
            deleted: false,
            error: Some(e.to_string()),
        },
    }
}

/// Delete a schema together with its tables.
///
/// Takes ownership of the schema, deletes the (optionally regex-filtered)
/// tables inside it, then drops the schema itself. Dry-run reports the
/// plan and performs no mutating call.
pub async fn delete_schema_with_tables<A>(
    api: &A,
    schema_full_name: &str,
    table_name_regex: Option<&str>,
    force: bool,
    dry_run: bool,
) -> Result<SchemaDeleteReport>
where
    A: CatalogOps + ?Sized,
{
    let (catalog, schema) = parse_schema_full_name(schema_full_name)?;
    let owner = api.current_username().await?;

    let tables = api.list_tables(&catalog, &schema).await?;
    let tables = filter_tables(tables, table_name_regex)?;
    let table_names: Vec<String> = tables.into_iter().map(|t| t.full_name).collect();

    if dry_run {
        return Ok(SchemaDeleteReport {
            schema: schema_full_name.to_string(),
            owner: Some(owner),
            tables: table_names,
            table_results: Vec::new(),
            schema_deleted: false,
        });
    }

    api.set_schema_owner(schema_full_name, &owner).await?;
    let table_results = delete_tables(api, &table_names, false).await?;
    api.delete_schema(schema_full_name, force).await?;

    Ok(SchemaDeleteReport {
        schema: schema_full_name.to_string(),
        owner: Some(owner),
        tables: table_names,
        table_results,
        schema_deleted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lakeops_core::domain::catalog::{CatalogInfo, SchemaInfo};
    use std::sync::Mutex;

    /// Records every mutating call; fails on request.
    struct RecordingCatalog {
        mutations: Mutex<Vec<String>>,
        fail_tables: Vec<String>,
    }

    impl RecordingCatalog {
        fn new() -> Self {
            Self {
                mutations: Mutex::new(Vec::new()),
                fail_tables: Vec::new(),
            }
        }

        fn failing_on(table: &str) -> Self {
            Self {
                mutations: Mutex::new(Vec::new()),
                fail_tables: vec![table.to_string()],
            }
        }

        fn mutations(&self) -> Vec<String> {
            self.mutations.lock().unwrap().clone()
        }

        fn record(&self, entry: String) {
            self.mutations.lock().unwrap().push(entry);
        }
    }

    #[async_trait]
    impl CatalogOps for RecordingCatalog {
        async fn current_username(&self) -> Result<String> {
            Ok("ops@example.com".to_string())
        }

        async fn list_catalogs(&self) -> Result<Vec<CatalogInfo>> {
            Ok(Vec::new())
        }

        async fn list_schemas(&self, _catalog: &str) -> Result<Vec<SchemaInfo>> {
            Ok(Vec::new())
        }

        async fn list_tables(&self, catalog: &str, schema: &str) -> Result<Vec<TableInfo>> {
            Ok(vec![
                TableInfo {
                    full_name: format!("{catalog}.{schema}.orders"),
                    owner: None,
                    table_type: Some("MANAGED".to_string()),
                },
                TableInfo {
                    full_name: format!("{catalog}.{schema}.orders_staging"),
                    owner: None,
                    table_type: Some("MANAGED".to_string()),
                },
            ])
        }

        async fn set_table_owner(&self, full_name: &str, owner: &str) -> Result<()> {
            if self.fail_tables.iter().any(|t| t == full_name) {
                return Err(ClientError::api_error(403, "permission denied"));
            }
            self.record(format!("chown {full_name} -> {owner}"));
            Ok(())
        }

        async fn delete_table(&self, full_name: &str) -> Result<()> {
            self.record(format!("drop table {full_name}"));
            Ok(())
        }

        async fn set_schema_owner(&self, full_name: &str, owner: &str) -> Result<()> {
            self.record(format!("chown schema {full_name} -> {owner}"));
            Ok(())
        }

        async fn delete_schema(&self, full_name: &str, force: bool) -> Result<()> {
            self.record(format!("drop schema {full_name} force={force}"));
            Ok(())
        }
    }

    fn table(full_name: &str) -> TableInfo {
        TableInfo {
            full_name: full_name.to_string(),
            owner: None,
            table_type: None,
        }
    }

    #[test]
    fn parses_well_formed_schema_names() {
        assert_eq!(
            parse_schema_full_name("main.analytics").unwrap(),
            ("main".to_string(), "analytics".to_string())
        );
    }

    #[test]
    fn rejects_malformed_schema_names() {
        for bad in ["main", "main.analytics.orders", ".analytics", "main.", ""] {
            assert!(
                parse_schema_full_name(bad).is_err(),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn filter_tables_keeps_all_without_pattern() {
        let tables = vec![table("a.b.one"), table("a.b.two")];
        assert_eq!(filter_tables(tables.clone(), None).unwrap(), tables);
    }

    #[test]
    fn filter_tables_applies_regex() {
        let tables = vec![table("a.b.orders"), table("a.b.orders_staging")];
        let kept = filter_tables(tables, Some("staging$")).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].full_name, "a.b.orders_staging");
    }

    #[test]
    fn filter_tables_rejects_invalid_regex() {
        assert!(filter_tables(Vec::new(), Some("(")).is_err());
    }

    #[tokio::test]
    async fn delete_tables_captures_per_table_errors() {
        let api = RecordingCatalog::failing_on("a.b.locked");
        let names = vec!["a.b.locked".to_string(), "a.b.open".to_string()];

        let outcomes = delete_tables(&api, &names, false).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].deleted);
        assert!(outcomes[0].error.is_some());
        assert!(outcomes[1].deleted);
        // The failing table never blocked the next one.
        assert_eq!(
            api.mutations(),
            vec![
                "chown a.b.open -> ops@example.com".to_string(),
                "drop table a.b.open".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn dry_run_performs_no_mutating_call() {
        let api = RecordingCatalog::new();
        let names = vec!["a.b.orders".to_string()];

        let outcomes = delete_tables(&api, &names, true).await.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].deleted);

        let chowns = set_tables_owner(&api, &names, "someone", true).await;
        assert!(chowns[0].ok);

        let report = delete_schema_with_tables(&api, "a.b", None, false, true)
            .await
            .unwrap();
        assert!(!report.schema_deleted);
        assert_eq!(report.tables.len(), 2);

        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn delete_schema_sweeps_tables_then_schema() {
        let api = RecordingCatalog::new();

        let report = delete_schema_with_tables(&api, "main.analytics", None, true, false)
            .await
            .unwrap();

        assert!(report.schema_deleted);
        assert_eq!(report.table_results.len(), 2);
        let mutations = api.mutations();
        assert_eq!(
            mutations.first().map(String::as_str),
            Some("chown schema main.analytics -> ops@example.com")
        );
        assert_eq!(
            mutations.last().map(String::as_str),
            Some("drop schema main.analytics force=true")
        );
    }

    #[tokio::test]
    async fn delete_schema_honors_table_filter() {
        let api = RecordingCatalog::new();

        let report = delete_schema_with_tables(&api, "main.analytics", Some("staging$"), false, true)
            .await
            .unwrap();

        assert_eq!(report.tables, vec!["main.analytics.orders_staging".to_string()]);
    }
}
