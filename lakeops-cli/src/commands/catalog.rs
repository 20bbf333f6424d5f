//! Catalog command handlers
//!
//! Bulk listing, ownership and deletion operations over catalog objects.
//! Mutating commands confirm before touching anything and support
//! `--dry-run` to print the plan instead.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use lakeops_client::catalog_ops::{
    delete_schema_with_tables, delete_tables, filter_tables, parse_schema_full_name,
    set_tables_owner,
};
use lakeops_client::{ClientError, WorkspaceClient};
use lakeops_core::domain::catalog::TableInfo;

use super::confirm;
use crate::config::Config;
use crate::output;

/// Catalog subcommands
#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List catalogs
    Catalogs,
    /// List schemas in a catalog
    Schemas {
        /// Catalog name
        catalog: String,
    },
    /// List tables in a schema
    Tables {
        /// Schema in the form catalog.schema
        schema: String,

        /// Regex filter on table full names
        #[arg(long)]
        name: Option<String>,

        /// Filter by table owner
        #[arg(long)]
        owner: Option<String>,

        /// Filter by table type (e.g. MANAGED, EXTERNAL, VIEW)
        #[arg(long = "type")]
        table_type: Option<String>,
    },
    /// Set the owner of tables in a schema
    Chown {
        /// Schema in the form catalog.schema
        schema: String,

        /// New owner (user or service principal)
        #[arg(long)]
        owner: String,

        /// Regex filter on table full names
        #[arg(long)]
        name: Option<String>,

        /// Show what would change, but do nothing
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Delete tables in a schema (takes ownership first)
    RmTables {
        /// Schema in the form catalog.schema
        schema: String,

        /// Regex filter on table full names
        #[arg(long)]
        name: Option<String>,

        /// Show what would be deleted, but do nothing
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Delete a schema together with its tables
    RmSchema {
        /// Schema in the form catalog.schema
        schema: String,

        /// Regex filter on table full names
        #[arg(long)]
        name: Option<String>,

        /// Force-drop the schema even if objects remain
        #[arg(long)]
        force: bool,

        /// Show what would be deleted, but do nothing
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Handle catalog commands
pub async fn handle_catalog_command(command: CatalogCommands, config: &Config) -> Result<ExitCode> {
    let client = config.client();

    match command {
        CatalogCommands::Catalogs => list_catalogs(&client).await,
        CatalogCommands::Schemas { catalog } => list_schemas(&client, &catalog).await,
        CatalogCommands::Tables {
            schema,
            name,
            owner,
            table_type,
        } => list_tables(&client, &schema, name.as_deref(), owner, table_type).await,
        CatalogCommands::Chown {
            schema,
            owner,
            name,
            dry_run,
            yes,
        } => chown_tables(&client, &schema, &owner, name.as_deref(), dry_run, yes).await,
        CatalogCommands::RmTables {
            schema,
            name,
            dry_run,
            yes,
        } => rm_tables(&client, &schema, name.as_deref(), dry_run, yes).await,
        CatalogCommands::RmSchema {
            schema,
            name,
            force,
            dry_run,
            yes,
        } => rm_schema(&client, &schema, name.as_deref(), force, dry_run, yes).await,
    }
}

async fn list_catalogs(client: &WorkspaceClient) -> Result<ExitCode> {
    let catalogs = client.list_catalogs().await?;

    if catalogs.is_empty() {
        output::warn("No catalogs found.");
        return Ok(ExitCode::SUCCESS);
    }

    output::header(&format!("Catalogs ({}):", catalogs.len()));
    output::catalogs_table(&catalogs);
    Ok(ExitCode::SUCCESS)
}

async fn list_schemas(client: &WorkspaceClient, catalog: &str) -> Result<ExitCode> {
    let schemas = match client.list_schemas(catalog).await {
        Ok(schemas) => schemas,
        Err(e) if e.is_not_found() => {
            output::error(&format!("Catalog '{catalog}' does not exist."));
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    if schemas.is_empty() {
        output::warn("No schemas found.");
        return Ok(ExitCode::SUCCESS);
    }

    output::header(&format!("Schemas in {catalog} ({}):", schemas.len()));
    output::schemas_table(&schemas);
    Ok(ExitCode::SUCCESS)
}

/// Load the tables of a schema, mapping the common API failures onto
/// friendlier messages.
async fn load_tables(
    client: &WorkspaceClient,
    schema_full_name: &str,
    name: Option<&str>,
) -> Result<Option<Vec<TableInfo>>> {
    let (catalog, schema) = parse_schema_full_name(schema_full_name)?;

    let tables = match client.list_tables(&catalog, &schema).await {
        Ok(tables) => tables,
        Err(e) if e.is_not_found() => {
            output::error(&format!("Schema '{schema_full_name}' does not exist."));
            return Ok(None);
        }
        Err(e) if e.is_permission_denied() => {
            output::error(&format!(
                "No permission to access schema '{schema_full_name}'."
            ));
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Some(filter_tables(tables, name)?))
}

async fn list_tables(
    client: &WorkspaceClient,
    schema: &str,
    name: Option<&str>,
    owner: Option<String>,
    table_type: Option<String>,
) -> Result<ExitCode> {
    let Some(mut tables) = load_tables(client, schema, name).await? else {
        return Ok(ExitCode::FAILURE);
    };

    if let Some(owner) = owner {
        let want = owner.to_lowercase();
        tables.retain(|t| t.owner.as_deref().unwrap_or("").to_lowercase() == want);
    }

    if let Some(table_type) = table_type {
        let want = table_type.to_lowercase();
        tables.retain(|t| t.table_type.as_deref().unwrap_or("").to_lowercase() == want);
    }

    if tables.is_empty() {
        output::warn("No tables found.");
        return Ok(ExitCode::SUCCESS);
    }

    output::header(&format!("Tables in {schema} ({}):", tables.len()));
    output::tables_table(&tables);
    Ok(ExitCode::SUCCESS)
}

async fn chown_tables(
    client: &WorkspaceClient,
    schema: &str,
    owner: &str,
    name: Option<&str>,
    dry_run: bool,
    yes: bool,
) -> Result<ExitCode> {
    let Some(tables) = load_tables(client, schema, name).await? else {
        return Ok(ExitCode::FAILURE);
    };

    if tables.is_empty() {
        output::warn("No tables found.");
        return Ok(ExitCode::SUCCESS);
    }

    let names: Vec<String> = tables.into_iter().map(|t| t.full_name).collect();

    if dry_run {
        output::header(&format!("Would set owner={owner} on {} table(s):", names.len()));
        for table in &names {
            output::info(&format!("  {table}"));
        }
        return Ok(ExitCode::SUCCESS);
    }

    if !yes && !confirm(&format!("Change owner of {} table(s) to {owner}?", names.len()))? {
        output::info("Cancelled");
        return Ok(ExitCode::SUCCESS);
    }

    let outcomes = set_tables_owner(client, &names, owner, false).await;
    let failed = output::owner_outcomes(&outcomes);

    exit_for_failures(failed)
}

async fn rm_tables(
    client: &WorkspaceClient,
    schema: &str,
    name: Option<&str>,
    dry_run: bool,
    yes: bool,
) -> Result<ExitCode> {
    let Some(tables) = load_tables(client, schema, name).await? else {
        return Ok(ExitCode::FAILURE);
    };

    if tables.is_empty() {
        output::warn("No tables found.");
        return Ok(ExitCode::SUCCESS);
    }

    let names: Vec<String> = tables.into_iter().map(|t| t.full_name).collect();

    if dry_run {
        output::header(&format!("Would delete {} table(s):", names.len()));
        for table in &names {
            output::info(&format!("  {table}"));
        }
        return Ok(ExitCode::SUCCESS);
    }

    if !yes && !confirm(&format!("Delete {} table(s)?", names.len()))? {
        output::info("Cancelled");
        return Ok(ExitCode::SUCCESS);
    }

    let outcomes = delete_tables(client, &names, false).await?;
    let failed = output::delete_outcomes(&outcomes);

    exit_for_failures(failed)
}

async fn rm_schema(
    client: &WorkspaceClient,
    schema: &str,
    name: Option<&str>,
    force: bool,
    dry_run: bool,
    yes: bool,
) -> Result<ExitCode> {
    if dry_run {
        let report = delete_schema_with_tables(client, schema, name, force, true).await?;
        output::header(&format!(
            "Would delete schema {} and {} table(s):",
            report.schema,
            report.tables.len()
        ));
        for table in &report.tables {
            output::info(&format!("  {table}"));
        }
        return Ok(ExitCode::SUCCESS);
    }

    if !yes && !confirm(&format!("Delete schema {schema} and its tables?"))? {
        output::info("Cancelled");
        return Ok(ExitCode::SUCCESS);
    }

    let report = match delete_schema_with_tables(client, schema, name, force, false).await {
        Ok(report) => report,
        Err(ClientError::ApiError { status: 404, .. }) => {
            output::error(&format!("Schema '{schema}' does not exist."));
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let failed = output::delete_outcomes(&report.table_results);
    if report.schema_deleted {
        output::success(&format!("Schema {} deleted", report.schema));
    }

    exit_for_failures(failed)
}

fn exit_for_failures(failed: usize) -> Result<ExitCode> {
    if failed > 0 {
        output::warn(&format!("{failed} operation(s) failed"));
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
