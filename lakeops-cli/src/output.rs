//! Terminal output helpers
//!
//! Plain-line rendering with colored accents. All helpers write to stdout;
//! diagnostics and errors go through `error`/`warn` so commands stay
//! consistent about what lands where.

use colored::*;

use lakeops_core::domain::catalog::{
    CatalogInfo, OwnerChangeOutcome, SchemaInfo, TableDeleteOutcome, TableInfo,
};
use lakeops_core::domain::job::{Job, JobRun, RunStatus};

pub fn header(text: &str) {
    println!("{}", text.bold());
}

pub fn info(text: &str) {
    println!("{}", text);
}

pub fn success(text: &str) {
    println!("{}", text.green());
}

pub fn warn(text: &str) {
    println!("{}", text.yellow());
}

pub fn error(text: &str) {
    eprintln!("{} {}", "Error:".red().bold(), text);
}

/// Print a list of jobs with their tags.
pub fn jobs_table(jobs: &[Job], title: &str) {
    println!("{}", format!("{} ({}):", title, jobs.len()).bold());
    println!();
    for job in jobs {
        println!("  {} {} {}", "▸".cyan(), job.name, format!("id={}", job.id).dimmed());
        if !job.tags.is_empty() {
            let mut tags: Vec<String> = job
                .tags
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            tags.sort();
            println!("    {}", tags.join(" ").dimmed());
        }
    }
    println!();
}

/// Print the runs created by a dispatch.
pub fn runs_table(runs: &[JobRun]) {
    for run in runs {
        println!(
            "  {} run {} {}",
            "▸".cyan(),
            run.run_id,
            format!("job={}", run.job_id).dimmed()
        );
    }
    println!();
}

/// Print final run statuses.
pub fn run_status_table(results: &[(JobRun, RunStatus)]) {
    header("Run status:");
    for (run, status) in results {
        println!(
            "  {} run {} {} {}",
            "▸".cyan(),
            run.run_id,
            format!("job={}", run.job_id).dimmed(),
            colorize_status(*status)
        );
    }
    println!();
}

/// Print catalogs.
pub fn catalogs_table(catalogs: &[CatalogInfo]) {
    for catalog in catalogs {
        let owner = catalog.owner.as_deref().unwrap_or("-");
        println!(
            "  {} {} {}",
            "▸".cyan(),
            catalog.name,
            format!("owner={}", owner).dimmed()
        );
    }
    println!();
}

/// Print schemas.
pub fn schemas_table(schemas: &[SchemaInfo]) {
    for schema in schemas {
        let owner = schema.owner.as_deref().unwrap_or("-");
        println!(
            "  {} {} {}",
            "▸".cyan(),
            schema.full_name,
            format!("owner={}", owner).dimmed()
        );
    }
    println!();
}

/// Print catalog tables.
pub fn tables_table(tables: &[TableInfo]) {
    for table in tables {
        let owner = table.owner.as_deref().unwrap_or("-");
        let table_type = table.table_type.as_deref().unwrap_or("-");
        println!(
            "  {} {} {}",
            "▸".cyan(),
            table.full_name,
            format!("owner={} type={}", owner, table_type).dimmed()
        );
    }
    println!();
}

/// Print per-table delete outcomes, returning how many failed.
pub fn delete_outcomes(outcomes: &[TableDeleteOutcome]) -> usize {
    let mut failed = 0;
    for outcome in outcomes {
        if outcome.deleted {
            println!("  {} {}", "✓".green(), outcome.table);
        } else if let Some(error) = &outcome.error {
            failed += 1;
            println!("  {} {} {}", "✗".red(), outcome.table, error.red());
        } else {
            println!("  {} {} {}", "·".dimmed(), outcome.table, "skipped (dry-run)".dimmed());
        }
    }
    failed
}

/// Print per-object owner change outcomes, returning how many failed.
pub fn owner_outcomes(outcomes: &[OwnerChangeOutcome]) -> usize {
    let mut failed = 0;
    for outcome in outcomes {
        if outcome.ok {
            println!(
                "  {} {} {}",
                "✓".green(),
                outcome.full_name,
                format!("owner={}", outcome.new_owner).dimmed()
            );
        } else {
            failed += 1;
            let reason = outcome.error.as_deref().unwrap_or("unknown error");
            println!("  {} {} {}", "✗".red(), outcome.full_name, reason.red());
        }
    }
    failed
}

/// Colorize a run status for display.
pub fn colorize_status(status: RunStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        RunStatus::Pending => text.yellow(),
        RunStatus::Running => text.cyan(),
        RunStatus::Success => text.green(),
        RunStatus::Failed => text.red(),
        RunStatus::Canceled => text.dimmed(),
        RunStatus::Unknown => text.dimmed(),
    }
}
