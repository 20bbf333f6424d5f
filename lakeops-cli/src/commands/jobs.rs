//! Job command handlers
//!
//! `find` selects jobs from the inventory; `run` starts the selection in
//! parallel and optionally watches the runs to completion.

use std::collections::HashMap;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};

use lakeops_client::{select_jobs, start_jobs_parallel};
use lakeops_core::domain::job::RunStatus;
use lakeops_core::selector::{Selector, build_selector};

use super::confirm;
use crate::config::Config;
use crate::output;
use crate::progress::wait_for_runs_with_progress;

/// Interval between run status sweeps while watching.
const WATCH_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Selector options shared by `find` and `run`.
#[derive(Args)]
pub struct SelectorArgs {
    /// Regex on the job name
    #[arg(long)]
    name: Option<String>,

    /// Tag selector (key=value); repeatable
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Combine selectors with OR instead of AND
    #[arg(long = "or")]
    use_or: bool,
}

impl SelectorArgs {
    fn build(&self) -> Result<Selector> {
        Ok(build_selector(self.name.as_deref(), &self.tags, self.use_or)?)
    }
}

/// Job subcommands
#[derive(Subcommand)]
pub enum JobsCommands {
    /// Find jobs using selectors
    Find {
        #[command(flatten)]
        selector: SelectorArgs,
    },
    /// Start the selected jobs in parallel
    Run {
        #[command(flatten)]
        selector: SelectorArgs,

        /// Number of jobs to start in parallel
        #[arg(long, short = 'n', default_value_t = 5)]
        parallel: usize,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Wait until all runs are complete
        #[arg(long, short = 'w')]
        watch: bool,

        /// Show which jobs would start, but don't start anything
        #[arg(long)]
        dry_run: bool,
    },
}

/// Handle job commands
pub async fn handle_jobs_command(command: JobsCommands, config: &Config) -> Result<ExitCode> {
    match command {
        JobsCommands::Find { selector } => find(config, &selector).await,
        JobsCommands::Run {
            selector,
            parallel,
            yes,
            watch,
            dry_run,
        } => run(config, &selector, parallel, yes, watch, dry_run).await,
    }
}

async fn find(config: &Config, selector_args: &SelectorArgs) -> Result<ExitCode> {
    // Selector validation happens before any remote call.
    let selector = selector_args.build()?;
    let client = config.client();

    let jobs = select_jobs(&client, &selector).await?;

    if jobs.is_empty() {
        output::warn("No jobs found");
        return Ok(ExitCode::SUCCESS);
    }

    output::jobs_table(&jobs, "Matched jobs");
    Ok(ExitCode::SUCCESS)
}

async fn run(
    config: &Config,
    selector_args: &SelectorArgs,
    parallel: usize,
    yes: bool,
    watch: bool,
    dry_run: bool,
) -> Result<ExitCode> {
    let selector = selector_args.build()?;
    let client = Arc::new(config.client());

    let jobs = select_jobs(client.as_ref(), &selector).await?;

    if jobs.is_empty() {
        output::warn("No jobs found");
        return Ok(ExitCode::SUCCESS);
    }

    output::jobs_table(&jobs, "Selected jobs");

    if dry_run {
        output::warn("Dry-run enabled: no jobs were started");
        return Ok(ExitCode::SUCCESS);
    }

    if !yes && !confirm("Start the selected jobs?")? {
        output::info("Cancelled");
        return Ok(ExitCode::SUCCESS);
    }

    let job_ids: Vec<u64> = jobs.iter().map(|j| j.id).collect();
    let runs = start_jobs_parallel(Arc::clone(&client), &job_ids, parallel).await?;

    output::success(&format!("Jobs started: {} run(s)", runs.len()));
    output::runs_table(&runs);

    if watch {
        let names: HashMap<u64, String> = jobs.iter().map(|j| (j.id, j.name.clone())).collect();
        let results =
            wait_for_runs_with_progress(client.as_ref(), &runs, WATCH_POLL_INTERVAL, Some(&names))
                .await;

        output::run_status_table(&results);

        if results.iter().any(|(_, status)| *status != RunStatus::Success) {
            return Ok(ExitCode::from(2));
        }
    }

    Ok(ExitCode::SUCCESS)
}
