//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod catalog;
mod jobs;

pub use catalog::CatalogCommands;
pub use jobs::JobsCommands;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Find and run jobs
    Jobs {
        #[command(subcommand)]
        command: JobsCommands,
    },
    /// Catalog operations
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module and returns the
/// process exit code.
pub async fn handle_command(command: Commands, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Jobs { command } => jobs::handle_jobs_command(command, config).await,
        Commands::Catalog { command } => catalog::handle_catalog_command(command, config).await,
    }
}

/// Ask a yes/no question on the terminal; only `y`/`yes` accepts.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
