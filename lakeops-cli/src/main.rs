//! Lakeops CLI
//!
//! Command-line operator tool for the managed data platform: find and run
//! jobs by selector, watch their runs to completion, and perform bulk
//! ownership/deletion operations on catalog objects.

mod commands;
mod config;
mod output;
mod progress;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "lakeops")]
#[command(about = "Operator tool for the managed data platform", long_about = None)]
struct Cli {
    /// Workspace URL
    #[arg(long, env = "LAKEOPS_HOST")]
    host: String,

    /// API token used to authenticate against the workspace
    #[arg(long, env = "LAKEOPS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Named profile; scopes the local job inventory cache
    #[arg(long, short = 'p', env = "LAKEOPS_PROFILE")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr so stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lakeops=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.host, cli.token, cli.profile);

    match handle_command(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            output::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
