//! fleet-updater entry point
//!
//! Parses command-line arguments, configures logging once for the process
//! lifetime, and dispatches to the selected subcommand. Errors that escape
//! a subcommand are printed and turn into a non-zero exit code; the `run`
//! loop itself never lets a failed tick escape this far.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use fleet_updater::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is process-wide state, configured exactly once at startup.
    // An explicit RUST_LOG wins over the verbosity flags.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_directive())),
        )
        .with_target(false)
        .init();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}
