//! Command-line interface for the fleet update agent.
//!
//! The agent's normal mode is `run`, the long-lived poll loop started by the
//! device supervisor. The remaining subcommands are thin operational tools
//! around the same core:
//!
//! - `run` - poll the update endpoints on a fixed interval
//! - `check` - perform a single update check and exit
//! - `status` - show the installed version and the last check report
//! - `rollback` - manually restore the backup executable
//!
//! Each command is implemented in its own module with its own argument
//! struct, so they can be tested independently.

mod check;
mod rollback;
mod run;
mod status;

use crate::config::UpdaterConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Self-updating agent for executable scripts on fleet-managed devices.
#[derive(Parser, Debug)]
#[command(name = "fleet-updater", version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to `RUST_LOG=debug`).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file.
    ///
    /// Defaults to `/etc/fleet-updater/config.toml`; may also be set via
    /// the `FLEET_UPDATER_CONFIG` environment variable.
    #[arg(short, long, global = true, value_name = "PATH", env = "FLEET_UPDATER_CONFIG")]
    config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the update agent: check on a fixed interval until stopped.
    Run(run::RunCommand),
    /// Perform a single update check and exit.
    Check(check::CheckCommand),
    /// Show the installed version and the most recent check report.
    Status(status::StatusCommand),
    /// Restore the previous executable from the backup copy.
    Rollback(rollback::RollbackCommand),
}

impl Cli {
    /// Default log filter directive derived from the verbosity flags.
    ///
    /// An explicit `RUST_LOG` in the environment takes precedence; this is
    /// only the fallback used when none is set.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    /// Load configuration and execute the selected subcommand.
    pub async fn execute(self) -> Result<()> {
        let config = UpdaterConfig::load_with_optional(self.config).await?;

        match self.command {
            Commands::Run(cmd) => cmd.execute(&config).await,
            Commands::Check(cmd) => cmd.execute(&config).await,
            Commands::Status(cmd) => cmd.execute(&config).await,
            Commands::Rollback(cmd) => cmd.execute(&config).await,
        }
    }
}
