//! Installed-version and last-check display.

use crate::config::UpdaterConfig;
use crate::updater::{CheckOutcome, ReportStore, VersionStore};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

/// Arguments for the `status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusCommand {}

impl StatusCommand {
    /// Print the installed version and the most recent check report.
    pub async fn execute(self, config: &UpdaterConfig) -> Result<()> {
        let store = VersionStore::new(config.version_file.clone());
        let installed = store.read().await?;

        println!("Installed version: {}", installed.to_string().bold());
        println!("Live executable:   {}", config.script_path.display());

        let reports = ReportStore::new(config.report_file.clone());
        match reports.load().await? {
            Some(report) => {
                let when = report.checked_at.format("%Y-%m-%d %H:%M:%S UTC");
                match report.outcome {
                    CheckOutcome::UpToDate => {
                        println!("Last check:        {when} {}", "(up to date)".green());
                    }
                    CheckOutcome::Updated => {
                        let previous = report.previous.as_deref().unwrap_or("?");
                        println!(
                            "Last check:        {when} {}",
                            format!("(updated from {previous})").green()
                        );
                    }
                    CheckOutcome::Failed => {
                        let error = report.error.as_deref().unwrap_or("unknown error");
                        println!("Last check:        {when} {}", "(failed)".red());
                        println!("                   {error}");
                    }
                }
            }
            None => println!("Last check:        {}", "never".yellow()),
        }

        Ok(())
    }
}
