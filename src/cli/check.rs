//! One-shot update check.

use crate::config::UpdaterConfig;
use crate::updater::{CheckReport, HttpUpdateOrchestrator, ReportStore, UpdateOutcome};
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::warn;

/// Arguments for the `check` subcommand.
///
/// Runs exactly one tick of the update protocol and exits non-zero when it
/// fails. Useful for cron-driven setups and for forcing a check from a
/// shell while diagnosing a device.
#[derive(Parser, Debug)]
pub struct CheckCommand {}

impl CheckCommand {
    /// Run one update check.
    pub async fn execute(self, config: &UpdaterConfig) -> Result<()> {
        let orchestrator = HttpUpdateOrchestrator::from_config(config)?;
        let reports = ReportStore::new(config.report_file.clone());

        let result = orchestrator.check_and_update().await;

        let report = CheckReport::from_result(&result);
        if let Err(e) = reports.save(&report).await {
            warn!("could not persist check report: {e:#}");
        }

        match result {
            Ok(UpdateOutcome::UpToDate { current }) => {
                println!("{} already on latest version ({current})", "✓".green());
                Ok(())
            }
            Ok(UpdateOutcome::Updated { from, to }) => {
                println!("{} updated {from} -> {to}", "✓".green());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
