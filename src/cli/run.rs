//! The long-lived poll loop.

use crate::config::UpdaterConfig;
use crate::updater::{CheckReport, HttpUpdateOrchestrator, ReportStore};
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tokio::time;
use tracing::{error, info, warn};

/// Arguments for the `run` subcommand.
///
/// Runs update checks strictly sequentially on a fixed delay until the
/// process is stopped. Every per-tick failure is contained here: a failed
/// check is logged (and escalated when fatal), the check report is written,
/// and the loop sleeps until the next tick. Restarting onto a newly
/// installed executable is the supervisor's job, not this loop's.
#[derive(Parser, Debug)]
pub struct RunCommand {
    /// Override the configured poll interval, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,
}

impl RunCommand {
    /// Run the agent loop. Never returns under normal operation.
    pub async fn execute(self, config: &UpdaterConfig) -> Result<()> {
        let orchestrator = HttpUpdateOrchestrator::from_config(config)?;
        let reports = ReportStore::new(config.report_file.clone());
        let interval = self
            .interval
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.check_interval());

        info!(
            "update agent started (interval {}s, endpoint {})",
            interval.as_secs(),
            config.version_url
        );

        loop {
            let result = orchestrator.check_and_update().await;

            match &result {
                Ok(_) => {}
                Err(e) if e.is_fatal() => {
                    // The device may have no working executable; this line
                    // is what fleet alerting keys on.
                    error!("CRITICAL: {e}; manual intervention required");
                }
                Err(e) => warn!("update check failed: {e}"),
            }

            let report = CheckReport::from_result(&result);
            if let Err(e) = reports.save(&report).await {
                warn!("could not persist check report: {e:#}");
            }

            time::sleep(interval).await;
        }
    }
}
