//! Persisted record of the most recent update check.
//!
//! After every tick the agent writes a small JSON report (timestamp,
//! versions, outcome) so fleet tooling and the `status` command can tell
//! when the device last checked in and how it went, without scraping logs.
//! The report is operational telemetry, not part of the installed state:
//! failing to write it never fails the tick.

use crate::core::UpdateError;
use crate::updater::orchestrator::UpdateOutcome;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// How the most recent check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Remote was not newer; nothing changed.
    UpToDate,
    /// The executable was replaced and the record advanced.
    Updated,
    /// The tick failed; see the `error` field.
    Failed,
}

/// JSON record describing one completed check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// When the check finished.
    pub checked_at: DateTime<Utc>,
    /// How it ended.
    pub outcome: CheckOutcome,
    /// Version installed after the check, when known.
    pub installed: Option<String>,
    /// Version that was installed before an update, when one happened.
    pub previous: Option<String>,
    /// Failure description for [`CheckOutcome::Failed`].
    pub error: Option<String>,
}

impl CheckReport {
    /// Build a report from a finished tick.
    pub fn from_result(result: &Result<UpdateOutcome, UpdateError>) -> Self {
        let checked_at = Utc::now();
        match result {
            Ok(UpdateOutcome::UpToDate { current }) => Self {
                checked_at,
                outcome: CheckOutcome::UpToDate,
                installed: Some(current.to_string()),
                previous: None,
                error: None,
            },
            Ok(UpdateOutcome::Updated { from, to }) => Self {
                checked_at,
                outcome: CheckOutcome::Updated,
                installed: Some(to.to_string()),
                previous: Some(from.to_string()),
                error: None,
            },
            Err(e) => Self {
                checked_at,
                outcome: CheckOutcome::Failed,
                installed: None,
                previous: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Reads and writes the check report file.
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    /// Create a store backed by the report file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persist `report`, replacing any previous one.
    pub async fn save(&self, report: &CheckReport) -> Result<()> {
        let content =
            serde_json::to_string_pretty(report).context("Failed to serialize check report")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create report directory")?;
        }

        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write check report to {}", self.path.display()))?;

        debug!("check report saved to {}", self.path.display());
        Ok(())
    }

    /// Load the most recent report, if one has been written.
    pub async fn load(&self) -> Result<Option<CheckReport>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read check report from {}", self.path.display()))?;

        let report =
            serde_json::from_str(&content).context("Failed to parse check report")?;

        Ok(Some(report))
    }
}
