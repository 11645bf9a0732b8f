//! Updater configuration.
//!
//! Configuration lives in a single TOML file, by default at
//! `/etc/fleet-updater/config.toml`. The location can be overridden with the
//! `--config` flag or the `FLEET_UPDATER_CONFIG` environment variable. A
//! missing file yields the defaults, so a device works out of the box once
//! the endpoint URLs are provisioned.
//!
//! # File Format
//!
//! ```toml
//! version_url = "https://updates.example.com/fleet/agent/version.txt"
//! artifact_url = "https://updates.example.com/fleet/agent/agent.py"
//!
//! script_path = "/var/lib/fleet/agent.py"
//! version_file = "/var/lib/fleet/current_version"
//! backup_path = "/var/lib/fleet/agent.py.backup"
//! report_file = "/var/lib/fleet/last_check.json"
//!
//! check_interval_secs = 300
//! http_timeout_secs = 30
//! ```

use crate::constants::{DEFAULT_CHECK_INTERVAL, DEFAULT_HTTP_TIMEOUT, DEFAULT_STATE_DIR};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// Configuration for the update agent.
///
/// Endpoint URLs have no usable default and must be provisioned; everything
/// else defaults to the standard device layout under `/var/lib/fleet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Endpoint returning the published version as a plaintext body.
    pub version_url: String,

    /// Endpoint returning the raw bytes of the replacement executable.
    pub artifact_url: String,

    /// Path of the live managed script.
    pub script_path: PathBuf,

    /// Path of the persisted version record.
    pub version_file: PathBuf,

    /// Path the previous executable is moved to during an update.
    pub backup_path: PathBuf,

    /// Path of the JSON record describing the most recent check.
    pub report_file: PathBuf,

    /// Delay between update checks, in seconds.
    pub check_interval_secs: u64,

    /// Timeout applied to each HTTP request, in seconds.
    pub http_timeout_secs: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        let state_dir = PathBuf::from(DEFAULT_STATE_DIR);
        Self {
            version_url: String::new(),
            artifact_url: String::new(),
            script_path: state_dir.join("agent.py"),
            version_file: state_dir.join("current_version"),
            backup_path: state_dir.join("agent.py.backup"),
            report_file: state_dir.join("last_check.json"),
            check_interval_secs: DEFAULT_CHECK_INTERVAL.as_secs(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT.as_secs(),
        }
    }
}

impl UpdaterConfig {
    /// Load configuration from an optional path.
    ///
    /// Falls back to [`default_path`](Self::default_path) when no path is
    /// given, and to the defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or contains
    /// invalid TOML.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(Self::default_path);
        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("no config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// The default configuration file location.
    pub fn default_path() -> PathBuf {
        PathBuf::from(crate::constants::DEFAULT_CONFIG_PATH)
    }

    /// Delay between update checks.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// Per-request HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
