//! Persistence of the locally installed version identifier.

use crate::constants::baseline_version;
use crate::core::StorageError;
use crate::version::{self, Version};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Persists and retrieves the locally installed version.
///
/// The record is a single trimmed version string at a fixed path. It is the
/// durable projection of the installed state's version: it only advances
/// after the executable swap has completed.
///
/// # First-Run Bootstrap
///
/// Devices are imaged with the baseline release, so a missing record is not
/// an error: [`read`](Self::read) initializes it to `1.0.0` and persists
/// that default before returning it. A second read finds the record on disk
/// and does not re-trigger the bootstrap.
///
/// # Write Atomicity
///
/// [`write`](Self::write) goes through a temp-file-then-rename step so a
/// failed write never leaves a partially written record visible; the
/// previous value stays intact.
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    /// Create a store backed by the record at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the on-disk record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the persisted version, bootstrapping the baseline on first run.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] when the record exists but cannot be
    /// read, [`StorageError::InvalidRecord`] when it holds something that is
    /// not a version, and [`StorageError::Write`] when the first-run
    /// bootstrap cannot persist the baseline.
    pub async fn read(&self) -> Result<Version, StorageError> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let record = raw.trim();
                debug!("version record at {}: {}", self.path.display(), record);
                version::parse(record).map_err(|source| StorageError::InvalidRecord {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let baseline = baseline_version();
                self.write(&baseline).await?;
                info!(
                    "no version record at {}, initialized to {}",
                    self.path.display(),
                    baseline
                );
                Ok(baseline)
            }
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Persist `version` as the new current version.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] when the record cannot be persisted.
    /// The previously persisted value remains readable.
    pub async fn write(&self, version: &Version) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        // Write-then-rename keeps the old record intact on failure.
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, version.to_string())
            .await
            .map_err(write_err)?;
        fs::rename(&temp_path, &self.path).await.map_err(write_err)?;

        debug!("version record updated to {}", version);
        Ok(())
    }
}
