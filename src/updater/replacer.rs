//! Backup-then-write replacement of the live executable.

use crate::core::ReplaceError;
use crate::updater::remote::ExecutableArtifact;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Swaps the live executable for a new payload, with rollback on failure.
///
/// The whole algorithm is backup-then-write-then-restore-on-failure:
///
/// 1. **Backup phase**: if a live executable exists, it is moved (renamed,
///    not copied) to the backup path, overwriting any prior backup. The
///    rename either succeeds atomically or leaves the live executable
///    untouched.
/// 2. **Write phase**: the new bytes are written to the live path and the
///    file is marked executable.
/// 3. **Restore phase** (failure only): the backup is moved back to the
///    live path. Whether that rescue works decides between
///    [`ReplaceError::WriteFailedRestored`] and the fatal
///    [`ReplaceError::WriteFailedUnrecoverable`].
///
/// On success the backup file is intentionally left on disk for manual
/// forensic recovery.
///
/// There is no locking. The protocol assumes a single updater process per
/// device and tolerates the live executable being briefly absent between
/// the backup rename and the write; a concurrently starting instance could
/// observe that transient state. Known gap: when the live executable is
/// already missing the backup phase is skipped, which forfeits the rollback
/// path for that attempt.
pub struct AtomicReplacer {
    live_path: PathBuf,
    backup_path: PathBuf,
}

impl AtomicReplacer {
    /// Create a replacer for the executable at `live_path`, keeping its
    /// rollback copy at `backup_path`.
    pub fn new(live_path: PathBuf, backup_path: PathBuf) -> Self {
        Self {
            live_path,
            backup_path,
        }
    }

    /// Path of the live executable.
    pub fn live_path(&self) -> &Path {
        &self.live_path
    }

    /// Path of the rollback copy.
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Whether a rollback copy currently exists.
    pub fn backup_exists(&self) -> bool {
        self.backup_path.exists()
    }

    /// Replace the live executable with `artifact`.
    ///
    /// # Errors
    ///
    /// - [`ReplaceError::BackupFailed`]: the live executable could not be
    ///   moved aside; nothing was written and the update is aborted.
    /// - [`ReplaceError::WriteFailedRestored`]: the write failed but the
    ///   previous executable is back in place. The caller must treat the
    ///   update as failed and must not advance the version record.
    /// - [`ReplaceError::WriteFailedUnrecoverable`]: the write failed and
    ///   the backup could not be restored. No working executable is
    ///   guaranteed to exist; this must be escalated.
    pub async fn replace(&self, artifact: &ExecutableArtifact) -> Result<(), ReplaceError> {
        self.backup_live().await?;

        if let Err(write) = self.write_live(artifact).await {
            warn!(
                "write to {} failed ({}), attempting restore",
                self.live_path.display(),
                write
            );
            return Err(match self.restore_backup().await {
                Ok(()) => ReplaceError::WriteFailedRestored { source: write },
                Err(restore) => ReplaceError::WriteFailedUnrecoverable { write, restore },
            });
        }

        info!("live executable replaced at {}", self.live_path.display());
        Ok(())
    }

    /// Move the live executable to the backup path, if it exists.
    async fn backup_live(&self) -> Result<(), ReplaceError> {
        if !self.live_path.exists() {
            warn!(
                "live executable missing at {}, skipping backup",
                self.live_path.display()
            );
            return Ok(());
        }

        fs::rename(&self.live_path, &self.backup_path)
            .await
            .map_err(|source| ReplaceError::BackupFailed { source })?;

        info!(
            "previous executable moved to {}",
            self.backup_path.display()
        );
        Ok(())
    }

    /// Write the payload to the live path and mark it executable.
    async fn write_live(&self, artifact: &ExecutableArtifact) -> io::Result<()> {
        fs::write(&self.live_path, &artifact.bytes).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(
                &self.live_path,
                std::fs::Permissions::from_mode(artifact.mode),
            )
            .await?;
        }

        Ok(())
    }

    /// Move the backup back to the live path.
    ///
    /// Also used directly by the manual `rollback` command. Fails when no
    /// backup exists.
    pub async fn restore_backup(&self) -> io::Result<()> {
        if !self.backup_path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no backup at {}", self.backup_path.display()),
            ));
        }

        fs::rename(&self.backup_path, &self.live_path).await?;
        info!(
            "restored previous executable from {}",
            self.backup_path.display()
        );
        Ok(())
    }
}
