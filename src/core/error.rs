//! Error taxonomy for the update protocol.
//!
//! Each updater component has its own error type so callers can distinguish
//! recoverable conditions from fatal ones instead of funneling everything
//! through a single catch-all boundary:
//!
//! - [`FetchError`] - remote version or artifact retrieval failed. Recovered
//!   locally: logged, and the next scheduled tick retries.
//! - [`StorageError`] - the local version record could not be read or
//!   persisted. The previously persisted value stays intact.
//! - [`ReplaceError`] - the executable swap failed. Its variants encode how
//!   far the protocol got and whether the rollback path worked, which is the
//!   difference between a routine retry and a device needing hands-on
//!   recovery.
//! - [`UpdateError`] - per-tick wrapper combining the above, consumed by the
//!   scheduler loop for logging and alert escalation.

use crate::version::{Version, VersionParseError};
use std::path::PathBuf;
use thiserror::Error;

/// A remote fetch (version or artifact endpoint) failed.
///
/// Read-only network failures: nothing on disk has changed, and the next
/// tick simply retries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be completed (connect failure, timeout, DNS).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body could not be read.
    #[error("could not read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The version endpoint returned something that is not a version.
    #[error("version endpoint {url} returned an unparseable version: {source}")]
    InvalidVersion {
        url: String,
        #[source]
        source: VersionParseError,
    },
}

/// The local version record could not be read or persisted.
///
/// Writes go through a temp-file-then-rename step, so a failed write leaves
/// the previous record intact and readable.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The record exists but could not be read.
    #[error("could not read version record at {path}: {source}", path = .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be persisted.
    #[error("could not persist version record at {path}: {source}", path = .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record holds a value that is not a version.
    #[error("version record at {path} is corrupt: {source}", path = .path.display())]
    InvalidRecord {
        path: PathBuf,
        #[source]
        source: VersionParseError,
    },
}

/// The executable swap failed.
///
/// The variant order mirrors the protocol phases: a backup failure aborts
/// before any destructive write, a restored write failure leaves the old
/// version running, and an unrecoverable one means the device has no
/// guaranteed-working executable.
#[derive(Debug, Error)]
pub enum ReplaceError {
    /// The live executable could not be moved to the backup path. Nothing
    /// was written; the live executable is untouched.
    #[error("could not move live executable to backup: {source}")]
    BackupFailed {
        #[source]
        source: std::io::Error,
    },

    /// The write phase failed but the backup was moved back into place.
    /// The previous version is still installed and functional.
    #[error("write failed ({source}); previous executable restored from backup")]
    WriteFailedRestored {
        #[source]
        source: std::io::Error,
    },

    /// The write phase failed and the backup could not be restored. No
    /// working executable is guaranteed to be on disk; this must be
    /// escalated, not silently retried.
    #[error("write failed ({write}) and backup restore also failed ({restore}); device has no working executable")]
    WriteFailedUnrecoverable {
        write: std::io::Error,
        restore: std::io::Error,
    },
}

/// Everything that can go wrong in one `check_and_update` tick.
///
/// The scheduler loop logs these and continues; [`UpdateError::is_fatal`]
/// selects the conditions that warrant a critical alert instead of a
/// routine failure line.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Reading or bootstrapping the local version record failed.
    #[error(transparent)]
    Store(#[from] StorageError),

    /// The published version could not be fetched; no update was attempted.
    #[error("remote version check failed: {0}")]
    FetchVersion(#[source] FetchError),

    /// The replacement payload could not be fetched; the local executable
    /// and version record are unchanged.
    #[error("artifact download failed: {0}")]
    FetchArtifact(#[source] FetchError),

    /// The executable swap failed; see [`ReplaceError`] for how far it got.
    #[error(transparent)]
    Replace(#[from] ReplaceError),

    /// The executable was replaced but the version record was not updated.
    /// The next tick will re-detect the remote as newer and redundantly
    /// repeat the update; tolerated, not corrected.
    #[error("executable updated to {installed} but version record was not: {source}")]
    RecordLag {
        installed: Version,
        #[source]
        source: StorageError,
    },
}

impl UpdateError {
    /// Whether this failure left the device without a guaranteed-working
    /// executable and requires manual intervention.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Replace(ReplaceError::WriteFailedUnrecoverable { .. })
        )
    }
}
