//! One update check, start to finish.

use crate::config::UpdaterConfig;
use crate::core::UpdateError;
use crate::updater::remote::{
    ArtifactSource, HttpArtifactSource, HttpVersionSource, VersionSource,
};
use crate::updater::replacer::AtomicReplacer;
use crate::updater::store::VersionStore;
use crate::version::Version;
use anyhow::{Context, Result, bail};
use tracing::{debug, info};

/// Result of a completed [`check_and_update`](UpdateOrchestrator::check_and_update) tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The remote version is not newer than the installed one. No artifact
    /// was fetched and nothing on disk changed.
    UpToDate {
        /// The installed (and still current) version.
        current: Version,
    },
    /// The executable was replaced and the version record advanced.
    Updated {
        /// Version installed before this tick.
        from: Version,
        /// Version installed now.
        to: Version,
    },
}

/// Composes the update components into a single per-tick operation.
///
/// The orchestrator is stateless across invocations; everything durable
/// lives in the version record, the live executable, and the backup file.
/// It is generic over the remote seams so the whole protocol is testable
/// without a network.
///
/// # Examples
///
/// ```rust,no_run
/// use fleet_updater::config::UpdaterConfig;
/// use fleet_updater::updater::HttpUpdateOrchestrator;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = UpdaterConfig::load_with_optional(None).await?;
/// let orchestrator = HttpUpdateOrchestrator::from_config(&config)?;
///
/// match orchestrator.check_and_update().await {
///     Ok(outcome) => println!("{outcome:?}"),
///     Err(e) if e.is_fatal() => eprintln!("device needs manual recovery: {e}"),
///     Err(e) => eprintln!("update check failed: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct UpdateOrchestrator<R, A> {
    store: VersionStore,
    remote: R,
    artifacts: A,
    replacer: AtomicReplacer,
}

/// Orchestrator wired to the production HTTP sources.
pub type HttpUpdateOrchestrator = UpdateOrchestrator<HttpVersionSource, HttpArtifactSource>;

impl UpdateOrchestrator<HttpVersionSource, HttpArtifactSource> {
    /// Build an orchestrator from configuration.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint URLs are not provisioned or the HTTP client
    /// cannot be constructed.
    pub fn from_config(config: &UpdaterConfig) -> Result<Self> {
        if config.version_url.is_empty() {
            bail!("version_url is not configured");
        }
        if config.artifact_url.is_empty() {
            bail!("artifact_url is not configured");
        }

        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(
            VersionStore::new(config.version_file.clone()),
            HttpVersionSource::new(client.clone(), config.version_url.clone()),
            HttpArtifactSource::new(client, config.artifact_url.clone()),
            AtomicReplacer::new(config.script_path.clone(), config.backup_path.clone()),
        ))
    }
}

impl<R: VersionSource, A: ArtifactSource> UpdateOrchestrator<R, A> {
    /// Compose an orchestrator from its four components.
    pub fn new(store: VersionStore, remote: R, artifacts: A, replacer: AtomicReplacer) -> Self {
        Self {
            store,
            remote,
            artifacts,
            replacer,
        }
    }

    /// Run one update check.
    ///
    /// Reads the local version, fetches the remote one, and when the remote
    /// is newer downloads the artifact, swaps the executable, and persists
    /// the new version. All failures are contained in the returned
    /// [`UpdateError`]; nothing here terminates the caller's loop.
    ///
    /// When the remote version is not newer this is an idempotent no-op: no
    /// artifact fetch, no filesystem mutation.
    pub async fn check_and_update(&self) -> Result<UpdateOutcome, UpdateError> {
        let local = self.store.read().await?;
        debug!("installed version: {}", local);

        let remote = self
            .remote
            .fetch()
            .await
            .map_err(UpdateError::FetchVersion)?;
        debug!("published version: {}", remote);

        if remote <= local {
            info!("already on latest version {}", local);
            return Ok(UpdateOutcome::UpToDate { current: local });
        }

        info!("update available: {} -> {}", local, remote);

        let artifact = self
            .artifacts
            .fetch()
            .await
            .map_err(UpdateError::FetchArtifact)?;

        self.replacer.replace(&artifact).await?;

        // The executable is already swapped at this point; a record failure
        // leaves the device on the new binary with a stale record, repaired
        // by the next tick.
        if let Err(source) = self.store.write(&remote).await {
            return Err(UpdateError::RecordLag {
                installed: remote,
                source,
            });
        }

        info!("update to {} complete", remote);
        Ok(UpdateOutcome::Updated {
            from: local,
            to: remote,
        })
    }
}
