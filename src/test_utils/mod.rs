//! Test utilities shared by unit and integration tests.
//!
//! Provides in-memory implementations of the remote seams so the update
//! protocol can be exercised end to end against a temp directory, without a
//! network.

use crate::core::FetchError;
use crate::updater::remote::{ArtifactSource, ExecutableArtifact, VersionSource};
use crate::version::Version;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

/// Initialize test logging, ignoring repeat initialization across tests.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// [`VersionSource`] that always reports the same published version.
#[derive(Clone)]
pub struct StaticVersionSource {
    version: Version,
}

impl StaticVersionSource {
    pub fn new(version: Version) -> Self {
        Self { version }
    }
}

#[async_trait]
impl VersionSource for StaticVersionSource {
    async fn fetch(&self) -> Result<Version, FetchError> {
        Ok(self.version.clone())
    }
}

/// [`VersionSource`] that always fails with a server error.
#[derive(Clone)]
pub struct FailingVersionSource;

#[async_trait]
impl VersionSource for FailingVersionSource {
    async fn fetch(&self) -> Result<Version, FetchError> {
        Err(FetchError::Status {
            url: "http://fleet.test/version.txt".to_string(),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        })
    }
}

/// [`ArtifactSource`] serving a fixed payload and counting fetches.
///
/// Clones share the fetch counter, so tests can keep a handle and assert
/// how many downloads the orchestrator performed.
#[derive(Clone)]
pub struct StaticArtifactSource {
    bytes: Vec<u8>,
    fetches: Arc<AtomicUsize>,
}

impl StaticArtifactSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times the payload has been fetched.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactSource for StaticArtifactSource {
    async fn fetch(&self) -> Result<ExecutableArtifact, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(ExecutableArtifact::new(self.bytes.clone()))
    }
}

/// [`ArtifactSource`] that always fails with a server error.
#[derive(Clone)]
pub struct FailingArtifactSource {
    fetches: Arc<AtomicUsize>,
}

impl FailingArtifactSource {
    pub fn new() -> Self {
        Self {
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for FailingArtifactSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactSource for FailingArtifactSource {
    async fn fetch(&self) -> Result<ExecutableArtifact, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::Status {
            url: "http://fleet.test/agent.py".to_string(),
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        })
    }
}
