//! Remote endpoints: the published version and the replacement payload.
//!
//! The orchestrator only depends on the [`VersionSource`] and
//! [`ArtifactSource`] seams; transport details stay behind them. The
//! production implementations fetch over HTTP with a bounded timeout
//! (configured on the shared [`reqwest::Client`]), so no tick can stall on
//! a hung connection.

use crate::constants::EXECUTABLE_MODE;
use crate::core::FetchError;
use crate::version::{self, Version};
use async_trait::async_trait;
use tracing::debug;

/// Raw replacement payload for the live executable.
///
/// No internal structure is assumed; the payload is an opaque blob plus the
/// permission mode the file must carry once written. The content is
/// installed as fetched, without checksum or signature validation.
#[derive(Debug, Clone)]
pub struct ExecutableArtifact {
    /// The replacement executable's bytes.
    pub bytes: Vec<u8>,
    /// Permission mode applied after the write (Unix only).
    pub mode: u32,
}

impl ExecutableArtifact {
    /// Wrap `bytes` as an artifact with the standard executable mode.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mode: EXECUTABLE_MODE,
        }
    }
}

/// Fetches the currently published version identifier.
#[async_trait]
pub trait VersionSource {
    /// Retrieve and parse the remote version. Read-only; no side effects.
    async fn fetch(&self) -> Result<Version, FetchError>;
}

/// Fetches the replacement executable payload.
#[async_trait]
pub trait ArtifactSource {
    /// Retrieve the replacement payload. No content validation is performed.
    async fn fetch(&self) -> Result<ExecutableArtifact, FetchError>;
}

/// [`VersionSource`] reading a plaintext version string over HTTP.
pub struct HttpVersionSource {
    client: reqwest::Client,
    url: String,
}

impl HttpVersionSource {
    /// Create a source for the version endpoint at `url`.
    ///
    /// The client is expected to carry the request timeout; see
    /// [`UpdaterConfig::http_timeout`](crate::config::UpdaterConfig::http_timeout).
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl VersionSource for HttpVersionSource {
    async fn fetch(&self) -> Result<Version, FetchError> {
        debug!("fetching published version from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Body {
                url: self.url.clone(),
                source,
            })?;

        version::parse(body.trim()).map_err(|source| FetchError::InvalidVersion {
            url: self.url.clone(),
            source,
        })
    }
}

/// [`ArtifactSource`] downloading the raw executable bytes over HTTP.
pub struct HttpArtifactSource {
    client: reqwest::Client,
    url: String,
}

impl HttpArtifactSource {
    /// Create a source for the artifact endpoint at `url`.
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ArtifactSource for HttpArtifactSource {
    async fn fetch(&self) -> Result<ExecutableArtifact, FetchError> {
        debug!("downloading artifact from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Body {
                url: self.url.clone(),
                source,
            })?;

        debug!("downloaded artifact: {} bytes", bytes.len());
        Ok(ExecutableArtifact::new(bytes.to_vec()))
    }
}
