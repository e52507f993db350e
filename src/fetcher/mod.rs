//! Source retrieval -- resolve an identifier to an open line stream.
//!
//! Split into focused submodules:
//! - [`http`] - `http://` / `https://` sources via reqwest
//! - [`file`] - local filesystem paths via tokio::fs
//!
//! The [`SourceFetcher`] trait is the seam between retrieval and parsing, so
//! alternate transports (or test doubles) can be plugged into
//! [`CsvProcessor`](crate::CsvProcessor).

mod file;
mod http;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::pin::Pin;

use tokio::io::AsyncBufRead;

use crate::config::HttpConfig;
use crate::error::{FetchFailure, Result};

/// Buffered, exclusively owned byte stream of an opened source
pub type LineReader = Pin<Box<dyn AsyncBufRead + Send>>;

/// A source that was opened successfully and is ready to be read
pub struct OpenedSource {
    /// Stream positioned at the first byte of the source (the header line)
    pub reader: LineReader,
    /// HTTP response code (always 200 for HTTP sources, `None` for files)
    pub response_code: Option<u16>,
}

impl OpenedSource {
    /// Wrap any buffered async reader
    pub fn new(reader: impl AsyncBufRead + Send + 'static, response_code: Option<u16>) -> Self {
        Self {
            reader: Box::pin(reader),
            response_code,
        }
    }
}

impl std::fmt::Debug for OpenedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenedSource")
            .field("response_code", &self.response_code)
            .finish_non_exhaustive()
    }
}

/// Abstraction over source retrieval, enabling alternate transports and testability.
///
/// Implementations make exactly one attempt per call and classify every
/// failure as a [`FetchFailure`]; they never panic on bad input.
#[async_trait::async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Open `source` for reading. `None` means the identifier was absent.
    async fn open(&self, source: Option<&str>) -> std::result::Result<OpenedSource, FetchFailure>;
}

/// Whether an identifier names an HTTP(S) resource rather than a local path
pub fn is_http_source(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Production [`SourceFetcher`]: HTTP(S) through a shared reqwest client,
/// everything else through the local filesystem.
#[derive(Clone, Debug)]
pub struct DefaultSourceFetcher {
    client: reqwest::Client,
}

impl DefaultSourceFetcher {
    /// Build a fetcher from HTTP settings
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`](crate::Error::Network) if the HTTP client
    /// cannot be constructed (e.g. the TLS backend fails to initialize).
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl SourceFetcher for DefaultSourceFetcher {
    async fn open(&self, source: Option<&str>) -> std::result::Result<OpenedSource, FetchFailure> {
        let source = match source {
            Some(s) if !s.is_empty() => s,
            _ => return Err(FetchFailure::EmptyIdentifier),
        };

        if is_http_source(source) {
            http::open(&self.client, source).await
        } else {
            file::open(source).await
        }
    }
}
