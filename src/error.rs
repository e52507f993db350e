//! Error types for csv-ingest
//!
//! Two layers of failure exist in this crate:
//! - Run-level [`Error`]s abort a whole ingestion run (bad configuration,
//!   a disrupted task runtime, an interrupted run, internal defects).
//! - Per-source failures ([`FetchFailure`]) and per-line rejections
//!   ([`LineRejection`]) are data. They end up in a
//!   [`SourceResult`](crate::types::SourceResult) and never stop sibling sources.

use thiserror::Error;

use crate::types::StatusKind;

/// Result type alias for csv-ingest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for csv-ingest
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "http.user_agent")
        key: Option<String>,
    },

    /// HTTP client could not be constructed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A source task was cancelled or panicked
    #[error("dispatch failed: {0}")]
    Dispatch(String),

    /// The run was interrupted before every source finished
    #[error("run interrupted before all sources completed")]
    Interrupted,

    /// Internal consistency check failed (programming defect)
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            Error::Dispatch(format!("source task was cancelled: {}", err))
        } else {
            Error::Dispatch(format!("source task panicked: {}", err))
        }
    }
}

/// Why a source could not be opened.
///
/// Each variant maps onto exactly one failing [`StatusKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The identifier was absent or empty
    #[error("source identifier is absent or empty")]
    EmptyIdentifier,

    /// Connecting to or reading from the source failed
    #[error("transport error: {0}")]
    Transport(String),

    /// The local path does not resolve to a readable file
    #[error("file not found: {0}")]
    NotFound(String),

    /// The HTTP server answered with something other than 200
    #[error("unexpected HTTP response code {0}")]
    BadResponseCode(u16),
}

impl FetchFailure {
    /// Terminal status for a source that failed this way
    pub fn status(&self) -> StatusKind {
        match self {
            FetchFailure::EmptyIdentifier => StatusKind::EmptyOrInvalidIdentifier,
            FetchFailure::Transport(_) => StatusKind::TransportError,
            FetchFailure::NotFound(_) => StatusKind::NotFound,
            FetchFailure::BadResponseCode(_) => StatusKind::BadResponseCode,
        }
    }

    /// HTTP response code, only known when the server actually answered
    pub fn response_code(&self) -> Option<u16> {
        match self {
            FetchFailure::BadResponseCode(code) => Some(*code),
            _ => None,
        }
    }
}

/// Why a single CSV line was not turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineRejection {
    /// The line did not split into exactly three fields
    #[error("expected 3 fields, found {found}")]
    FieldCount {
        /// Number of comma-separated fields actually present
        found: usize,
    },

    /// The third field is not a base-10 integer
    #[error("invalid age {value:?}: {source}")]
    InvalidAge {
        /// The trimmed text that failed to parse
        value: String,
        /// Underlying integer parse error
        #[source]
        source: std::num::ParseIntError,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failure_maps_to_status() {
        assert_eq!(
            FetchFailure::EmptyIdentifier.status(),
            StatusKind::EmptyOrInvalidIdentifier
        );
        assert_eq!(
            FetchFailure::Transport("refused".into()).status(),
            StatusKind::TransportError
        );
        assert_eq!(
            FetchFailure::NotFound("x.csv".into()).status(),
            StatusKind::NotFound
        );
        assert_eq!(
            FetchFailure::BadResponseCode(404).status(),
            StatusKind::BadResponseCode
        );
    }

    #[test]
    fn only_bad_response_code_carries_a_code() {
        assert_eq!(FetchFailure::BadResponseCode(503).response_code(), Some(503));
        assert_eq!(FetchFailure::Transport("dns".into()).response_code(), None);
        assert_eq!(FetchFailure::NotFound("a".into()).response_code(), None);
        assert_eq!(FetchFailure::EmptyIdentifier.response_code(), None);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = Error::Config {
            message: "user agent must not be empty".to_string(),
            key: Some("http.user_agent".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "configuration error: user agent must not be empty"
        );
        assert_eq!(
            Error::Interrupted.to_string(),
            "run interrupted before all sources completed"
        );
        assert_eq!(
            LineRejection::FieldCount { found: 4 }.to_string(),
            "expected 3 fields, found 4"
        );
    }

    #[tokio::test]
    async fn join_error_from_panic_becomes_dispatch_error() {
        let handle: tokio::task::JoinHandle<()> = tokio::spawn(async { panic!("boom") });
        let join_err = handle.await.unwrap_err();
        let err: Error = join_err.into();
        match err {
            Error::Dispatch(msg) => assert!(msg.contains("panicked")),
            other => panic!("expected Dispatch error, got {:?}", other),
        }
    }
}
