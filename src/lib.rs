//! # csv-ingest
//!
//! Concurrent CSV ingestion with age statistics.
//!
//! Every source (a local path or an `http://` / `https://` URL) is fetched
//! and parsed in its own task. Results come back in submission order, each
//! with a [`StatusKind`] describing what happened to it, and all accepted
//! records are merged into one [`AggregateStatistics`].
//!
//! ## Design
//!
//! - **Failures are data** - a missing file, a 404 or a malformed line only
//!   affects its own source; the run still completes
//! - **No concurrency ceiling** - one Tokio task per source
//! - **Library-first** - structured [`RunReport`] out, rendering is optional
//!
//! ## Quick Start
//!
//! ```no_run
//! use csv_ingest::{Config, CsvProcessor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let processor = CsvProcessor::new(Config::default())?;
//!
//!     let report = processor
//!         .run(["./people.csv", "https://example.com/people.csv"])
//!         .await?;
//!
//!     for summary in report.summaries() {
//!         println!("{:?}: {}", summary.source_id, summary.description);
//!     }
//!     println!("{}", report);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## CSV format
//!
//! The first line is a header and is skipped. Every other line must be
//! `first name, last name, age` with an integer age. Whitespace around fields
//! is ignored; quoting is not supported.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Record merging and median/average computation
pub mod aggregate;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Source retrieval (HTTP and local files)
pub mod fetcher;
/// CSV line parsing
pub mod parser;
/// Concurrent ingestion runs
pub mod processor;
/// Plain-text report rendering
pub mod report;
/// Core types
pub mod types;

pub use aggregate::aggregate;
pub use config::{Config, HttpConfig};
pub use error::{Error, FetchFailure, LineRejection, Result};
pub use fetcher::{DefaultSourceFetcher, OpenedSource, SourceFetcher};
pub use processor::CsvProcessor;
pub use types::{
    AggregateStatistics, Record, RunMetrics, RunReport, SourceId, SourceResult, SourceSummary,
    StatusKind,
};

/// Re-exported so callers can build tokens for
/// [`CsvProcessor::run_with_cancel`] without depending on tokio-util directly
pub use tokio_util::sync::CancellationToken;

/// Run `processor` over `sources`, aborting on SIGTERM or SIGINT (Ctrl+C).
///
/// A signal received before every source finishes turns the whole run into
/// [`Error::Interrupted`]; no partial statistics are produced.
///
/// # Example
///
/// ```no_run
/// use csv_ingest::{Config, CsvProcessor, run_until_interrupted};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let processor = CsvProcessor::new(Config::default())?;
///     let report = run_until_interrupted(&processor, ["people.csv"]).await?;
///     println!("{}", report);
///     Ok(())
/// }
/// ```
pub async fn run_until_interrupted<I, S>(processor: &CsvProcessor, sources: I) -> Result<RunReport>
where
    I: IntoIterator<Item = S>,
    S: Into<SourceId>,
{
    let cancel_token = CancellationToken::new();
    let trigger = cancel_token.clone();
    let watcher = tokio::spawn(async move {
        wait_for_signal().await;
        trigger.cancel();
    });

    let result = processor.run_with_cancel(sources, cancel_token).await;
    watcher.abort();
    result
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM, interrupting run"),
                _ = sigint.recv() => tracing::info!("Received SIGINT, interrupting run"),
            }
        }
        // Handlers may fail to register in restricted environments (containers, tests)
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register signal handlers, falling back to ctrl_c");
            wait_for_ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, interrupting run"),
        Err(e) => {
            // No signal source: the run can only end on its own
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
