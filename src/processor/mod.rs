//! Ingestion run orchestration split into focused submodules:
//! - [`source_task`] - Fetch + parse for a single source, status derivation
//! - [`dispatcher`] - One task per source, ordered join, fatal-error handling
//! - [`metrics`] - Elapsed time and peak concurrency of the dispatch phase

mod dispatcher;
pub mod metrics;
mod source_task;


use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::aggregate::aggregate;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{DefaultSourceFetcher, SourceFetcher};
use crate::types::{RunReport, SourceId};

/// Entry point for ingestion runs (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct CsvProcessor {
    /// Configuration the processor was built with
    config: Arc<Config>,
    /// Source transport shared by every task
    fetcher: Arc<dyn SourceFetcher>,
}

impl CsvProcessor {
    /// Create a processor using the default HTTP/file fetcher
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csv_ingest::{Config, CsvProcessor};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let processor = CsvProcessor::new(Config::default())?;
    ///     let report = processor
    ///         .run(["./data/people.csv", "https://example.com/more.csv"])
    ///         .await?;
    ///
    ///     println!("median age: {:.2}", report.statistics.median_age);
    ///     Ok(())
    /// }
    /// ```
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let fetcher = DefaultSourceFetcher::new(&config.http)?;
        Ok(Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
        })
    }

    /// Create a processor with a custom [`SourceFetcher`]
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn SourceFetcher>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            fetcher,
        })
    }

    /// Configuration this processor was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ingest every source and compute statistics.
    ///
    /// Always waits for every source to finish. Per-source failures are
    /// reported in the returned [`RunReport`], not as errors.
    pub async fn run<I, S>(&self, sources: I) -> Result<RunReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<SourceId>,
    {
        self.run_with_cancel(sources, CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), but aborts with
    /// [`Error::Interrupted`](crate::Error::Interrupted) once `cancel_token`
    /// fires. An interrupted run produces no statistics.
    pub async fn run_with_cancel<I, S>(
        &self,
        sources: I,
        cancel_token: CancellationToken,
    ) -> Result<RunReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<SourceId>,
    {
        let sources: Vec<SourceId> = sources.into_iter().map(Into::into).collect();

        let (results, metrics) =
            dispatcher::dispatch(Arc::clone(&self.fetcher), sources, cancel_token).await?;

        // Sorting and statistics are outside the measured phase
        let statistics = aggregate(&results);
        tracing::info!(
            records = statistics.record_count,
            average_age = statistics.average_age,
            median_age = statistics.median_age,
            "Statistics computed"
        );

        Ok(RunReport {
            statistics,
            sources: results,
            metrics,
        })
    }
}

impl std::fmt::Debug for CsvProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvProcessor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
