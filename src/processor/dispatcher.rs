//! Concurrent dispatch -- one task per source, results joined in input order.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::fetcher::SourceFetcher;
use crate::types::{RunMetrics, SourceId, SourceResult};

use super::metrics::MetricsRecorder;
use super::source_task::process_source;

/// Run every source concurrently and return their results in submission order.
///
/// Each source gets its own Tokio task with no concurrency ceiling. Results
/// are written into a slot indexed by submission position, so completion
/// order never affects output order. The returned metrics cover submission
/// through the last join only.
///
/// # Errors
///
/// Per-source failures are never errors. The run fails as a whole only if
/// - `cancel_token` fires before every task finished ([`Error::Interrupted`]),
/// - a task panics or is cancelled by the runtime ([`Error::Dispatch`]),
/// - a result slot is left empty after the join ([`Error::Internal`]).
pub(crate) async fn dispatch(
    fetcher: Arc<dyn SourceFetcher>,
    sources: Vec<SourceId>,
    cancel_token: CancellationToken,
) -> Result<(Vec<SourceResult>, RunMetrics)> {
    let total = sources.len();
    let recorder = MetricsRecorder::new();
    let mut slots: Vec<Option<SourceResult>> = (0..total).map(|_| None).collect();

    tracing::info!(sources = total, "Dispatching sources");
    let clock = recorder.start_clock();

    let mut tasks = JoinSet::new();
    for (index, source) in sources.into_iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let recorder = recorder.clone();
        tasks.spawn(async move {
            let _active = recorder.enter();
            let result = process_source(fetcher.as_ref(), source.0).await;
            (index, result)
        });
    }

    loop {
        let joined = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                tracing::error!(
                    pending = tasks.len(),
                    "Run interrupted, aborting outstanding source tasks"
                );
                tasks.abort_all();
                return Err(Error::Interrupted);
            }
            joined = tasks.join_next() => joined,
        };

        match joined {
            Some(Ok((index, result))) => {
                let slot = slots.get_mut(index).ok_or_else(|| {
                    Error::Internal(format!("result index {} out of range {}", index, total))
                })?;
                *slot = Some(result);
            }
            Some(Err(e)) => {
                tracing::error!(error = %e, "Source task failed to complete");
                tasks.abort_all();
                return Err(e.into());
            }
            None => break,
        }
    }

    let metrics = recorder.finish(clock);
    tracing::info!(
        sources = total,
        elapsed_ms = metrics.elapsed_millis(),
        peak_concurrency = metrics.peak_concurrency,
        "All sources joined"
    );

    let results = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| Error::Internal(format!("no result recorded for source #{}", index)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((results, metrics))
}
