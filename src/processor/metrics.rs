//! Dispatch-phase metrics -- elapsed wall-clock time and peak task concurrency.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::types::RunMetrics;

/// Records how long dispatch took and how many source tasks overlapped.
///
/// The active/peak counters are the only state shared between source tasks.
/// Clones share the same counters.
#[derive(Clone, Debug, Default)]
pub struct MetricsRecorder {
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl MetricsRecorder {
    /// Create a recorder with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one task as running until the returned guard is dropped
    pub fn enter(&self) -> ActiveTaskGuard {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now_active, Ordering::SeqCst);
        ActiveTaskGuard {
            active: Arc::clone(&self.active),
        }
    }

    /// Tasks currently running
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously running tasks seen so far
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Start the wall clock for a dispatch phase
    pub fn start_clock(&self) -> PhaseClock {
        PhaseClock {
            started: Instant::now(),
        }
    }

    /// Snapshot the counters together with a stopped clock
    pub fn finish(&self, clock: PhaseClock) -> RunMetrics {
        let elapsed = clock.started.elapsed();
        RunMetrics {
            elapsed_nanos: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
            peak_concurrency: self.peak(),
        }
    }
}

/// Running clock for one dispatch phase
#[derive(Debug)]
pub struct PhaseClock {
    started: Instant,
}

/// Decrements the active-task counter when dropped, including on panic
#[derive(Debug)]
pub struct ActiveTaskGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for ActiveTaskGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_tracks_highest_overlap() {
        let recorder = MetricsRecorder::new();
        assert_eq!(recorder.peak(), 0);

        let first = recorder.enter();
        let second = recorder.enter();
        assert_eq!(recorder.active(), 2);
        assert_eq!(recorder.peak(), 2);

        drop(first);
        drop(second);
        assert_eq!(recorder.active(), 0);

        let _third = recorder.enter();
        assert_eq!(recorder.active(), 1);
        assert_eq!(recorder.peak(), 2);
    }

    #[test]
    fn clones_share_counters() {
        let recorder = MetricsRecorder::new();
        let clone = recorder.clone();
        let _guard = clone.enter();
        assert_eq!(recorder.active(), 1);
        assert_eq!(recorder.peak(), 1);
    }

    #[test]
    fn finish_reports_elapsed_and_peak() {
        let recorder = MetricsRecorder::new();
        let clock = recorder.start_clock();
        {
            let _guard = recorder.enter();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        let metrics = recorder.finish(clock);
        assert_eq!(metrics.peak_concurrency, 1);
        assert!(metrics.elapsed_nanos >= 5_000_000);
    }
}
