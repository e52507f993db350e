//! Core types for csv-ingest

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One accepted CSV row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// First name (trimmed, may be empty)
    pub first_name: String,
    /// Last name (trimmed, may be empty)
    pub last_name: String,
    /// Age as parsed from the third column
    pub age: i32,
}

impl Record {
    /// Create a new Record
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, age: i32) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
        }
    }
}

/// Terminal processing outcome of a single source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Not processed yet (never returned from a finished run)
    #[default]
    Unprocessed,
    /// The identifier was absent or empty
    EmptyOrInvalidIdentifier,
    /// Network or I/O failure while opening or reading the source
    TransportError,
    /// Local path does not resolve to a readable file
    NotFound,
    /// HTTP response code other than 200
    BadResponseCode,
    /// Every data line parsed
    Valid,
    /// At least one data line was rejected
    ValidWithRejections,
    /// Opened, but contained no data lines
    Empty,
}

impl StatusKind {
    /// Fixed human-readable description of this status
    pub fn description(&self) -> &'static str {
        match self {
            StatusKind::Unprocessed => "This source has not been processed yet.",
            StatusKind::EmptyOrInvalidIdentifier => {
                "The identifier provided for this source was missing or empty."
            }
            StatusKind::TransportError => {
                "An I/O error occurred while retrieving or reading this source."
            }
            StatusKind::NotFound => "This file could not be found on local disk.",
            StatusKind::BadResponseCode => "The response code for this URL was not 200.",
            StatusKind::Valid => "Processed successfully; every line was valid.",
            StatusKind::ValidWithRejections => {
                "Processed successfully, but some lines were invalid and were ignored."
            }
            StatusKind::Empty => "This source contained no data rows; it may be empty or corrupt.",
        }
    }

    /// Status of a source that was read to end-of-stream without a fault
    pub fn for_completed(accepted: usize, rejected: usize) -> Self {
        if rejected > 0 {
            StatusKind::ValidWithRejections
        } else if accepted > 0 {
            StatusKind::Valid
        } else {
            StatusKind::Empty
        }
    }

    /// Whether the source stream was opened and read to the end
    pub fn is_processed(&self) -> bool {
        matches!(
            self,
            StatusKind::Valid | StatusKind::ValidWithRejections | StatusKind::Empty
        )
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Everything learned about one source during a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceResult {
    /// Identifier as submitted (`None` when absent)
    pub source_id: Option<String>,
    /// Terminal status
    pub status: StatusKind,
    /// HTTP response code, if the source was fetched over HTTP and the server answered
    pub response_code: Option<u16>,
    /// Accepted records in line order
    pub records: Vec<Record>,
    /// Rejected raw lines in line order
    pub rejected_lines: Vec<String>,
}

impl SourceResult {
    /// Identifier for display (`""` when absent)
    pub fn source_label(&self) -> &str {
        self.source_id.as_deref().unwrap_or("")
    }

    /// Condensed view of this result
    pub fn summary(&self) -> SourceSummary {
        SourceSummary {
            source_id: self.source_id.clone(),
            status: self.status,
            description: self.status.description(),
            response_code: self.response_code,
            accepted: self.records.len(),
            rejected: self.rejected_lines.len(),
        }
    }
}

/// Per-source diagnostics without the record payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    /// Identifier as submitted (`None` when absent)
    pub source_id: Option<String>,
    /// Terminal status
    pub status: StatusKind,
    /// Human-readable status description
    pub description: &'static str,
    /// HTTP response code, if any
    pub response_code: Option<u16>,
    /// Number of accepted records
    pub accepted: usize,
    /// Number of rejected lines
    pub rejected: usize,
}

/// Statistics over every accepted record of a run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStatistics {
    /// Total number of records the statistics were computed from
    pub record_count: usize,
    /// Arithmetic mean age (0 when there are no records)
    pub average_age: f64,
    /// Median age (0 when there are no records)
    pub median_age: f64,
    /// First record, in age order, whose age equals the median exactly
    pub median_record: Option<Record>,
}

/// Timing and concurrency observed during the fetch+parse phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Wall-clock time from first submission to last join, in nanoseconds
    pub elapsed_nanos: u64,
    /// Highest number of source tasks running at the same time
    pub peak_concurrency: usize,
}

impl RunMetrics {
    /// Elapsed time as a Duration
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos)
    }

    /// Elapsed time in whole milliseconds
    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_nanos / 1_000_000
    }
}

/// Complete outcome of one ingestion run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Statistics over every accepted record
    pub statistics: AggregateStatistics,
    /// Per-source results, in submission order
    pub sources: Vec<SourceResult>,
    /// Fetch+parse phase metrics
    pub metrics: RunMetrics,
}

impl RunReport {
    /// Per-source summaries, in submission order
    pub fn summaries(&self) -> Vec<SourceSummary> {
        self.sources.iter().map(SourceResult::summary).collect()
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A source identifier as submitted by the caller.
///
/// Wraps `Option<String>` so absent identifiers can be submitted alongside
/// real ones. Conversions exist from `&str`, `String` and their `Option`s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SourceId(pub Option<String>);

impl SourceId {
    /// Borrow the identifier, if present
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self(Some(id.to_string()))
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        Self(Some(id))
    }
}

impl From<&String> for SourceId {
    fn from(id: &String) -> Self {
        Self(Some(id.clone()))
    }
}

impl From<Option<String>> for SourceId {
    fn from(id: Option<String>) -> Self {
        Self(id)
    }
}

impl From<Option<&str>> for SourceId {
    fn from(id: Option<&str>) -> Self {
        Self(id.map(str::to_string))
    }
}
