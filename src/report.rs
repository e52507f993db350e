//! Plain-text rendering of a [`RunReport`] for consoles and logs.

use std::fmt;

use crate::types::{AggregateStatistics, RunMetrics, RunReport, SourceResult};

const RULE: &str = "===================================";

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", RULE)?;
    writeln!(f, "  {}", title)?;
    writeln!(f, "{}", RULE)?;
    writeln!(f)
}

impl fmt::Display for AggregateStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "MEDIAN AND AVERAGE AGES")?;
        writeln!(f, "- Average age: {:.2}", self.average_age)?;
        writeln!(f, "- Median age: {:.2}", self.median_age)?;
        match &self.median_record {
            Some(record) => writeln!(
                f,
                "- Someone with the median age: {} {}",
                record.first_name, record.last_name
            )?,
            None if self.record_count == 0 => writeln!(f, "- No records were accepted.")?,
            None => writeln!(
                f,
                "- Nobody has the median age; it is the mean of the two middle ages."
            )?,
        }
        writeln!(f)
    }
}

impl fmt::Display for RunMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "METRICS")?;
        writeln!(
            f,
            "- Time spent reading sources: {} ns ({} ms)",
            self.elapsed_nanos,
            self.elapsed_millis()
        )?;
        writeln!(f, "- Peak concurrent source tasks: {}", self.peak_concurrency)?;
        writeln!(f)
    }
}

fn write_source(f: &mut fmt::Formatter<'_>, index: usize, source: &SourceResult) -> fmt::Result {
    writeln!(f, " Source #{}:", index + 1)?;
    writeln!(f, "\tIdentifier: {}", source.source_label())?;
    writeln!(f, "\tStatus: {}", source.status.description())?;
    if let Some(code) = source.response_code {
        writeln!(f, "\tResponse code: {}", code)?;
    }
    if !source.records.is_empty() {
        writeln!(f, "\tAccepted records: {}", source.records.len())?;
    }
    if !source.rejected_lines.is_empty() {
        writeln!(f, "\tRejected lines: {}", source.rejected_lines.len())?;
    }
    writeln!(f)
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.statistics)?;
        write!(f, "{}", self.metrics)?;
        heading(f, "SOURCE SUMMARIES")?;
        for (index, source) in self.sources.iter().enumerate() {
            write_source(f, index, source)?;
        }
        Ok(())
    }
}
