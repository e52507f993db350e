//! Per-source work unit -- fetch, skip the header, parse every remaining line.

use std::collections::VecDeque;
use std::io;

use tokio::io::AsyncBufReadExt;

use crate::error::FetchFailure;
use crate::fetcher::{LineReader, OpenedSource, SourceFetcher};
use crate::parser::parse_line;
use crate::types::{Record, SourceResult, StatusKind};

/// How reading an opened source ended
#[derive(Debug)]
pub(crate) enum ReadOutcome {
    /// End-of-stream reached cleanly
    Completed,
    /// The stream failed after it was opened
    Faulted(io::Error),
}

/// Line splitter accepting `\n`, `\r\n` and a lone `\r` as terminators.
///
/// A final line without a terminator is still yielded. Invalid UTF-8 is an
/// `InvalidData` error, reported after the valid lines before it.
pub(crate) struct SourceLines {
    reader: LineReader,
    buf: Vec<u8>,
    pending: VecDeque<String>,
    fault: Option<io::Error>,
}

impl SourceLines {
    pub(crate) fn new(reader: LineReader) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
            fault: None,
        }
    }

    pub(crate) async fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Ok(Some(line));
            }
            if let Some(e) = self.fault.take() {
                return Err(e);
            }

            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
                return Ok(None);
            }

            let mut chunk = self.buf.as_slice();
            if let Some(rest) = chunk.strip_suffix(b"\n") {
                chunk = rest;
            }
            if let Some(rest) = chunk.strip_suffix(b"\r") {
                chunk = rest;
            }
            for segment in chunk.split(|&b| b == b'\r') {
                match std::str::from_utf8(segment) {
                    Ok(line) => self.pending.push_back(line.to_owned()),
                    Err(e) => {
                        self.fault = Some(io::Error::new(io::ErrorKind::InvalidData, e));
                        break;
                    }
                }
            }
        }
    }
}

/// Accumulates records and rejections while a source is read.
///
/// Status is not tracked here; it is derived once in [`finish`](Self::finish).
pub(crate) struct SourceResultBuilder {
    source_id: Option<String>,
    response_code: Option<u16>,
    records: Vec<Record>,
    rejected_lines: Vec<String>,
}

impl SourceResultBuilder {
    pub(crate) fn new(source_id: Option<String>, response_code: Option<u16>) -> Self {
        Self {
            source_id,
            response_code,
            records: Vec::new(),
            rejected_lines: Vec::new(),
        }
    }

    /// Parse a data line into the accepted or rejected list
    pub(crate) fn push_line(&mut self, line: String) {
        match parse_line(&line) {
            Ok(record) => self.records.push(record),
            Err(reason) => {
                tracing::debug!(
                    source = self.source_id.as_deref().unwrap_or(""),
                    line = %line,
                    reason = %reason,
                    "Rejected malformed line"
                );
                self.rejected_lines.push(line);
            }
        }
    }

    /// Freeze into a [`SourceResult`], deriving the final status
    pub(crate) fn finish(self, outcome: ReadOutcome) -> SourceResult {
        let status = match &outcome {
            ReadOutcome::Completed => {
                StatusKind::for_completed(self.records.len(), self.rejected_lines.len())
            }
            ReadOutcome::Faulted(_) => StatusKind::TransportError,
        };

        SourceResult {
            source_id: self.source_id,
            status,
            response_code: self.response_code,
            records: self.records,
            rejected_lines: self.rejected_lines,
        }
    }

    /// Result for a source that never produced a stream
    pub(crate) fn unavailable(source_id: Option<String>, failure: &FetchFailure) -> SourceResult {
        SourceResult {
            source_id,
            status: failure.status(),
            response_code: failure.response_code(),
            records: Vec::new(),
            rejected_lines: Vec::new(),
        }
    }
}

/// Fetch and parse one source. Never fails: every problem ends up in the
/// returned result's status.
pub(crate) async fn process_source(
    fetcher: &dyn SourceFetcher,
    source_id: Option<String>,
) -> SourceResult {
    let opened = match fetcher.open(source_id.as_deref()).await {
        Ok(opened) => opened,
        Err(failure) => {
            tracing::warn!(
                source = source_id.as_deref().unwrap_or(""),
                error = %failure,
                "Source could not be opened"
            );
            return SourceResultBuilder::unavailable(source_id, &failure);
        }
    };

    let result = read_source(source_id, opened).await;
    tracing::debug!(
        source = result.source_label(),
        status = ?result.status,
        accepted = result.records.len(),
        rejected = result.rejected_lines.len(),
        "Source processed"
    );
    result
}

/// Read an opened source to the end. The stream is dropped before returning,
/// on both the clean and the faulted path.
pub(crate) async fn read_source(source_id: Option<String>, opened: OpenedSource) -> SourceResult {
    let OpenedSource {
        reader,
        response_code,
    } = opened;
    let mut builder = SourceResultBuilder::new(source_id, response_code);
    let mut lines = SourceLines::new(reader);

    let outcome = match lines.next_line().await {
        // Header: discarded, never validated
        Ok(Some(_)) => loop {
            match lines.next_line().await {
                Ok(Some(line)) => builder.push_line(line),
                Ok(None) => break ReadOutcome::Completed,
                Err(e) => break ReadOutcome::Faulted(e),
            }
        },
        Ok(None) => ReadOutcome::Completed,
        Err(e) => ReadOutcome::Faulted(e),
    };
    drop(lines);

    if let ReadOutcome::Faulted(e) = &outcome {
        tracing::warn!(
            source = builder.source_id.as_deref().unwrap_or(""),
            error = %e,
            "Read failed mid-stream, keeping partial results"
        );
    }

    builder.finish(outcome)
}
