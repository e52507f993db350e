//! HTTP(S) sources -- single GET, status check, streamed body.

use futures::TryStreamExt;
use tokio_util::io::StreamReader;

use crate::error::FetchFailure;

use super::OpenedSource;

/// GET `source` and return its body as a line stream.
///
/// Only a 200 response is opened; any other code is reported without reading
/// the body. Failures before a response code arrives are transport errors.
pub(super) async fn open(
    client: &reqwest::Client,
    source: &str,
) -> Result<OpenedSource, FetchFailure> {
    let url = url::Url::parse(source)
        .map_err(|e| FetchFailure::Transport(format!("malformed URL '{}': {}", source, e)))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| describe_request_error(source, &e))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        tracing::debug!(source, code = status.as_u16(), "Unexpected HTTP response code");
        return Err(FetchFailure::BadResponseCode(status.as_u16()));
    }

    // Body errors surface as io::Error while reading lines and become
    // mid-stream transport faults for the caller.
    let body = response.bytes_stream().map_err(std::io::Error::other);

    Ok(OpenedSource::new(
        StreamReader::new(body),
        Some(status.as_u16()),
    ))
}

fn describe_request_error(source: &str, err: &reqwest::Error) -> FetchFailure {
    let message = if err.is_timeout() {
        format!("timed out fetching '{}': {}", source, err)
    } else if err.is_connect() {
        format!("connection failed for '{}': {}", source, err)
    } else {
        format!("failed to fetch '{}': {}", source, err)
    };
    FetchFailure::Transport(message)
}
