//! Local filesystem sources.

use tokio::io::BufReader;

use crate::error::FetchFailure;

use super::OpenedSource;

/// Open `path` for buffered reading.
///
/// Anything that prevents reading a regular file (missing path, directory,
/// permission denied) is reported as [`FetchFailure::NotFound`].
pub(super) async fn open(path: &str) -> Result<OpenedSource, FetchFailure> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| FetchFailure::NotFound(format!("{}: {}", path, e)))?;

    // Opening a directory succeeds on some platforms; reading it would not.
    let metadata = file
        .metadata()
        .await
        .map_err(|e| FetchFailure::NotFound(format!("{}: {}", path, e)))?;
    if metadata.is_dir() {
        return Err(FetchFailure::NotFound(format!("{} is a directory", path)));
    }

    Ok(OpenedSource::new(BufReader::new(file), None))
}
