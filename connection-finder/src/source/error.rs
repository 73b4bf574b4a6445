//! Schedule source error types.

use std::path::PathBuf;

/// Errors from reading a schedule source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// The snapshot cannot be read. Not retried: the data is static.
    #[error("schedule data source unavailable: {0}")]
    Unavailable(String),
}

/// Errors from loading or saving a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading or writing the file failed
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid snapshot
    #[error("failed to parse snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<SnapshotError> for SourceError {
    fn from(err: SnapshotError) -> Self {
        SourceError::Unavailable(err.to_string())
    }
}
