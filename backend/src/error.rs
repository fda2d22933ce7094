use std::path::PathBuf;

use thiserror::Error;

/// Failures reading one snapshot file. Always recoverable: callers log and
/// fall back to the previous view or skip the file.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot {path} is not a JSON array of records")]
    NotAnArray { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum AppError {
    /// No scoring collaborator could be located. Fatal at startup.
    #[error("scorer unavailable: {0}")]
    ScorerUnavailable(String),

    #[error("invalid configuration {key}={value:?}: {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("refresh failed: {0}")]
    Refresh(#[from] SnapshotError),

    #[error("scoring failed for pool {pool_id}: {reason}")]
    Scoring { pool_id: String, reason: String },
}
