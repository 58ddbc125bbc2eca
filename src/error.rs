use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned by a progress callback. Aborts the run that invoked it.
pub type ProgressError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Failed to open archive '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to initialize zstd decoder for '{}': {source}", .path.display())]
    Decoder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read archive: {0}")]
    Read(#[from] io::Error),

    #[error("Invalid compression value '{0}'. Supported values: 'zstd', 'plain' or omitted.")]
    InvalidCompression(String),

    #[error("Progress callback aborted the run: {0}")]
    Progress(#[source] ProgressError),

    #[error("Failed to open '{}' for export: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid JSON cell in column '{column}': {source}")]
    Json {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
