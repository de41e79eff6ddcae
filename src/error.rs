use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a report from being produced.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("File '{}' not found.", path.display())]
    FileNotFound { path: PathBuf },

    /// The file is not valid JSON at all.
    #[error("Invalid JSON file '{}': {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file is valid JSON but a record holds a value of the wrong type.
    #[error("Malformed export: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Invalid date key '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Failed to read file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
