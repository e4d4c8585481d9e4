//! Error types for the Transaction Loader

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading transaction data
///
/// Every variant means the data is unavailable: callers report the message
/// and continue with an empty dataset.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Source file does not exist
    #[error("Data unavailable: source not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Source exists but could not be read
    #[error("Data unavailable: could not read {}: {source}", path.display())]
    Unreadable {
        /// Path of the source
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File extension is not a supported tabular format
    #[error("Data unavailable: unsupported source format '{0}' (expected .csv, .json or .xlsx)")]
    UnsupportedFormat(String),

    /// One or more required columns are absent
    #[error("Data unavailable: missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A data row could not be interpreted
    #[error("Data unavailable: malformed row {row}: {reason}")]
    MalformedRow {
        /// 1-based data row number (header excluded)
        row: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The table structure itself could not be parsed
    #[error("Data unavailable: {0}")]
    Parse(String),
}

impl From<csv::Error> for LoaderError {
    fn from(e: csv::Error) -> Self {
        LoaderError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(e: serde_json::Error) -> Self {
        LoaderError::Parse(e.to_string())
    }
}

impl From<calamine::Error> for LoaderError {
    fn from(e: calamine::Error) -> Self {
        LoaderError::Parse(e.to_string())
    }
}
