//! Error types for the analysis pipeline

use thiserror::Error;

/// Errors raised before any analysis work is done
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// A caller-supplied parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
