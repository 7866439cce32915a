//! Error types for stocklens

use thiserror::Error;

/// Main error type for stocklens
///
/// `DataUnavailable` and `InsufficientHistory` are recoverable: report
/// assembly turns them into empty reports or unchanged series. Parse-level
/// variants are hard failures surfaced to the caller.
#[derive(Error, Debug)]
pub enum StockLensError {
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Insufficient history: required {required} bars, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl StockLensError {
    /// True for conditions that report assembly recovers from locally
    /// (empty report or unchanged series) instead of propagating.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StockLensError::DataUnavailable(_) | StockLensError::InsufficientHistory { .. }
        )
    }
}

/// Result type alias for stocklens operations
pub type Result<T> = std::result::Result<T, StockLensError>;
