//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Gmail API call failed.
    #[error("Gmail error: {0}")]
    Gmail(#[from] mailsift_gmail::Error),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Keyword pattern could not be compiled.
    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input file does not exist.
    #[error("Input file not found: {0}")]
    FileNotFound(String),

    /// CSV file has no rows or no header.
    #[error("CSV file is empty or has no columns")]
    EmptyCsv,

    /// Columns a command needs are absent.
    #[error("Required columns {missing:?} not found in dataset. Available columns: {available:?}")]
    MissingColumns {
        /// Columns that were asked for but not found.
        missing: Vec<String>,
        /// Columns the table does have.
        available: Vec<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
