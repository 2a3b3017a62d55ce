//! Error types for the transfer crate.
//!
//! File-level failures are `TransferError`s. Problems with individual
//! records are collected as strings in `ImportResult::errors` instead.

use std::io;
use thiserror::Error;

/// Errors that can occur while importing or exporting printer lists.
#[derive(Error, Debug)]
pub enum TransferError {
    /// The file format is not supported.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The document could not be parsed as a printer list.
    #[error("Failed to parse {format} file: {reason}")]
    Parse { format: String, reason: String },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV reading/writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TransferError {
    /// Shorthand for a parse error
    pub fn parse(format: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        TransferError::Parse {
            format: format.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;
