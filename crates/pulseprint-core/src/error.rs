//! Error handling for PulsePrint
//!
//! Provides the error types shared by every layer of the application:
//! - Validation errors for user-supplied printer parameters
//! - A unified `Error` used by the core data model
//!
//! Crate-specific errors (service, settings, transfer) live in their crates
//! and wrap these where needed. All error types use `thiserror`.

use thiserror::Error;

/// Validation error type
///
/// Raised when printer parameters supplied by the user (add-printer form,
/// import file) do not describe a reachable printer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// The IP address could not be parsed
    #[error("Invalid IP address: {ip}")]
    InvalidIp {
        /// The rejected address.
        ip: String,
    },

    /// A field value is malformed
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ValidationError {
    /// Shorthand for a missing field error
    pub fn missing(field: impl Into<String>) -> Self {
        ValidationError::MissingField {
            field: field.into(),
        }
    }
}

/// Main error type for PulsePrint core
///
/// A unified error type for operations on the printer data model.
#[derive(Error, Debug)]
pub enum Error {
    /// Validation error
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The printer record is inconsistent
    #[error("Invalid printer {id}: {reason}")]
    InvalidPrinter {
        /// The printer identifier.
        id: String,
        /// What is wrong with the record.
        reason: String,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
