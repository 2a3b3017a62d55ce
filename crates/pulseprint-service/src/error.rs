//! Error types for the printer service.

use pulseprint_core::{EventBusError, PrinterId, PrinterStatus, ValidationError};
use thiserror::Error;

/// Errors returned by printer service operations.
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    /// A command was issued before `initialize`.
    #[error("Printer service is not initialized")]
    NotInitialized,

    /// `initialize` was called twice.
    #[error("Printer service is already initialized")]
    AlreadyInitialized,

    /// The service has been destroyed.
    #[error("Printer service has been destroyed")]
    Destroyed,

    /// No printer with this id.
    #[error("Printer not found: {0}")]
    PrinterNotFound(PrinterId),

    /// A printer with the same serial already exists.
    #[error("A printer with serial '{serial}' already exists")]
    DuplicatePrinter { serial: String },

    /// The command does not apply to the printer's current status.
    #[error("Cannot {command} printer {printer} while {status}")]
    InvalidState {
        printer: PrinterId,
        status: PrinterStatus,
        command: String,
    },

    /// The transport rejected or failed the operation.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Printer parameters failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A status payload could not be applied.
    #[error("Invalid status payload: {0}")]
    InvalidPayload(String),

    /// The event bus failed.
    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),
}

/// Errors raised by a printer transport.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("Connection to {host} failed: {reason}")]
    ConnectionFailed { host: String, reason: String },

    /// The printer is not connected.
    #[error("Printer {0} is not connected")]
    NotConnected(PrinterId),

    /// The printer refused the command.
    #[error("Command '{command}' rejected: {reason}")]
    Rejected { command: String, reason: String },

    /// The printer did not answer in time.
    #[error("Timed out after {0} ms")]
    Timeout(u64),
}

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
