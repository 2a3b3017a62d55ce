//! # PulsePrint Core
//!
//! Core types and utilities for PulsePrint.
//! Provides the printer data model, the error hierarchy shared by the
//! other crates, and the event bus that carries printer service events
//! to subscribers.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod types;

pub use data::{
    AddPrinterParams, FilamentInfo, PrintJob, Printer, PrinterError, PrinterId, PrinterStatistics,
    PrinterStatus, PrinterTemperatures,
};

pub use error::{Error, Result, ValidationError};

// Re-export event bus for convenience
pub use event_bus::{
    EventBus, EventBusConfig, EventBusError, EventFilter, EventKind, PrinterServiceEvent,
    SubscriptionId,
};

pub use types::{shared_printers, EventHandler, SharedPrinters, SnapshotHandler};
