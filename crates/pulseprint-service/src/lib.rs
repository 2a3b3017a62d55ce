//! # PulsePrint Service
//!
//! The printer service owns the printer collection, executes commands
//! through a [`PrinterTransport`] and announces every change on the event
//! bus. A simulated transport and status simulator stand in for real
//! printers.

pub mod command;
pub mod config;
pub mod error;
pub mod service;
pub mod simulation;
pub mod transport;
pub mod wire;

pub use command::PrintCommand;
pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult, TransportError};
pub use service::{LocalPrinterService, PrinterService};
pub use transport::{MqttConnectionParams, PrinterTransport, SimulatedTransport};
pub use wire::{ErrorPayload, PrintJobPayload, PrinterStatusPayload};
