//! Data models for printers, jobs, and fleet statistics
//!
//! This module provides:
//! - The printer record owned by the printer service
//! - Print job, filament and error sub-records
//! - Parameters for adding a printer, with validation
//! - Fleet statistics shown on the dashboard

pub mod params;
pub mod printer;
pub mod statistics;

pub use params::AddPrinterParams;
pub use printer::{
    FilamentInfo, PrintJob, Printer, PrinterError, PrinterId, PrinterStatus, PrinterTemperatures,
};
pub use statistics::PrinterStatistics;
