//! Fleet statistics

use crate::data::printer::{Printer, PrinterStatus};
use serde::{Deserialize, Serialize};

/// Counts shown in the dashboard overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrinterStatistics {
    /// Number of printers
    pub total: usize,
    /// Printers that are not offline
    pub online: usize,
    /// Printers running a job
    pub printing: usize,
    /// Idle printers
    pub idle: usize,
    /// Printers in the error state
    pub error: usize,
}

impl PrinterStatistics {
    /// Count statuses across a printer collection
    pub fn from_printers(printers: &[Printer]) -> Self {
        printers.iter().fold(Self::default(), |mut stats, p| {
            stats.total += 1;
            if p.status.is_online() {
                stats.online += 1;
            }
            match p.status {
                PrinterStatus::Printing => stats.printing += 1,
                PrinterStatus::Idle => stats.idle += 1,
                PrinterStatus::Error => stats.error += 1,
                _ => {}
            }
            stats
        })
    }
}
