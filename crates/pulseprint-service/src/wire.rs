//! Status payloads from the native printer backend
//!
//! The backend reports printer status as snake_case JSON. These types mirror
//! that shape and convert into the domain model.

use crate::error::{ServiceError, ServiceResult};
use pulseprint_core::{
    FilamentInfo, PrintJob, Printer, PrinterError, PrinterStatus, PrinterTemperatures,
};
use serde::{Deserialize, Serialize};

/// A full status report for one printer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterStatusPayload {
    /// Status name, either lowercase (`printing`) or a gcode state (`RUNNING`)
    pub status: String,
    /// Temperatures; unchanged when absent
    #[serde(default)]
    pub temperatures: Option<PrinterTemperatures>,
    /// Active job
    #[serde(default)]
    pub print: Option<PrintJobPayload>,
    /// Loaded filament
    #[serde(default)]
    pub filament: Option<FilamentInfo>,
    /// Current error
    #[serde(default)]
    pub error: Option<ErrorPayload>,
}

/// Print job as reported by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrintJobPayload {
    pub progress: f64,
    pub time_remaining: u64,
    #[serde(default)]
    pub estimated_total_time: Option<u64>,
    pub file_name: String,
    #[serde(default)]
    pub print_type: Option<String>,
    pub layer_current: u32,
    pub layer_total: u32,
    #[serde(default)]
    pub speed_level: Option<u8>,
    #[serde(default)]
    pub fan_speed: Option<u8>,
    #[serde(default)]
    pub stage: Option<i64>,
    #[serde(default)]
    pub lifecycle: Option<String>,
}

impl PrintJobPayload {
    /// Total print time; derived from progress and time remaining when the
    /// backend leaves it out
    pub fn estimated_total_time(&self) -> u64 {
        if let Some(total) = self.estimated_total_time {
            return total;
        }
        let progress = self.progress.clamp(0.0, 100.0);
        if progress <= 0.0 || progress >= 100.0 {
            return self.time_remaining;
        }
        (self.time_remaining as f64 * 100.0 / (100.0 - progress)).round() as u64
    }
}

impl From<&PrintJobPayload> for PrintJob {
    fn from(payload: &PrintJobPayload) -> Self {
        let layer_current = if payload.layer_total > 0 {
            payload.layer_current.min(payload.layer_total)
        } else {
            payload.layer_current
        };
        PrintJob {
            progress: payload.progress.clamp(0.0, 100.0),
            file_name: payload.file_name.clone(),
            layer_current,
            layer_total: payload.layer_total,
            time_remaining: payload.time_remaining,
            estimated_total_time: payload.estimated_total_time(),
        }
    }
}

/// Error as reported by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub print_error: i64,
    pub error_code: i64,
    pub stage: i64,
    pub lifecycle: String,
    pub gcode_state: String,
    pub message: String,
}

impl From<&ErrorPayload> for PrinterError {
    fn from(payload: &ErrorPayload) -> Self {
        PrinterError {
            print_error: payload.print_error,
            error_code: payload.error_code,
            stage: payload.stage,
            lifecycle: payload.lifecycle.clone(),
            gcode_state: payload.gcode_state.clone(),
            message: payload.message.clone(),
        }
    }
}

impl PrinterStatusPayload {
    /// Parse the reported status
    pub fn parsed_status(&self) -> ServiceResult<PrinterStatus> {
        PrinterStatus::parse(&self.status)
            .ok_or_else(|| ServiceError::InvalidPayload(format!("unknown status '{}'", self.status)))
    }

    /// Apply the report to a printer record
    ///
    /// The record is left untouched if the status cannot be parsed.
    pub fn apply_to(&self, printer: &mut Printer) -> ServiceResult<()> {
        let status = self.parsed_status()?;

        printer.status = status;
        if let Some(temperatures) = self.temperatures {
            printer.temperatures = temperatures;
        }
        printer.print = self.print.as_ref().map(PrintJob::from);
        if self.filament.is_some() || status == PrinterStatus::Offline {
            printer.filament = self.filament.clone();
        }
        printer.error = self.error.as_ref().map(PrinterError::from);
        printer.normalize();
        printer.touch();
        Ok(())
    }
}
