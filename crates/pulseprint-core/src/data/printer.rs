//! Printer record
//!
//! A `Printer` is the in-memory representation of one physical or simulated
//! printer's current status. Records are owned by the printer service; views
//! only ever hold clones refreshed from service events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique printer identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrinterId(pub String);

impl PrinterId {
    /// Create an identifier from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(format!("printer-{}", uuid::Uuid::new_v4()))
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrinterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PrinterId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PrinterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Printer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterStatus {
    /// Connected, not printing
    Idle,
    /// Running a print job
    Printing,
    /// Print job paused
    Paused,
    /// Printer reported an error
    Error,
    /// Not connected
    Offline,
    /// Connection in progress
    Connecting,
}

impl PrinterStatus {
    /// All statuses, in display order
    pub const ALL: [PrinterStatus; 6] = [
        PrinterStatus::Idle,
        PrinterStatus::Printing,
        PrinterStatus::Paused,
        PrinterStatus::Error,
        PrinterStatus::Offline,
        PrinterStatus::Connecting,
    ];

    /// Human readable label used by cards and tables
    pub fn label(&self) -> &'static str {
        match self {
            PrinterStatus::Idle => "Idle",
            PrinterStatus::Printing => "Printing",
            PrinterStatus::Paused => "Paused",
            PrinterStatus::Error => "Error",
            PrinterStatus::Offline => "Offline",
            PrinterStatus::Connecting => "Connecting",
        }
    }

    /// Whether the printer is reachable
    pub fn is_online(&self) -> bool {
        !matches!(self, PrinterStatus::Offline)
    }

    /// Whether a print job belongs to this status
    pub fn has_job(&self) -> bool {
        matches!(self, PrinterStatus::Printing | PrinterStatus::Paused)
    }

    /// Parse a status name as sent by the native backend.
    ///
    /// Accepts the lowercase names plus the gcode states reported by the
    /// printer firmware (`RUNNING`, `PAUSE`, `FAILED`, `FINISH`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" | "finish" | "finished" | "ready" => Some(PrinterStatus::Idle),
            "printing" | "running" | "prepare" => Some(PrinterStatus::Printing),
            "paused" | "pause" => Some(PrinterStatus::Paused),
            "error" | "failed" => Some(PrinterStatus::Error),
            "offline" | "disconnected" => Some(PrinterStatus::Offline),
            "connecting" => Some(PrinterStatus::Connecting),
            _ => None,
        }
    }
}

impl fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Temperatures in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrinterTemperatures {
    /// Nozzle temperature
    pub nozzle: f64,
    /// Bed temperature
    pub bed: f64,
    /// Chamber temperature
    pub chamber: f64,
}

impl PrinterTemperatures {
    /// Room temperature on every sensor
    pub fn ambient() -> Self {
        Self {
            nozzle: 25.0,
            bed: 25.0,
            chamber: 25.0,
        }
    }
}

/// Active print job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    /// Progress in percent (0-100)
    pub progress: f64,
    /// Name of the file being printed
    pub file_name: String,
    /// Current layer
    pub layer_current: u32,
    /// Total layers
    pub layer_total: u32,
    /// Seconds remaining
    pub time_remaining: u64,
    /// Estimated total print time in seconds
    pub estimated_total_time: u64,
}

impl PrintJob {
    /// Start a new job at zero progress
    pub fn new(file_name: impl Into<String>, layer_total: u32, estimated_total_time: u64) -> Self {
        Self {
            progress: 0.0,
            file_name: file_name.into(),
            layer_current: 0,
            layer_total,
            time_remaining: estimated_total_time,
            estimated_total_time,
        }
    }

    /// Whether the job has reached 100%
    pub fn is_complete(&self) -> bool {
        self.progress >= 100.0
    }
}

/// Loaded filament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilamentInfo {
    /// Material, e.g. "PLA"
    #[serde(rename = "type")]
    pub filament_type: String,
    /// Hex color, e.g. "#ff0000"
    pub color: String,
    /// Remaining amount in percent
    pub remaining: f64,
}

/// Error reported by a printer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterError {
    /// Raw print error code
    pub print_error: i64,
    /// Device error code
    pub error_code: i64,
    /// Print stage at the time of the error
    pub stage: i64,
    /// Lifecycle reported by the firmware
    pub lifecycle: String,
    /// G-code state reported by the firmware
    pub gcode_state: String,
    /// Human readable message
    pub message: String,
}

/// A printer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Printer {
    /// Unique identifier
    pub id: PrinterId,
    /// Display name
    pub name: String,
    /// Printer model, e.g. "X1C"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// LAN address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// LAN access code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
    /// Device serial number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    /// Current status
    pub status: PrinterStatus,
    /// Current temperatures
    pub temperatures: PrinterTemperatures,
    /// Active job, only while printing or paused
    pub print: Option<PrintJob>,
    /// Loaded filament, absent while offline
    pub filament: Option<FilamentInfo>,
    /// Current error, only in the error state
    pub error: Option<PrinterError>,
    /// Time of the last status change
    pub last_update: DateTime<Utc>,
}

impl Printer {
    /// Create an offline printer with no job, filament or error
    pub fn new(id: impl Into<PrinterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model: None,
            ip: None,
            access_code: None,
            serial: None,
            status: PrinterStatus::Offline,
            temperatures: PrinterTemperatures::ambient(),
            print: None,
            filament: None,
            error: None,
            last_update: Utc::now(),
        }
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set LAN connection details
    pub fn with_connection(
        mut self,
        ip: impl Into<String>,
        access_code: impl Into<String>,
        serial: impl Into<String>,
    ) -> Self {
        self.ip = Some(ip.into());
        self.access_code = Some(access_code.into());
        self.serial = Some(serial.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: PrinterStatus) -> Self {
        self.status = status;
        self
    }

    /// Set temperatures
    pub fn with_temperatures(mut self, temperatures: PrinterTemperatures) -> Self {
        self.temperatures = temperatures;
        self
    }

    /// Set the active job
    pub fn with_print(mut self, print: PrintJob) -> Self {
        self.print = Some(print);
        self
    }

    /// Set the loaded filament
    pub fn with_filament(mut self, filament: FilamentInfo) -> Self {
        self.filament = Some(filament);
        self
    }

    /// Set the current error
    pub fn with_error(mut self, error: PrinterError) -> Self {
        self.error = Some(error);
        self
    }

    /// Drop sub-records that do not apply to the current status.
    ///
    /// `print` survives only while printing or paused, `error` only in the
    /// error state, and `filament` is unknown while offline.
    pub fn normalize(&mut self) {
        if !self.status.has_job() {
            self.print = None;
        }
        if self.status != PrinterStatus::Error {
            self.error = None;
        }
        if self.status == PrinterStatus::Offline {
            self.filament = None;
        }
    }

    /// Change status, normalize, and stamp the update time
    pub fn set_status(&mut self, status: PrinterStatus) {
        self.status = status;
        self.normalize();
        self.touch();
    }

    /// Stamp the update time
    pub fn touch(&mut self) {
        self.last_update = Utc::now();
    }

    /// Check whether sub-records agree with the status
    pub fn is_consistent(&self) -> bool {
        (self.print.is_none() || self.status.has_job())
            && (self.error.is_none() || self.status == PrinterStatus::Error)
            && (self.filament.is_none() || self.status != PrinterStatus::Offline)
    }

    /// Print progress in percent, when a job is active
    pub fn progress(&self) -> Option<f64> {
        self.print.as_ref().map(|p| p.progress)
    }
}
