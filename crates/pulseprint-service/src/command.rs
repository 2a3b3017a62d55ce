//! Print commands
//!
//! Commands sent to a printer, the statuses they are valid in, and their
//! MQTT request body.

use pulseprint_core::PrinterStatus;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A print control command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PrintCommand {
    /// Start printing a file already on the printer's storage
    Start {
        file_name: String,
        #[serde(default)]
        layer_total: u32,
        #[serde(default)]
        estimated_total_time: u64,
    },
    /// Pause the running print
    Pause,
    /// Resume a paused print
    Resume,
    /// Abort the current print
    Stop,
}

impl PrintCommand {
    /// Start a print with no layer or time estimate
    pub fn start(file_name: impl Into<String>) -> Self {
        PrintCommand::Start {
            file_name: file_name.into(),
            layer_total: 0,
            estimated_total_time: 0,
        }
    }

    /// Command name, as used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            PrintCommand::Start { .. } => "start",
            PrintCommand::Pause => "pause",
            PrintCommand::Resume => "resume",
            PrintCommand::Stop => "stop",
        }
    }

    /// Whether the command may be sent to a printer in this status
    pub fn allowed_from(&self, status: PrinterStatus) -> bool {
        match self {
            PrintCommand::Start { .. } => status == PrinterStatus::Idle,
            PrintCommand::Pause => status == PrinterStatus::Printing,
            PrintCommand::Resume => status == PrinterStatus::Paused,
            PrintCommand::Stop => status.has_job(),
        }
    }

    /// Status the printer is in once the command succeeds
    pub fn resulting_status(&self) -> PrinterStatus {
        match self {
            PrintCommand::Start { .. } | PrintCommand::Resume => PrinterStatus::Printing,
            PrintCommand::Pause => PrinterStatus::Paused,
            PrintCommand::Stop => PrinterStatus::Idle,
        }
    }

    /// Request body published to the printer's `device/<serial>/request` topic
    pub fn to_mqtt_payload(&self, sequence_id: u64) -> serde_json::Value {
        let sequence_id = sequence_id.to_string();
        match self {
            PrintCommand::Start { file_name, .. } => json!({
                "print": {
                    "sequence_id": sequence_id,
                    "command": "project_file",
                    "param": "Metadata/plate_1.gcode",
                    "subtask_name": file_name,
                    "url": format!("file:///sdcard/{}", file_name),
                }
            }),
            other => json!({
                "print": {
                    "sequence_id": sequence_id,
                    "command": other.name(),
                }
            }),
        }
    }
}

impl std::fmt::Display for PrintCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
