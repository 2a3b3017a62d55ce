//! Printer cards and table rows
//!
//! Both presentations are built from the same printer snapshot and the
//! current display settings.

use crate::helpers::{
    format_duration, format_layers, format_percent, format_temperature, NOT_AVAILABLE,
};
use pulseprint_core::{Printer, PrinterId, PrinterStatus};
use pulseprint_settings::Settings;
use serde::Serialize;

/// Column headers of the printer table
pub const TABLE_HEADER: [&str; 6] = ["Printer", "Status", "Progress", "Nozzle", "Bed", "Filament"];

/// Attention effect applied to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CardAlert {
    /// Slow flash on idle printers
    IdleFlash,
    /// Red glow on printers with errors
    ErrorFlash,
}

/// Command offered on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CardAction {
    Connect,
    Disconnect,
    Pause,
    Resume,
    Stop,
}

impl CardAction {
    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            CardAction::Connect => "Connect",
            CardAction::Disconnect => "Disconnect",
            CardAction::Pause => "Pause",
            CardAction::Resume => "Resume",
            CardAction::Stop => "Stop",
        }
    }

    /// Actions that make sense for a status
    pub fn available_for(status: PrinterStatus) -> Vec<CardAction> {
        match status {
            PrinterStatus::Offline => vec![CardAction::Connect],
            PrinterStatus::Printing => {
                vec![CardAction::Pause, CardAction::Stop, CardAction::Disconnect]
            }
            PrinterStatus::Paused => {
                vec![CardAction::Resume, CardAction::Stop, CardAction::Disconnect]
            }
            PrinterStatus::Idle | PrinterStatus::Error | PrinterStatus::Connecting => {
                vec![CardAction::Disconnect]
            }
        }
    }
}

/// Temperature block of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemperatureReadout {
    pub nozzle: String,
    pub bed: String,
    /// Hidden on compact cards
    pub chamber: Option<String>,
}

/// Progress block of a card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReadout {
    pub percent: f64,
    pub label: String,
    pub file_name: String,
    pub time_remaining: String,
    /// Hidden on compact cards
    pub layers: Option<String>,
}

/// One printer in card view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterCard {
    pub test_id: String,
    pub printer_id: PrinterId,
    pub name: String,
    pub model: Option<String>,
    pub status: PrinterStatus,
    pub status_label: &'static str,
    pub compact: bool,
    pub alert: Option<CardAlert>,
    pub temperatures: Option<TemperatureReadout>,
    pub progress: Option<ProgressReadout>,
    pub filament: Option<String>,
    pub error_message: Option<String>,
    pub actions: Vec<CardAction>,
}

impl PrinterCard {
    pub fn new(printer: &Printer, settings: &Settings) -> Self {
        let compact = settings.compact_view;

        let alert = match printer.status {
            PrinterStatus::Idle if settings.idle_notifications => Some(CardAlert::IdleFlash),
            PrinterStatus::Error if settings.error_notifications => Some(CardAlert::ErrorFlash),
            _ => None,
        };

        let temperatures = settings.show_temperatures.then(|| TemperatureReadout {
            nozzle: format_temperature(printer.temperatures.nozzle),
            bed: format_temperature(printer.temperatures.bed),
            chamber: (!compact).then(|| format_temperature(printer.temperatures.chamber)),
        });

        let progress = printer
            .print
            .as_ref()
            .filter(|_| settings.show_progress)
            .map(|job| ProgressReadout {
                percent: job.progress,
                label: format_percent(job.progress),
                file_name: job.file_name.clone(),
                time_remaining: format_duration(job.time_remaining),
                layers: if compact {
                    None
                } else {
                    format_layers(job.layer_current, job.layer_total)
                },
            });

        Self {
            test_id: card_test_id(&printer.id),
            printer_id: printer.id.clone(),
            name: printer.name.clone(),
            model: printer.model.clone(),
            status: printer.status,
            status_label: printer.status.label(),
            compact,
            alert,
            temperatures,
            progress,
            filament: filament_label(printer),
            error_message: printer.error.as_ref().map(|e| e.message.clone()),
            actions: CardAction::available_for(printer.status),
        }
    }
}

/// One printer in table view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterTableRow {
    pub test_id: String,
    pub printer_id: PrinterId,
    /// Cells in [`TABLE_HEADER`] order
    pub cells: [String; 6],
}

impl PrinterTableRow {
    pub fn new(printer: &Printer) -> Self {
        Self {
            test_id: format!("printer-row-{}", printer.id),
            printer_id: printer.id.clone(),
            cells: [
                printer.name.clone(),
                printer.status.label().to_string(),
                printer
                    .progress()
                    .map(format_percent)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                format_temperature(printer.temperatures.nozzle),
                format_temperature(printer.temperatures.bed),
                filament_label(printer).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ],
        }
    }

    /// Cell under a header, e.g. `row.cell("Status")`
    pub fn cell(&self, header: &str) -> Option<&str> {
        TABLE_HEADER
            .iter()
            .position(|h| *h == header)
            .map(|i| self.cells[i].as_str())
    }
}

/// Printers in table view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrinterTable {
    pub header: [&'static str; 6],
    pub rows: Vec<PrinterTableRow>,
}

impl PrinterTable {
    pub fn new(printers: &[Printer]) -> Self {
        Self {
            header: TABLE_HEADER,
            rows: printers.iter().map(PrinterTableRow::new).collect(),
        }
    }

    /// Rendered rows, header included
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }
}

/// Test id of a printer card, `printer-card-<id>`
pub fn card_test_id(id: &PrinterId) -> String {
    format!("printer-card-{}", id)
}

fn filament_label(printer: &Printer) -> Option<String> {
    printer.filament.as_ref().map(|f| f.filament_type.clone())
}
