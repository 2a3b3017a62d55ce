//! Event type definitions for the event bus.
//!
//! Every change to the printer collection is announced with a
//! `PrinterServiceEvent`. Events are cloneable and serializable so they can
//! be forwarded to a web view or logged.

use serde::{Deserialize, Serialize};

use crate::data::Printer;

/// Events emitted by the printer service
///
/// Serialized as `{"type": "printer_added", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum PrinterServiceEvent {
    /// Service finished initializing; carries the full collection
    Initialized(Vec<Printer>),
    /// The collection changed; carries the full collection
    Updated(Vec<Printer>),
    /// A printer was added
    PrinterAdded(Printer),
    /// A printer was removed
    PrinterRemoved(Printer),
    /// A print was paused
    PrinterPaused(Printer),
    /// A paused print was resumed
    PrinterResumed(Printer),
    /// A print was stopped
    PrinterStopped(Printer),
    /// A printer connection was established
    PrinterConnected(Printer),
    /// A printer connection was closed
    PrinterDisconnected(Printer),
}

impl PrinterServiceEvent {
    /// Get the kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            PrinterServiceEvent::Initialized(_) => EventKind::Initialized,
            PrinterServiceEvent::Updated(_) => EventKind::Updated,
            PrinterServiceEvent::PrinterAdded(_) => EventKind::PrinterAdded,
            PrinterServiceEvent::PrinterRemoved(_) => EventKind::PrinterRemoved,
            PrinterServiceEvent::PrinterPaused(_) => EventKind::PrinterPaused,
            PrinterServiceEvent::PrinterResumed(_) => EventKind::PrinterResumed,
            PrinterServiceEvent::PrinterStopped(_) => EventKind::PrinterStopped,
            PrinterServiceEvent::PrinterConnected(_) => EventKind::PrinterConnected,
            PrinterServiceEvent::PrinterDisconnected(_) => EventKind::PrinterDisconnected,
        }
    }

    /// The full collection, for `Initialized` and `Updated`
    pub fn snapshot(&self) -> Option<&[Printer]> {
        match self {
            PrinterServiceEvent::Initialized(printers) | PrinterServiceEvent::Updated(printers) => {
                Some(printers)
            }
            _ => None,
        }
    }

    /// The single printer, for every other variant
    pub fn printer(&self) -> Option<&Printer> {
        match self {
            PrinterServiceEvent::Initialized(_) | PrinterServiceEvent::Updated(_) => None,
            PrinterServiceEvent::PrinterAdded(p)
            | PrinterServiceEvent::PrinterRemoved(p)
            | PrinterServiceEvent::PrinterPaused(p)
            | PrinterServiceEvent::PrinterResumed(p)
            | PrinterServiceEvent::PrinterStopped(p)
            | PrinterServiceEvent::PrinterConnected(p)
            | PrinterServiceEvent::PrinterDisconnected(p) => Some(p),
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match (self.snapshot(), self.printer()) {
            (Some(printers), _) => format!("{} ({} printers)", self.kind(), printers.len()),
            (_, Some(printer)) => format!("{} ({})", self.kind(), printer.name),
            _ => self.kind().to_string(),
        }
    }
}

/// Event kind for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Service initialized
    Initialized,
    /// Collection changed
    Updated,
    /// Printer added
    PrinterAdded,
    /// Printer removed
    PrinterRemoved,
    /// Print paused
    PrinterPaused,
    /// Print resumed
    PrinterResumed,
    /// Print stopped
    PrinterStopped,
    /// Printer connected
    PrinterConnected,
    /// Printer disconnected
    PrinterDisconnected,
}

impl EventKind {
    /// Whether events of this kind carry the full collection
    pub fn carries_snapshot(&self) -> bool {
        matches!(self, EventKind::Initialized | EventKind::Updated)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventKind::Initialized => "initialized",
            EventKind::Updated => "updated",
            EventKind::PrinterAdded => "printer_added",
            EventKind::PrinterRemoved => "printer_removed",
            EventKind::PrinterPaused => "printer_paused",
            EventKind::PrinterResumed => "printer_resumed",
            EventKind::PrinterStopped => "printer_stopped",
            EventKind::PrinterConnected => "printer_connected",
            EventKind::PrinterDisconnected => "printer_disconnected",
        };
        write!(f, "{}", name)
    }
}
