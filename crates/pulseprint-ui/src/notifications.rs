//! Status change notifications
//!
//! [`StatusNotifier`] compares each printer collection it sees with the
//! previous one and turns status transitions into [`Notification`]s, which
//! are handed to a [`Notifier`] for delivery.

use parking_lot::Mutex;
use pulseprint_core::{Printer, PrinterId, PrinterStatus};
use pulseprint_settings::Settings;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotificationType::Success => "success",
            NotificationType::Error => "error",
            NotificationType::Warning => "warning",
            NotificationType::Info => "info",
        };
        write!(f, "{}", name)
    }
}

/// A user facing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationType,
    pub title: String,
    pub body: String,
    pub printer_name: Option<String>,
}

impl Notification {
    fn for_printer(
        kind: NotificationType,
        title: impl Into<String>,
        body: impl Into<String>,
        printer: &Printer,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            printer_name: Some(printer.name.clone()),
        }
    }
}

/// Delivers notifications
///
/// Called from the event dispatcher thread.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        let printer = notification.printer_name.as_deref().unwrap_or("-");
        match notification.kind {
            NotificationType::Error => tracing::error!(
                printer,
                "{}: {}",
                notification.title,
                notification.body
            ),
            NotificationType::Warning => tracing::warn!(
                printer,
                "{}: {}",
                notification.title,
                notification.body
            ),
            NotificationType::Success | NotificationType::Info => tracing::info!(
                printer,
                "{}: {}",
                notification.title,
                notification.body
            ),
        }
    }
}

/// Turns printer status transitions into notifications
pub struct StatusNotifier {
    notifier: Arc<dyn Notifier>,
    last_seen: Mutex<HashMap<PrinterId, PrinterStatus>>,
}

impl StatusNotifier {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Compare `printers` with the previous collection, deliver and return
    /// the resulting notifications
    ///
    /// Printers seen for the first time only record their status.
    pub fn observe(&self, printers: &[Printer], settings: &Settings) -> Vec<Notification> {
        let notifications: Vec<Notification> = {
            let mut last_seen = self.last_seen.lock();
            let notifications = printers
                .iter()
                .filter_map(|printer| {
                    let previous = last_seen.insert(printer.id.clone(), printer.status)?;
                    transition(previous, printer, settings)
                })
                .collect();
            last_seen.retain(|id, _| printers.iter().any(|p| &p.id == id));
            notifications
        };

        for notification in &notifications {
            self.notifier.notify(notification);
        }
        notifications
    }

    /// Forget every recorded status
    pub fn clear(&self) {
        self.last_seen.lock().clear();
    }
}

impl fmt::Debug for StatusNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusNotifier")
            .field("tracked", &self.last_seen.lock().len())
            .finish()
    }
}

fn transition(previous: PrinterStatus, printer: &Printer, settings: &Settings) -> Option<Notification> {
    if previous == printer.status {
        return None;
    }

    match (previous, printer.status) {
        (PrinterStatus::Printing, PrinterStatus::Idle) => Some(Notification::for_printer(
            NotificationType::Success,
            "Print finished",
            format!("{} has finished printing", printer.name),
            printer,
        )),
        (_, PrinterStatus::Idle) if settings.idle_notifications => {
            Some(Notification::for_printer(
                NotificationType::Info,
                "Printer idle",
                format!("{} is idle and ready for a new job", printer.name),
                printer,
            ))
        }
        (_, PrinterStatus::Error) if settings.error_notifications => {
            let body = printer
                .error
                .as_ref()
                .filter(|e| !e.message.is_empty())
                .map(|e| format!("{}: {}", printer.name, e.message))
                .unwrap_or_else(|| format!("{} reported an error", printer.name));
            Some(Notification::for_printer(
                NotificationType::Error,
                "Printer error",
                body,
                printer,
            ))
        }
        (_, PrinterStatus::Offline) => Some(Notification::for_printer(
            NotificationType::Warning,
            "Printer offline",
            format!("{} went offline", printer.name),
            printer,
        )),
        _ => None,
    }
}
