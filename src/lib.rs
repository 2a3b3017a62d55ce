//! # PulsePrint
//!
//! A desktop dashboard for monitoring and controlling networked Bambu Lab
//! 3D printers.
//!
//! ## Architecture
//!
//! PulsePrint is organized as a workspace with multiple crates:
//!
//! 1. **pulseprint-core** - Printer data model, errors, event bus
//! 2. **pulseprint-settings** - User preferences, draft/persisted store, persistence
//! 3. **pulseprint-service** - Printer service, transports, status simulation
//! 4. **pulseprint-transfer** - Printer list import and export (JSON, CSV, YAML, TXT)
//! 5. **pulseprint-ui** - Dashboard and settings view models
//! 6. **pulseprint** - Main binary that wires the crates together
//!
//! ## Features
//!
//! - **Live Status**: Printer collection kept current through typed events
//! - **Print Control**: Pause, resume, stop and start commands over MQTT (port 8883)
//! - **Card and Table Views**: View mode persisted with the other preferences
//! - **Notifications**: Finished prints, errors and printers going offline
//! - **Bulk Import/Export**: Printer lists in four file formats

pub mod app;

pub use app::Application;

// Re-export modules for main.rs
pub use pulseprint_core::data;
pub use pulseprint_core::event_bus;

pub use pulseprint_core::{
    AddPrinterParams, Error, EventBus, EventFilter, EventKind, Printer, PrinterId,
    PrinterServiceEvent, PrinterStatistics, PrinterStatus, Result, SubscriptionId,
};

pub use pulseprint_service::{
    LocalPrinterService, PrintCommand, PrinterService, PrinterTransport, ServiceConfig,
    ServiceError, SimulatedTransport,
};

pub use pulseprint_settings::{
    SettingKey, SettingValue, Settings, SettingsBackend, SettingsManager, SettingsStore, ViewMode,
};

pub use pulseprint_transfer::{ExportOptions, Exporter, FileFormat, ImportOptions, Importer};

pub use pulseprint_ui::{Dashboard, DashboardLayout, SettingsScreen, TracingNotifier};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Environment variable selecting the log format (`pretty` or `json`)
pub const LOG_FORMAT_ENV: &str = "PULSEPRINT_LOG_FORMAT";

/// Initialize logging
///
/// `RUST_LOG` filters events (default `info`). Output goes to stdout, except
/// for Windows release builds, which have no console and append to
/// `pulseprint.log` next to the executable instead.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let writer = log_writer()?;
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_names(true);
    let layer = if json {
        layer.json().boxed()
    } else {
        layer.pretty().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()?;
    Ok(())
}

#[cfg(not(all(target_os = "windows", not(debug_assertions))))]
fn log_writer() -> anyhow::Result<tracing_subscriber::fmt::writer::BoxMakeWriter> {
    Ok(tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout))
}

#[cfg(all(target_os = "windows", not(debug_assertions)))]
fn log_writer() -> anyhow::Result<tracing_subscriber::fmt::writer::BoxMakeWriter> {
    use anyhow::Context;
    use std::sync::Mutex;

    let dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));
    let path = dir.join("pulseprint.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    Ok(tracing_subscriber::fmt::writer::BoxMakeWriter::new(
        Mutex::new(file),
    ))
}
