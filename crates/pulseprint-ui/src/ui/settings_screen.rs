//! Settings screen view model
//!
//! Presents the preference switches grouped into sections, the printer
//! import/export actions and the save/reset controls. The printer count
//! that gates exporting is kept current through a snapshot subscription
//! while the screen is mounted.

use parking_lot::Mutex;
use pulseprint_core::{Printer, SubscriptionId};
use pulseprint_service::PrinterService;
use pulseprint_settings::{SettingKey, Settings, SettingsError, SettingsResult, SettingsStore};
use pulseprint_transfer::{
    ExportOptions, Exporter, FileFormat, ImportOptions, ImportResult, Importer, TransferResult,
};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TITLE: &str = "Settings";
pub const SUBTITLE: &str = "Configure your PulsePrint desktop preferences";

const BADGE_ENABLED: &str = "Enabled";
const BADGE_DISABLED: &str = "Disabled";
const BADGE_COMING_SOON: &str = "Coming Soon";

struct RowDefinition {
    key: SettingKey,
    title: &'static str,
    description: &'static str,
    preview: Option<&'static str>,
}

const NOTIFICATION_ROWS: [RowDefinition; 3] = [
    RowDefinition {
        key: SettingKey::IdleNotifications,
        title: "Idle Printer Alerts",
        description: "Make idle printer cards flash slowly to draw attention when they're not printing",
        preview: Some("Preview: Idle cards will flash like this"),
    },
    RowDefinition {
        key: SettingKey::ErrorNotifications,
        title: "Error Printer Alerts",
        description: "Make error printer cards flash with red glow to draw attention when they have errors",
        preview: Some("Preview: Error cards will flash like this"),
    },
    RowDefinition {
        key: SettingKey::SoundNotifications,
        title: "Sound Notifications",
        description: "Play notification sounds for printer status changes",
        preview: None,
    },
];

const DISPLAY_ROWS: [RowDefinition; 4] = [
    RowDefinition {
        key: SettingKey::ShowTemperatures,
        title: "Show Temperatures",
        description: "Display nozzle, bed, and chamber temperatures on printer cards",
        preview: None,
    },
    RowDefinition {
        key: SettingKey::ShowProgress,
        title: "Show Progress",
        description: "Display print progress and time remaining on printer cards",
        preview: None,
    },
    RowDefinition {
        key: SettingKey::CompactView,
        title: "Compact View",
        description: "Use a more compact layout for printer cards",
        preview: None,
    },
    RowDefinition {
        key: SettingKey::DarkMode,
        title: "Dark Mode",
        description: "Use dark theme for better visibility in low light",
        preview: None,
    },
];

/// Settings that cannot be changed yet
fn is_unavailable(key: SettingKey) -> bool {
    key == SettingKey::SoundNotifications
}

/// A preference switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingRow {
    pub key: SettingKey,
    pub title: &'static str,
    pub description: &'static str,
    pub enabled: bool,
    pub badge: &'static str,
    /// The switch cannot be operated
    pub disabled: bool,
    /// Shown under the description while enabled
    pub preview: Option<&'static str>,
}

impl SettingRow {
    fn new(definition: &RowDefinition, settings: &Settings) -> Self {
        let enabled = settings.get(definition.key).as_bool().unwrap_or(false);
        let disabled = is_unavailable(definition.key);
        let badge = match (disabled, enabled) {
            (true, _) => BADGE_COMING_SOON,
            (false, true) => BADGE_ENABLED,
            (false, false) => BADGE_DISABLED,
        };
        Self {
            key: definition.key,
            title: definition.title,
            description: definition.description,
            enabled,
            badge,
            disabled,
            preview: definition.preview.filter(|_| enabled),
        }
    }
}

/// A button on the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    pub label: &'static str,
    pub enabled: bool,
}

/// A label/value line of static information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailItem {
    pub label: &'static str,
    pub value: String,
}

/// A titled group on the settings screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsSection {
    pub title: &'static str,
    pub rows: Vec<SettingRow>,
    pub buttons: Vec<ActionButton>,
    pub details: Vec<DetailItem>,
}

impl SettingsSection {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            rows: Vec::new(),
            buttons: Vec::new(),
            details: Vec::new(),
        }
    }

    /// Find a button by label
    pub fn button(&self, label: &str) -> Option<&ActionButton> {
        self.buttons.iter().find(|b| b.label == label)
    }
}

/// Banner shown while there are unsaved changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnsavedChangesWarning {
    pub title: &'static str,
    pub message: &'static str,
}

const UNSAVED_CHANGES: UnsavedChangesWarning = UnsavedChangesWarning {
    title: "Unsaved Changes",
    message: "You have unsaved changes. Click \"Save Changes\" to apply them.",
};

/// Describes how printers are reached, for the Connection section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub connection_type: String,
    pub update_method: String,
    pub data_source: String,
}

impl ConnectionInfo {
    /// Built-in simulator
    pub fn simulated() -> Self {
        Self {
            connection_type: "Simulated Service (Development)".to_string(),
            update_method: "Simulated real-time updates".to_string(),
            data_source: "Generated printer data".to_string(),
        }
    }

    /// Printers reached over MQTT in LAN mode
    pub fn mqtt() -> Self {
        Self {
            connection_type: "MQTT over TLS (port 8883)".to_string(),
            update_method: "Real-time status reports".to_string(),
            data_source: "Printers in LAN mode".to_string(),
        }
    }
}

impl Default for ConnectionInfo {
    fn default() -> Self {
        Self::simulated()
    }
}

/// Settings screen
pub struct SettingsScreen {
    service: Arc<dyn PrinterService>,
    settings: Arc<SettingsStore>,
    connection: ConnectionInfo,
    printer_count: Arc<AtomicUsize>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl SettingsScreen {
    /// Subscribe to printer collection changes
    pub fn mount(service: Arc<dyn PrinterService>, settings: Arc<SettingsStore>) -> Self {
        let printer_count = Arc::new(AtomicUsize::new(0));
        let count = printer_count.clone();
        let subscription = service.subscribe_snapshots(Arc::new(move |printers: &[Printer]| {
            count.store(printers.len(), Ordering::SeqCst);
        }));
        printer_count.store(service.all_printers().len(), Ordering::SeqCst);

        tracing::debug!("Settings screen mounted ({:?})", subscription);
        Self {
            service,
            settings,
            connection: ConnectionInfo::default(),
            printer_count,
            subscription: Mutex::new(Some(subscription)),
        }
    }

    /// Replace the connection description
    pub fn with_connection_info(mut self, connection: ConnectionInfo) -> Self {
        self.connection = connection;
        self
    }

    /// Stop tracking the printer count; safe to call more than once
    pub fn unmount(&self) {
        if let Some(id) = self.subscription.lock().take() {
            self.service.unsubscribe(id);
            tracing::debug!("Settings screen unmounted ({:?})", id);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.lock().is_some()
    }

    /// Wait until pending printer events have been delivered
    pub async fn flush(&self) {
        self.service.flush().await;
    }

    pub fn printer_count(&self) -> usize {
        self.printer_count.load(Ordering::SeqCst)
    }

    /// Every section, in display order
    pub fn sections(&self) -> Vec<SettingsSection> {
        let settings = self.settings.settings();

        let mut notifications = SettingsSection::new("Notifications");
        notifications.rows = NOTIFICATION_ROWS
            .iter()
            .map(|d| SettingRow::new(d, &settings))
            .collect();

        let mut display = SettingsSection::new("Display");
        display.rows = DISPLAY_ROWS
            .iter()
            .map(|d| SettingRow::new(d, &settings))
            .collect();

        let mut data = SettingsSection::new("Data Management");
        data.buttons = vec![
            ActionButton {
                label: "Import Printers",
                enabled: true,
            },
            ActionButton {
                label: "Export Printers",
                enabled: self.export_enabled(),
            },
        ];
        data.details = FileFormat::ALL
            .iter()
            .map(|format| DetailItem {
                label: format_label(*format),
                value: format_description(*format).to_string(),
            })
            .collect();

        let mut connection = SettingsSection::new("Connection");
        connection.details = vec![
            DetailItem {
                label: "Connection Type",
                value: self.connection.connection_type.clone(),
            },
            DetailItem {
                label: "Update Method",
                value: self.connection.update_method.clone(),
            },
            DetailItem {
                label: "Data Source",
                value: self.connection.data_source.clone(),
            },
        ];

        vec![notifications, display, data, connection]
    }

    /// Find a section by title
    pub fn section(&self, title: &str) -> Option<SettingsSection> {
        self.sections().into_iter().find(|s| s.title == title)
    }

    /// The switch row for a setting
    pub fn row(&self, key: SettingKey) -> Option<SettingRow> {
        let settings = self.settings.settings();
        NOTIFICATION_ROWS
            .iter()
            .chain(DISPLAY_ROWS.iter())
            .find(|d| d.key == key)
            .map(|d| SettingRow::new(d, &settings))
    }

    /// Flip a switch in the draft
    pub fn set_enabled(&self, key: SettingKey, enabled: bool) -> SettingsResult<()> {
        if is_unavailable(key) {
            return Err(SettingsError::InvalidSetting {
                key: key.to_string(),
                reason: "not available yet".to_string(),
            });
        }
        self.settings.update_setting(key, enabled)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.settings.has_unsaved_changes()
    }

    /// "Save Changes", shown only while there are unsaved changes
    pub fn save_button(&self) -> Option<ActionButton> {
        self.has_unsaved_changes().then_some(ActionButton {
            label: "Save Changes",
            enabled: true,
        })
    }

    /// "Reset", always shown
    pub fn reset_button(&self) -> ActionButton {
        ActionButton {
            label: "Reset",
            enabled: true,
        }
    }

    pub fn unsaved_warning(&self) -> Option<UnsavedChangesWarning> {
        self.has_unsaved_changes().then_some(UNSAVED_CHANGES)
    }

    pub async fn save(&self) -> SettingsResult<()> {
        self.settings.save().await
    }

    /// Discard the draft and reload the saved settings
    pub async fn reset(&self) -> SettingsResult<()> {
        self.settings.reset().await
    }

    /// Put defaults into the draft; they still need saving
    pub fn restore_defaults(&self) {
        self.settings.restore_defaults();
    }

    /// Exporting needs at least one printer
    pub fn export_enabled(&self) -> bool {
        self.printer_count() > 0
    }

    /// Render the current printers in `format`
    pub fn export_content(&self, format: FileFormat, options: ExportOptions) -> TransferResult<String> {
        Exporter::export(&self.service.all_printers(), format, options)
    }

    /// Write the current printers to `path`
    pub async fn export_printers(
        &self,
        path: &Path,
        options: ExportOptions,
    ) -> TransferResult<usize> {
        Exporter::export_file(&self.service.all_printers(), path, options).await
    }

    /// Import printers from a file and add them to the service
    pub async fn import_printers(
        &self,
        path: &Path,
        options: ImportOptions,
    ) -> TransferResult<ImportResult> {
        let result = self.importer().import_file(path, options).await?;
        Ok(self.complete_import(result).await)
    }

    /// Import printers from text and add them to the service
    pub async fn import_content(
        &self,
        content: &str,
        format: FileFormat,
        options: ImportOptions,
    ) -> TransferResult<ImportResult> {
        let result = self.importer().import_str(content, format, options)?;
        Ok(self.complete_import(result).await)
    }

    fn importer(&self) -> Importer {
        Importer::with_existing_serials(
            self.service
                .all_printers()
                .into_iter()
                .filter_map(|p| p.serial),
        )
    }

    async fn complete_import(&self, mut result: ImportResult) -> ImportResult {
        if !result.validate_only {
            for params in result.printers.clone() {
                let serial = params.serial.clone();
                if let Err(e) = self.service.add_printer(params).await {
                    tracing::warn!("Failed to add imported printer {}: {}", serial, e);
                    result.reject(&serial, e);
                }
            }
        }

        if result.changed_printers() {
            self.printer_count
                .store(self.service.all_printers().len(), Ordering::SeqCst);
        }
        result
    }
}

impl Drop for SettingsScreen {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for SettingsScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsScreen")
            .field("printer_count", &self.printer_count())
            .field("mounted", &self.subscription.lock().is_some())
            .finish()
    }
}

fn format_label(format: FileFormat) -> &'static str {
    match format {
        FileFormat::Json => "JSON",
        FileFormat::Csv => "CSV",
        FileFormat::Yaml => "YAML",
        FileFormat::Txt => "TXT",
    }
}

fn format_description(format: FileFormat) -> &'static str {
    match format {
        FileFormat::Json => "Structured data format",
        FileFormat::Csv => "Spreadsheet compatible",
        FileFormat::Yaml => "Human-readable format",
        FileFormat::Txt => "Simple key-value pairs",
    }
}
