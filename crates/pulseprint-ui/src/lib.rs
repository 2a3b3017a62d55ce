//! # PulsePrint UI
//!
//! Headless view models for the PulsePrint desktop dashboard. They subscribe
//! to the printer service, read and write the settings store, and compute
//! what the front-end renders: cards or table rows, toggles, badges and
//! notifications.

pub mod helpers;
pub mod notifications;
pub mod ui;
pub mod view_mode;

pub use notifications::{Notification, NotificationType, Notifier, StatusNotifier, TracingNotifier};
pub use ui::dashboard::{Dashboard, DashboardHeader, DashboardLayout, EmptyState, StatisticTile};
pub use ui::printer_card::{
    CardAction, CardAlert, PrinterCard, PrinterTable, PrinterTableRow, ProgressReadout,
    TemperatureReadout,
};
pub use ui::settings_screen::{
    ActionButton, ConnectionInfo, DetailItem, SettingRow, SettingsScreen, SettingsSection,
    UnsavedChangesWarning,
};
pub use view_mode::{ViewModeToggle, ViewToggleControls, ViewToggleOption};

// Re-export settings types used in view model signatures
pub use pulseprint_settings::{SettingKey, SettingValue, Settings, SettingsStore, ViewMode};
