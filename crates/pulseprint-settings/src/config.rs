//! Settings model for PulsePrint
//!
//! Preferences are organized into:
//! - Notification flags (idle alerts, error alerts, sounds)
//! - Display flags (temperatures, progress, compact cards, dark mode)
//! - The dashboard view mode (cards or table)

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dashboard layout selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One card per printer
    #[default]
    Card,
    /// One table row per printer
    Table,
}

impl ViewMode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Card => ViewMode::Table,
            ViewMode::Table => ViewMode::Card,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> SettingsResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" | "cards" => Ok(ViewMode::Card),
            "table" => Ok(ViewMode::Table),
            other => Err(SettingsError::InvalidSetting {
                key: SettingKey::ViewMode.to_string(),
                reason: format!("unknown view mode '{}'", other),
            }),
        }
    }
}

/// User preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Flash idle printer cards
    pub idle_notifications: bool,
    /// Flash error printer cards
    pub error_notifications: bool,
    /// Play sounds on status changes
    pub sound_notifications: bool,
    /// Show temperatures on cards
    pub show_temperatures: bool,
    /// Show print progress on cards
    pub show_progress: bool,
    /// Compact card layout
    pub compact_view: bool,
    /// Dark theme
    pub dark_mode: bool,
    /// Dashboard layout
    pub view_mode: ViewMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            idle_notifications: false,
            error_notifications: true,
            sound_notifications: false,
            show_temperatures: true,
            show_progress: true,
            compact_view: false,
            dark_mode: false,
            view_mode: ViewMode::Card,
        }
    }
}

impl Settings {
    /// Read one setting
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::IdleNotifications => SettingValue::Bool(self.idle_notifications),
            SettingKey::ErrorNotifications => SettingValue::Bool(self.error_notifications),
            SettingKey::SoundNotifications => SettingValue::Bool(self.sound_notifications),
            SettingKey::ShowTemperatures => SettingValue::Bool(self.show_temperatures),
            SettingKey::ShowProgress => SettingValue::Bool(self.show_progress),
            SettingKey::CompactView => SettingValue::Bool(self.compact_view),
            SettingKey::DarkMode => SettingValue::Bool(self.dark_mode),
            SettingKey::ViewMode => SettingValue::ViewMode(self.view_mode),
        }
    }

    /// Write one setting, rejecting values of the wrong kind
    pub fn set(&mut self, key: SettingKey, value: SettingValue) -> SettingsResult<()> {
        match (key, value) {
            (SettingKey::ViewMode, SettingValue::ViewMode(mode)) => self.view_mode = mode,
            (SettingKey::ViewMode, other) => {
                return Err(SettingsError::InvalidSetting {
                    key: key.to_string(),
                    reason: format!("expected a view mode, got {}", other),
                })
            }
            (_, SettingValue::Bool(flag)) => *self.flag_mut(key) = flag,
            (_, other) => {
                return Err(SettingsError::InvalidSetting {
                    key: key.to_string(),
                    reason: format!("expected a boolean, got {}", other),
                })
            }
        }
        Ok(())
    }

    /// Keys whose values differ between two settings
    pub fn diff(&self, other: &Settings) -> Vec<SettingKey> {
        SettingKey::ALL
            .iter()
            .copied()
            .filter(|key| self.get(*key) != other.get(*key))
            .collect()
    }

    fn flag_mut(&mut self, key: SettingKey) -> &mut bool {
        match key {
            SettingKey::IdleNotifications => &mut self.idle_notifications,
            SettingKey::ErrorNotifications => &mut self.error_notifications,
            SettingKey::SoundNotifications => &mut self.sound_notifications,
            SettingKey::ShowTemperatures => &mut self.show_temperatures,
            SettingKey::ShowProgress => &mut self.show_progress,
            SettingKey::CompactView => &mut self.compact_view,
            SettingKey::DarkMode | SettingKey::ViewMode => &mut self.dark_mode,
        }
    }
}

/// Setting identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingKey {
    IdleNotifications,
    ErrorNotifications,
    SoundNotifications,
    ShowTemperatures,
    ShowProgress,
    CompactView,
    DarkMode,
    ViewMode,
}

impl SettingKey {
    /// Every key, in settings screen order
    pub const ALL: [SettingKey; 8] = [
        SettingKey::IdleNotifications,
        SettingKey::ErrorNotifications,
        SettingKey::SoundNotifications,
        SettingKey::ShowTemperatures,
        SettingKey::ShowProgress,
        SettingKey::CompactView,
        SettingKey::DarkMode,
        SettingKey::ViewMode,
    ];

    /// Name used in settings files
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::IdleNotifications => "idleNotifications",
            SettingKey::ErrorNotifications => "errorNotifications",
            SettingKey::SoundNotifications => "soundNotifications",
            SettingKey::ShowTemperatures => "showTemperatures",
            SettingKey::ShowProgress => "showProgress",
            SettingKey::CompactView => "compactView",
            SettingKey::DarkMode => "darkMode",
            SettingKey::ViewMode => "viewMode",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> SettingsResult<Self> {
        SettingKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingsError::InvalidSetting {
                key: s.to_string(),
                reason: "unknown setting".to_string(),
            })
    }
}

/// A setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingValue {
    /// On/off flag
    Bool(bool),
    /// Dashboard layout
    ViewMode(ViewMode),
}

impl SettingValue {
    /// The flag value, if this is a flag
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            SettingValue::ViewMode(_) => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::ViewMode(mode) => write!(f, "{}", mode),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl From<ViewMode> for SettingValue {
    fn from(mode: ViewMode) -> Self {
        SettingValue::ViewMode(mode)
    }
}
