//! Settings file location
//!
//! Resolves the per-user settings file under the platform config directory.

use crate::config::Settings;
use crate::error::{ConfigError, SettingsError, SettingsResult};
use crate::persistence::{FileSettingsBackend, SettingsBackend};
use std::path::{Path, PathBuf};

/// Application directory name under the platform config directory
pub const APP_DIR: &str = "pulseprint";

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.toml";

/// Locates and opens the user's settings file
pub struct SettingsManager;

impl SettingsManager {
    /// Platform config directory for PulsePrint
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Full path to the settings file
    pub fn config_file_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(SETTINGS_FILE))
    }

    /// Create the config directory if needed
    pub fn ensure_config_dir() -> SettingsResult<PathBuf> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir).map_err(|e| {
            SettingsError::ConfigDirectory(format!("{}: {}", dir.display(), e))
        })?;
        Ok(dir)
    }

    /// Backend for the default settings file
    pub fn default_backend() -> SettingsResult<FileSettingsBackend> {
        Self::ensure_config_dir()?;
        FileSettingsBackend::new(Self::config_file_path()?)
    }

    /// Load settings from a file, falling back to defaults when it is missing
    pub async fn load_from_file(path: &Path) -> SettingsResult<Settings> {
        let backend = FileSettingsBackend::new(path)?;
        Ok(backend.load().await?.unwrap_or_default())
    }
}
