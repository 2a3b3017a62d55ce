//! Settings Persistence
//!
//! Backends that load and store `Settings`. The file backend picks JSON or
//! TOML from the file extension; the memory backend is used by tests and can
//! be told to fail.

use crate::config::Settings;
use crate::error::{ConfigError, SettingsError, SettingsResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Storage for persisted settings
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Load the persisted settings, `None` when nothing has been saved yet
    async fn load(&self) -> SettingsResult<Option<Settings>>;

    /// Persist settings
    async fn save(&self, settings: &Settings) -> SettingsResult<()>;

    /// Human readable location, for logging
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(FileFormat::Json),
            Some("toml") => Ok(FileFormat::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }

    fn parse(&self, content: &str) -> SettingsResult<Settings> {
        let settings = match self {
            FileFormat::Json => serde_json::from_str(content)?,
            FileFormat::Toml => toml::from_str(content)?,
        };
        Ok(settings)
    }

    fn render(&self, settings: &Settings) -> SettingsResult<String> {
        let content = match self {
            FileFormat::Json => serde_json::to_string_pretty(settings)?,
            FileFormat::Toml => toml::to_string_pretty(settings)?,
        };
        Ok(content)
    }
}

/// Settings stored in a `.json` or `.toml` file
#[derive(Debug, Clone)]
pub struct FileSettingsBackend {
    path: PathBuf,
    format: FileFormat,
}

impl FileSettingsBackend {
    /// Create a backend for the given file; the extension selects the format
    pub fn new(path: impl Into<PathBuf>) -> SettingsResult<Self> {
        let path = path.into();
        let format = FileFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Path of the settings file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsBackend for FileSettingsBackend {
    async fn load(&self) -> SettingsResult<Option<Settings>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SettingsError::LoadError(format!("{}: {}", self.path.display(), e))),
        };

        let settings = self.format.parse(&content).map_err(|e| {
            SettingsError::Config(ConfigError::Corrupted(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })?;
        tracing::debug!("Loaded settings from {}", self.path.display());
        Ok(Some(settings))
    }

    async fn save(&self, settings: &Settings) -> SettingsResult<()> {
        let content = self.format.render(settings)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", self.path.display(), e)))?;
        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory settings storage
#[derive(Debug, Default)]
pub struct MemorySettingsBackend {
    stored: Mutex<Option<Settings>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemorySettingsBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that already holds settings
    pub fn with_settings(settings: Settings) -> Self {
        let backend = Self::default();
        *backend.stored.lock() = Some(settings);
        backend
    }

    /// Make subsequent saves fail
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent loads fail
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// The currently stored settings
    pub fn stored(&self) -> Option<Settings> {
        *self.stored.lock()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsBackend for MemorySettingsBackend {
    async fn load(&self) -> SettingsResult<Option<Settings>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(SettingsError::LoadError("storage unavailable".to_string()));
        }
        Ok(*self.stored.lock())
    }

    async fn save(&self, settings: &Settings) -> SettingsResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SettingsError::SaveError("storage unavailable".to_string()));
        }
        *self.stored.lock() = Some(*settings);
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
