//! PulsePrint Settings Crate
//!
//! Handles user preferences: the settings model, the draft/persisted store
//! with its dirty flag, and the backends that persist settings to disk.

pub mod config;
pub mod error;
pub mod manager;
pub mod persistence;
pub mod store;

pub use config::{SettingKey, SettingValue, Settings, ViewMode};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use manager::SettingsManager;
pub use persistence::{FileSettingsBackend, MemorySettingsBackend, SettingsBackend};
pub use store::{ListenerId, SettingsStore};
