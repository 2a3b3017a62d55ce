//! Settings Store
//!
//! Holds the persisted settings alongside an editable draft. Edits go to the
//! draft; `save` writes the draft through the backend. The store has unsaved
//! changes whenever the draft differs from the persisted values.

use crate::config::{SettingKey, SettingValue, Settings};
use crate::error::SettingsResult;
use crate::persistence::SettingsBackend;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Listener = Arc<dyn Fn(SettingKey, &SettingValue) + Send + Sync>;

/// Handle returned by [`SettingsStore::on_setting_changed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, Default)]
struct State {
    persisted: Settings,
    draft: Settings,
}

/// Draft/persisted settings with change listeners
pub struct SettingsStore {
    backend: Arc<dyn SettingsBackend>,
    state: RwLock<State>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

impl SettingsStore {
    /// Create a store holding defaults; call `load` to read persisted values
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(State::default()),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Register a callback to be notified when a draft setting changes
    ///
    /// Callbacks run without any store lock held and may call back into the
    /// store.
    pub fn on_setting_changed<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(SettingKey, &SettingValue) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(callback)));
        id
    }

    /// Remove a callback; returns false if it was already gone
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Read persisted settings from the backend, replacing both copies
    ///
    /// Missing storage yields defaults. On error the store is unchanged.
    pub async fn load(&self) -> SettingsResult<Settings> {
        let loaded = self.backend.load().await?.unwrap_or_default();
        let before = {
            let mut state = self.state.write();
            let before = state.draft;
            *state = State {
                persisted: loaded,
                draft: loaded,
            };
            before
        };
        tracing::debug!("Settings loaded from {}", self.backend.describe());
        self.notify_changes(&before, &loaded);
        Ok(loaded)
    }

    /// Current draft settings
    pub fn settings(&self) -> Settings {
        self.state.read().draft
    }

    /// Last persisted settings
    pub fn persisted(&self) -> Settings {
        self.state.read().persisted
    }

    /// Read one draft setting
    pub fn get(&self, key: SettingKey) -> SettingValue {
        self.state.read().draft.get(key)
    }

    /// Change one draft setting
    pub fn update_setting(
        &self,
        key: SettingKey,
        value: impl Into<SettingValue>,
    ) -> SettingsResult<()> {
        let value = value.into();
        let changed = {
            let mut state = self.state.write();
            let previous = state.draft.get(key);
            state.draft.set(key, value)?;
            previous != value
        };

        if changed {
            tracing::debug!("Setting {} changed to {}", key, value);
            self.notify(key, &value);
        }
        Ok(())
    }

    /// Whether the draft differs from the persisted settings
    pub fn has_unsaved_changes(&self) -> bool {
        let state = self.state.read();
        state.draft != state.persisted
    }

    /// Write the draft through the backend
    ///
    /// On failure the draft is kept and the persisted values are unchanged.
    pub async fn save(&self) -> SettingsResult<()> {
        let draft = self.settings();
        if let Err(e) = self.backend.save(&draft).await {
            tracing::warn!("Failed to save settings: {}", e);
            return Err(e);
        }
        self.state.write().persisted = draft;
        tracing::info!("Settings saved to {}", self.backend.describe());
        Ok(())
    }

    /// Reload the persisted settings and discard the draft
    ///
    /// If the reload fails the draft falls back to the last known persisted
    /// values and the error is returned.
    pub async fn reset(&self) -> SettingsResult<()> {
        let reloaded = self.backend.load().await;
        let (before, after) = {
            let mut state = self.state.write();
            if let Ok(loaded) = &reloaded {
                state.persisted = loaded.unwrap_or_default();
            }
            let before = state.draft;
            state.draft = state.persisted;
            (before, state.draft)
        };
        self.notify_changes(&before, &after);

        match reloaded {
            Ok(_) => {
                tracing::info!("Settings reset to persisted values");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to reload settings, using last known values: {}", e);
                Err(e)
            }
        }
    }

    /// Put defaults into the draft without saving
    pub fn restore_defaults(&self) {
        let defaults = Settings::default();
        let before = std::mem::replace(&mut self.state.write().draft, defaults);
        self.notify_changes(&before, &defaults);
    }

    /// Discard the draft and go back to the persisted settings
    pub fn discard_changes(&self) {
        let (before, after) = {
            let mut state = self.state.write();
            let before = state.draft;
            state.draft = state.persisted;
            (before, state.draft)
        };
        self.notify_changes(&before, &after);
    }

    fn notify_changes(&self, before: &Settings, after: &Settings) {
        for key in before.diff(after) {
            self.notify(key, &after.get(key));
        }
    }

    fn notify(&self, key: SettingKey, value: &SettingValue) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(key, value);
        }
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("SettingsStore")
            .field("backend", &self.backend.describe())
            .field("draft", &state.draft)
            .field("persisted", &state.persisted)
            .finish()
    }
}
