use pulseprint_settings::{
    FileSettingsBackend, SettingKey, Settings, SettingsStore, ViewMode,
};
use std::sync::Arc;

fn file_store(path: &std::path::Path) -> SettingsStore {
    SettingsStore::new(Arc::new(FileSettingsBackend::new(path).unwrap()))
}

#[tokio::test]
async fn test_saved_view_mode_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    let store = file_store(&path);
    store.load().await.unwrap();
    store
        .update_setting(SettingKey::ViewMode, ViewMode::Table)
        .unwrap();
    store.update_setting(SettingKey::IdleNotifications, true).unwrap();
    store.save().await.unwrap();

    let reopened = file_store(&path);
    let settings = reopened.load().await.unwrap();
    assert_eq!(settings.view_mode, ViewMode::Table);
    assert!(settings.idle_notifications);
    assert!(!reopened.has_unsaved_changes());
}

#[tokio::test]
async fn test_unsaved_edits_are_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let store = file_store(&path);
    store.update_setting(SettingKey::DarkMode, true).unwrap();
    drop(store);

    let reopened = file_store(&path);
    assert_eq!(reopened.load().await.unwrap(), Settings::default());
}

#[tokio::test]
async fn test_reset_restores_saved_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    let store = file_store(&path);
    store.update_setting(SettingKey::CompactView, true).unwrap();
    store.save().await.unwrap();
    store.update_setting(SettingKey::CompactView, false).unwrap();
    store.update_setting(SettingKey::DarkMode, true).unwrap();
    store.reset().await.unwrap();

    let settings = store.settings();
    assert!(settings.compact_view);
    assert!(!settings.dark_mode);
    assert!(!store.has_unsaved_changes());
}

#[tokio::test]
async fn test_corrupted_file_leaves_store_on_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "viewMode = [").unwrap();

    let store = file_store(&path);
    assert!(store.load().await.is_err());
    assert_eq!(store.settings(), Settings::default());
}
