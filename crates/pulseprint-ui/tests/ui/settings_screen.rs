use crate::support::Fixture;
use pulseprint_core::AddPrinterParams;
use pulseprint_service::PrinterService;
use pulseprint_settings::SettingKey;
use pulseprint_transfer::{ExportOptions, FileFormat, ImportOptions};
use pulseprint_ui::{ConnectionInfo, SettingsScreen};

const TWO_PRINTERS: &str = r#"{
    "printers": [
        { "name": "Shelf A", "model": "A1", "ip": "10.0.0.21", "accessCode": "aaa111", "serial": "SHELF-A" },
        { "name": "Shelf B", "ip": "10.0.0.22", "access_code": "bbb222", "serial": "SHELF-B" }
    ]
}"#;

#[tokio::test]
async fn test_sections_and_rows() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let screen = SettingsScreen::mount(fixture.printer_service(), fixture.settings.clone());

    let titles: Vec<&str> = screen.sections().iter().map(|s| s.title).collect();
    assert_eq!(
        titles,
        vec!["Notifications", "Display", "Data Management", "Connection"]
    );

    let idle = screen.row(SettingKey::IdleNotifications).unwrap();
    assert_eq!(idle.title, "Idle Printer Alerts");
    assert_eq!(idle.badge, "Disabled");

    let error = screen.row(SettingKey::ErrorNotifications).unwrap();
    assert_eq!(error.badge, "Enabled");

    let sound = screen.row(SettingKey::SoundNotifications).unwrap();
    assert!(sound.disabled);
    assert_eq!(sound.badge, "Coming Soon");
    assert!(screen.set_enabled(SettingKey::SoundNotifications, true).is_err());
    assert!(!screen.has_unsaved_changes());

    assert!(screen.row(SettingKey::ViewMode).is_none());
    assert_eq!(screen.section("Display").unwrap().rows.len(), 4);
}

#[tokio::test]
async fn test_connection_details() {
    let fixture = Fixture::start(Vec::new()).await;
    let screen = SettingsScreen::mount(fixture.printer_service(), fixture.settings.clone())
        .with_connection_info(ConnectionInfo::mqtt());

    let connection = screen.section("Connection").unwrap();
    assert_eq!(connection.details[0].label, "Connection Type");
    assert_eq!(connection.details[0].value, "MQTT over TLS (port 8883)");
}

#[tokio::test]
async fn test_save_controls_follow_dirty_flag() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let screen = SettingsScreen::mount(fixture.printer_service(), fixture.settings.clone());

    assert!(screen.save_button().is_none());
    assert!(screen.unsaved_warning().is_none());
    assert_eq!(screen.reset_button().label, "Reset");

    screen.set_enabled(SettingKey::DarkMode, true).unwrap();
    assert_eq!(screen.save_button().unwrap().label, "Save Changes");
    assert_eq!(screen.unsaved_warning().unwrap().title, "Unsaved Changes");
    assert_eq!(screen.row(SettingKey::DarkMode).unwrap().badge, "Enabled");

    fixture.backend.set_fail_saves(true);
    assert!(screen.save().await.is_err());
    assert!(screen.has_unsaved_changes());
    assert!(!fixture.settings.persisted().dark_mode);

    fixture.backend.set_fail_saves(false);
    screen.save().await.unwrap();
    assert!(screen.save_button().is_none());
    assert!(fixture.backend.stored().unwrap().dark_mode);

    screen.set_enabled(SettingKey::CompactView, true).unwrap();
    screen.reset().await.unwrap();
    assert!(!screen.has_unsaved_changes());
    assert!(!fixture.settings.settings().compact_view);
    assert!(fixture.settings.settings().dark_mode);
}

#[tokio::test]
async fn test_export_needs_printers() {
    let fixture = Fixture::start(Vec::new()).await;
    let screen = SettingsScreen::mount(fixture.printer_service(), fixture.settings.clone());

    assert_eq!(screen.printer_count(), 0);
    let data = screen.section("Data Management").unwrap();
    assert!(data.button("Import Printers").unwrap().enabled);
    assert!(!data.button("Export Printers").unwrap().enabled);

    fixture
        .service
        .add_printer(AddPrinterParams::new("Bench", "10.0.0.5", "code", "BENCH1"))
        .await
        .unwrap();
    screen.flush().await;

    assert_eq!(screen.printer_count(), 1);
    assert!(screen.export_enabled());
    let data = screen.section("Data Management").unwrap();
    assert!(data.button("Export Printers").unwrap().enabled);
}

#[tokio::test]
async fn test_export_to_file() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let screen = SettingsScreen::mount(fixture.printer_service(), fixture.settings.clone());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("printers.csv");

    let written = screen
        .export_printers(&path, ExportOptions::default())
        .await
        .unwrap();
    assert_eq!(written, 2);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "name,model,ip,accessCode,serial");
    assert!(lines[1].starts_with("Test Printer 1,X1C,192.168.1.100,,"));

    let json = screen
        .export_content(FileFormat::Json, ExportOptions { include_access_codes: true })
        .unwrap();
    assert!(json.contains("test123"));
}

#[tokio::test]
async fn test_import_adds_printers() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let screen = SettingsScreen::mount(fixture.printer_service(), fixture.settings.clone());

    let result = screen
        .import_content(TWO_PRINTERS, FileFormat::Json, ImportOptions::default())
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.imported, 2);
    assert!(result.changed_printers());
    assert_eq!(screen.printer_count(), 4);

    let names: Vec<String> = fixture
        .service
        .all_printers()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert!(names.contains(&"Shelf A".to_string()));
    assert!(names.contains(&"Shelf B".to_string()));

    // Importing the same list again skips both
    let again = screen
        .import_content(TWO_PRINTERS, FileFormat::Json, ImportOptions::default())
        .await
        .unwrap();
    assert_eq!(again.imported, 0);
    assert_eq!(again.skipped, 2);
    assert!(!again.changed_printers());
    assert_eq!(fixture.service.all_printers().len(), 4);
}

#[tokio::test]
async fn test_validate_only_import_changes_nothing() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let screen = SettingsScreen::mount(fixture.printer_service(), fixture.settings.clone());

    let result = screen
        .import_content(
            TWO_PRINTERS,
            FileFormat::Json,
            ImportOptions {
                validate_only: true,
                ..ImportOptions::default()
            },
        )
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.imported, 2);
    assert!(!result.changed_printers());
    assert_eq!(fixture.service.all_printers().len(), 2);
    assert_eq!(screen.printer_count(), 2);
}

#[tokio::test]
async fn test_count_refresh_after_unmount_needs_clean_import() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let screen = SettingsScreen::mount(fixture.printer_service(), fixture.settings.clone());
    screen.unmount();
    assert!(!screen.is_mounted());

    // One bad record makes the import unsuccessful, so the count is left alone
    let mixed = "name: Good\nip: 10.0.0.31\naccessCode: abc\nserial: GOOD1\n\nname: Bad\nip: not-an-ip\naccessCode: abc\nserial: BAD1\n";
    let result = screen
        .import_content(mixed, FileFormat::Txt, ImportOptions::default())
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.imported, 1);
    assert_eq!(fixture.service.all_printers().len(), 3);
    assert_eq!(screen.printer_count(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("more.yaml");
    std::fs::write(
        &path,
        "printers:\n  - name: Extra\n    ip: 10.0.0.32\n    accessCode: xyz\n    serial: EXTRA1\n",
    )
    .unwrap();
    let result = screen
        .import_printers(&path, ImportOptions::default())
        .await
        .unwrap();
    assert!(result.changed_printers());
    assert_eq!(screen.printer_count(), 4);
}

#[tokio::test]
async fn test_unparseable_import_is_an_error() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let screen = SettingsScreen::mount(fixture.printer_service(), fixture.settings.clone());

    assert!(screen
        .import_content("{ not json", FileFormat::Json, ImportOptions::default())
        .await
        .is_err());
    assert_eq!(fixture.service.all_printers().len(), 2);
}
