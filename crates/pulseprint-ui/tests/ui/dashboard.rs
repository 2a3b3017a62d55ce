use crate::support::{idle_printer, printing_printer, Fixture, RecordingNotifier};
use pulseprint_core::{AddPrinterParams, PrinterId, PrinterStatus};
use pulseprint_service::{PrinterService, PrinterStatusPayload};
use pulseprint_settings::{SettingKey, ViewMode};
use pulseprint_ui::{CardAction, Dashboard, DashboardLayout, NotificationType};
use std::sync::Arc;

#[tokio::test]
async fn test_card_view_then_table_view() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let dashboard = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());

    let header = dashboard.header();
    assert_eq!(header.title, "PulsePrint Desktop");
    assert_eq!(header.subtitle, "Monitor and control your 3D printers");

    let layout = dashboard.layout();
    let cards = layout.cards().expect("card view by default");
    let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Test Printer 1", "Test Printer 2"]);
    assert_eq!(cards[0].test_id, "printer-card-1");
    assert_eq!(cards[1].test_id, "printer-card-2");

    let toggle = dashboard.view_toggle().expect("toggle shown with printers");
    assert!(toggle.option("Card View").unwrap().selected);
    assert!(toggle.option("Table View").is_some());

    dashboard.set_view_mode(ViewMode::Table).await.unwrap();

    let layout = dashboard.layout();
    let table = layout.table().expect("table view after switching");
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.rows[0].cell("Printer"), Some("Test Printer 1"));
    assert_eq!(table.rows[0].cell("Status"), Some("Idle"));
    assert_eq!(table.rows[1].cell("Printer"), Some("Test Printer 2"));
    assert_eq!(table.rows[1].cell("Status"), Some("Printing"));
    assert_eq!(table.rows[1].cell("Progress"), Some("75%"));

    assert_eq!(fixture.backend.stored().unwrap().view_mode, ViewMode::Table);
    assert!(!fixture.settings.has_unsaved_changes());
}

#[tokio::test]
async fn test_empty_collection_hides_toggle() {
    let fixture = Fixture::start(Vec::new()).await;
    let dashboard = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());

    match dashboard.layout() {
        DashboardLayout::Empty(empty) => assert_eq!(empty.title, "No Printers Added"),
        other => panic!("expected the empty state, got {:?}", other),
    }
    assert!(dashboard.view_toggle().is_none());
    assert!(dashboard
        .statistic_tiles()
        .iter()
        .all(|tile| tile.value == 0));

    // Table mode does not bring back the toggle while empty
    dashboard.set_view_mode(ViewMode::Table).await.unwrap();
    assert!(dashboard.layout().is_empty());
    assert!(dashboard.view_toggle().is_none());
}

#[tokio::test]
async fn test_failed_save_keeps_table_view() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let dashboard = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());
    fixture.backend.set_fail_saves(true);

    assert!(dashboard.set_view_mode(ViewMode::Table).await.is_err());

    assert_eq!(dashboard.view_mode(), ViewMode::Table);
    assert!(dashboard.layout().table().is_some());
    assert!(fixture.settings.has_unsaved_changes());
    assert_eq!(fixture.settings.persisted().view_mode, ViewMode::Card);
    assert!(fixture.backend.stored().is_none());
}

#[tokio::test]
async fn test_view_follows_settings_reset() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let dashboard = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());
    fixture.backend.set_fail_saves(true);

    let mode = dashboard.toggle_view_mode().await;
    assert!(mode.is_err());
    assert_eq!(dashboard.view_mode(), ViewMode::Table);

    fixture.settings.reset().await.unwrap();
    assert_eq!(dashboard.view_mode(), ViewMode::Card);
    assert!(dashboard.layout().cards().is_some());
}

#[tokio::test]
async fn test_layout_follows_service_events() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let dashboard = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());

    let added = fixture
        .service
        .add_printer(AddPrinterParams::new(
            "Workshop",
            "10.0.0.7",
            "code99",
            "SER777",
        ))
        .await
        .unwrap();
    dashboard.flush().await;
    assert_eq!(dashboard.layout().cards().unwrap().len(), 3);
    assert_eq!(dashboard.statistics().total, 3);

    fixture.service.remove_printer(&added.id).await.unwrap();
    dashboard.flush().await;
    assert_eq!(dashboard.printers().len(), 2);
}

#[tokio::test]
async fn test_card_actions_reach_the_service() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let dashboard = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());
    let id = PrinterId::new("2");

    dashboard.perform(&id, CardAction::Pause).await.unwrap();
    dashboard.flush().await;

    let cards = dashboard.layout();
    let card = &cards.cards().unwrap()[1];
    assert_eq!(card.status, PrinterStatus::Paused);
    assert!(card.actions.contains(&CardAction::Resume));
    assert_eq!(fixture.transport.sent().len(), 1);

    fixture.transport.reject_command("resume");
    assert!(dashboard.perform(&id, CardAction::Resume).await.is_err());
    dashboard.flush().await;
    assert_eq!(dashboard.printers()[1].status, PrinterStatus::Paused);
}

#[tokio::test]
async fn test_statistics_tiles() {
    let fixture = Fixture::start(vec![
        idle_printer(),
        printing_printer(),
        pulseprint_core::Printer::new("3", "Spare"),
    ])
    .await;
    let dashboard = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());

    let tiles: Vec<(&str, usize)> = dashboard
        .statistic_tiles()
        .iter()
        .map(|t| (t.label, t.value))
        .collect();
    assert_eq!(
        tiles,
        vec![
            ("Total Printers", 3),
            ("Online", 2),
            ("Printing", 1),
            ("Idle", 1),
            ("Errors", 0),
        ]
    );
}

#[tokio::test]
async fn test_unmount_stops_updates() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let subscribers = fixture.service.event_bus().subscriber_count();
    let dashboard = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());
    assert_eq!(fixture.service.event_bus().subscriber_count(), subscribers + 1);

    dashboard.unmount();
    dashboard.unmount();
    assert!(!dashboard.is_mounted());
    assert_eq!(fixture.service.event_bus().subscriber_count(), subscribers);

    fixture
        .service
        .add_printer(AddPrinterParams::new("Late", "10.0.0.8", "code", "SER888"))
        .await
        .unwrap();
    fixture.service.flush().await;
    assert_eq!(dashboard.printers().len(), 2);

    let second = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());
    drop(second);
    assert_eq!(fixture.service.event_bus().subscriber_count(), subscribers);
}

#[tokio::test]
async fn test_unmounted_dashboard_ignores_settings_changes() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let listeners = fixture.settings.listener_count();
    let dashboard = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());
    assert_eq!(fixture.settings.listener_count(), listeners + 1);

    dashboard.unmount();
    assert_eq!(fixture.settings.listener_count(), listeners);

    fixture
        .settings
        .update_setting(SettingKey::ViewMode, ViewMode::Table)
        .unwrap();
    assert_eq!(dashboard.view_mode(), ViewMode::Card);

    let second = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());
    drop(second);
    assert_eq!(fixture.settings.listener_count(), listeners);
}

#[tokio::test]
async fn test_display_settings_apply_to_cards() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let dashboard = Dashboard::mount(fixture.printer_service(), fixture.settings.clone());

    fixture
        .settings
        .update_setting(SettingKey::ShowTemperatures, false)
        .unwrap();
    fixture
        .settings
        .update_setting(SettingKey::IdleNotifications, true)
        .unwrap();

    let layout = dashboard.layout();
    let cards = layout.cards().unwrap();
    assert!(cards.iter().all(|c| c.temperatures.is_none()));
    assert!(cards[0].alert.is_some());
    assert!(cards[1].progress.is_some());
}

#[tokio::test]
async fn test_status_changes_raise_notifications() {
    let fixture = Fixture::start(Fixture::scenario()).await;
    let recorder = Arc::new(RecordingNotifier::default());
    let dashboard = Dashboard::mount_with_notifier(
        fixture.printer_service(),
        fixture.settings.clone(),
        recorder.clone(),
    );

    // Seed the notifier's view of the fleet
    fixture
        .service
        .apply_status(
            &PrinterId::new("1"),
            PrinterStatusPayload {
                status: "idle".to_string(),
                temperatures: None,
                print: None,
                filament: None,
                error: None,
            },
        )
        .unwrap();
    dashboard.flush().await;
    assert!(recorder.received.lock().is_empty());

    fixture
        .service
        .apply_status(
            &PrinterId::new("2"),
            PrinterStatusPayload {
                status: "FINISH".to_string(),
                temperatures: None,
                print: None,
                filament: None,
                error: None,
            },
        )
        .unwrap();
    dashboard.flush().await;

    let received = recorder.received.lock().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind, NotificationType::Success);
    assert_eq!(received[0].printer_name.as_deref(), Some("Test Printer 2"));
}
