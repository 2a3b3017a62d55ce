use crate::support::{idle_printer, offline_printer, Harness};
use pulseprint_core::{
    AddPrinterParams, EventKind, PrinterId, PrinterServiceEvent, PrinterStatus,
};
use pulseprint_service::{PrinterService, ServiceError};

#[tokio::test]
async fn test_add_printer() {
    let h = Harness::start(vec![]).await;

    let params =
        AddPrinterParams::new("Bench", "192.168.1.50", "abc123", "SER001").with_model("P1S");
    let added = h.service.add_printer(params).await.unwrap();

    assert_eq!(added.status, PrinterStatus::Offline);
    assert_eq!(added.model.as_deref(), Some("P1S"));
    assert_eq!(h.service.all_printers(), vec![added.clone()]);

    let events = h.events().await;
    let tail = &events[events.len() - 2..];
    assert!(matches!(&tail[0], PrinterServiceEvent::PrinterAdded(p) if p.id == added.id));
    assert!(matches!(&tail[1], PrinterServiceEvent::Updated(all) if all.len() == 1));
}

#[tokio::test]
async fn test_add_printer_rejects_invalid_and_duplicate() {
    let h = Harness::start(vec![idle_printer()]).await;
    h.clear().await;

    let bad_ip = AddPrinterParams::new("Bench", "not-an-ip", "abc", "SER9");
    assert!(matches!(
        h.service.add_printer(bad_ip).await,
        Err(ServiceError::Validation(_))
    ));

    let duplicate = AddPrinterParams::new("Copy", "192.168.1.9", "abc", "TEST001");
    assert!(matches!(
        h.service.add_printer(duplicate).await,
        Err(ServiceError::DuplicatePrinter { .. })
    ));

    assert_eq!(h.service.all_printers().len(), 1);
    assert!(h.events().await.is_empty());
}

#[tokio::test]
async fn test_remove_printer_disconnects() {
    let h = Harness::start(vec![offline_printer()]).await;
    let id = PrinterId::new("3");

    h.service.connect_printer(&id).await.unwrap();
    assert!(h.transport.is_connected(&id));
    h.clear().await;

    let removed = h.service.remove_printer(&id).await.unwrap();
    assert_eq!(removed.id, id);
    assert!(!h.transport.is_connected(&id));
    assert!(h.service.all_printers().is_empty());

    let kinds: Vec<_> = h.events().await.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec![EventKind::PrinterRemoved, EventKind::Updated]);
}

#[tokio::test]
async fn test_connect_and_disconnect() {
    let h = Harness::start(vec![offline_printer()]).await;
    let id = PrinterId::new("3");
    h.clear().await;

    h.service.connect_printer(&id).await.unwrap();
    assert_eq!(h.service.printer(&id).unwrap().status, PrinterStatus::Idle);

    // Already connected: no-op
    h.service.connect_printer(&id).await.unwrap();

    h.service.disconnect_printer(&id).await.unwrap();
    let printer = h.service.printer(&id).unwrap();
    assert_eq!(printer.status, PrinterStatus::Offline);
    assert!(printer.filament.is_none());

    let kinds: Vec<_> = h.events().await.iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::PrinterConnected,
            EventKind::Updated,
            EventKind::PrinterDisconnected,
            EventKind::Updated,
        ]
    );
}

#[tokio::test]
async fn test_failed_connect_stays_offline() {
    let h = Harness::start(vec![offline_printer()]).await;
    let id = PrinterId::new("3");
    h.clear().await;

    h.transport.set_unreachable(&id, true);
    assert!(matches!(
        h.service.connect_printer(&id).await,
        Err(ServiceError::Transport(_))
    ));
    assert_eq!(h.service.printer(&id).unwrap().status, PrinterStatus::Offline);
    assert!(h.events().await.is_empty());
}
