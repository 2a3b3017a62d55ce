use pulseprint_core::{PrinterId, PrinterServiceEvent, PrinterStatus};
use pulseprint_service::{LocalPrinterService, PrinterService, ServiceConfig, SimulatedTransport};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_simulator_publishes_updates() {
    let config = ServiceConfig {
        update_interval_ms: 1000,
        ..ServiceConfig::default()
    };
    let service = LocalPrinterService::new(config, Arc::new(SimulatedTransport::new())).unwrap();
    let mut rx = service.event_bus().receiver();
    service.initialize().await.unwrap();

    assert!(matches!(
        rx.recv().await.unwrap(),
        PrinterServiceEvent::Initialized(_)
    ));

    let before = service.printer(&PrinterId::new("sim-p1s")).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let event = rx.recv().await.unwrap();
    let PrinterServiceEvent::Updated(printers) = event else {
        panic!("expected an update");
    };
    let after = printers
        .iter()
        .find(|p| p.id.as_str() == "sim-p1s")
        .unwrap();
    assert_eq!(after.status, PrinterStatus::Printing);
    assert!(after.progress().unwrap() > before.progress().unwrap());

    service.destroy().await;
}
