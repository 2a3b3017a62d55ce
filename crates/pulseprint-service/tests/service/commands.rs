use crate::support::{idle_printer, printing_printer, Harness};
use pulseprint_core::{EventKind, PrinterId, PrinterStatus};
use pulseprint_service::{PrintCommand, PrinterService, ServiceError};

fn kinds(events: &[pulseprint_core::PrinterServiceEvent]) -> Vec<EventKind> {
    events.iter().map(|e| e.kind()).collect()
}

#[tokio::test]
async fn test_pause_resume_stop_emit_events() {
    let h = Harness::start(vec![printing_printer()]).await;
    let id = PrinterId::new("2");
    h.clear().await;

    h.service.pause_print(&id).await.unwrap();
    assert_eq!(h.service.printer(&id).unwrap().status, PrinterStatus::Paused);
    assert!(h.service.printer(&id).unwrap().print.is_some());

    h.service.resume_print(&id).await.unwrap();
    assert_eq!(h.service.printer(&id).unwrap().status, PrinterStatus::Printing);

    h.service.stop_print(&id).await.unwrap();
    let printer = h.service.printer(&id).unwrap();
    assert_eq!(printer.status, PrinterStatus::Idle);
    assert!(printer.print.is_none());

    assert_eq!(
        kinds(&h.events().await),
        vec![
            EventKind::PrinterPaused,
            EventKind::Updated,
            EventKind::PrinterResumed,
            EventKind::Updated,
            EventKind::PrinterStopped,
            EventKind::Updated,
        ]
    );

    let commands: Vec<_> = h
        .transport
        .sent()
        .into_iter()
        .map(|(_, body)| body["print"]["command"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(commands, vec!["pause", "resume", "stop"]);
}

#[tokio::test]
async fn test_transport_failure_changes_nothing() {
    let h = Harness::start(vec![printing_printer()]).await;
    let id = PrinterId::new("2");
    let before = h.service.printer(&id).unwrap();
    h.clear().await;

    h.transport.reject_command("pause");
    let err = h.service.pause_print(&id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Transport(_)));

    assert_eq!(h.service.printer(&id).unwrap(), before);
    assert!(h.events().await.is_empty());
}

#[tokio::test]
async fn test_invalid_state_is_rejected_before_sending() {
    let h = Harness::start(vec![idle_printer()]).await;
    let id = PrinterId::new("1");
    h.clear().await;

    for result in [
        h.service.pause_print(&id).await,
        h.service.resume_print(&id).await,
        h.service.stop_print(&id).await,
    ] {
        assert!(matches!(
            result,
            Err(ServiceError::InvalidState {
                status: PrinterStatus::Idle,
                ..
            })
        ));
    }
    assert!(h.transport.sent().is_empty());
    assert!(h.events().await.is_empty());
}

#[tokio::test]
async fn test_start_print_on_idle_printer() {
    let h = Harness::start(vec![idle_printer()]).await;
    let id = PrinterId::new("1");
    h.clear().await;

    h.service
        .send_print_command(
            &id,
            PrintCommand::Start {
                file_name: "benchy.3mf".to_string(),
                layer_total: 240,
                estimated_total_time: 3600,
            },
        )
        .await
        .unwrap();

    let printer = h.service.printer(&id).unwrap();
    assert_eq!(printer.status, PrinterStatus::Printing);
    let job = printer.print.unwrap();
    assert_eq!(job.file_name, "benchy.3mf");
    assert_eq!(job.progress, 0.0);
    assert_eq!(kinds(&h.events().await), vec![EventKind::Updated]);
}

#[tokio::test]
async fn test_unknown_printer() {
    let h = Harness::start(vec![]).await;
    assert!(matches!(
        h.service.pause_print(&PrinterId::new("ghost")).await,
        Err(ServiceError::PrinterNotFound(_))
    ));
}
