//! Tests for event_bus delivery order

use pulseprint_core::event_bus::*;
use pulseprint_core::{Printer, PrinterStatus};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn printer(n: usize) -> Printer {
    Printer::new(format!("p{}", n), format!("Printer {}", n)).with_status(PrinterStatus::Idle)
}

#[test]
fn test_events_arrive_in_publication_order() {
    let bus = EventBus::new().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let s = seen.clone();
    bus.subscribe(EventFilter::All, move |event| {
        if let Some(p) = event.printer() {
            s.lock().unwrap().push(p.name.clone());
        }
    });

    for n in 0..50 {
        bus.publish(PrinterServiceEvent::PrinterAdded(printer(n))).unwrap();
    }
    bus.flush_blocking();

    let seen = seen.lock().unwrap();
    let expected: Vec<String> = (0..50).map(|n| format!("Printer {}", n)).collect();
    assert_eq!(*seen, expected);
}

#[test]
fn test_handler_never_runs_concurrently() {
    let bus = Arc::new(EventBus::new().unwrap());
    let in_handler = Arc::new(AtomicBool::new(false));
    let overlaps = Arc::new(AtomicUsize::new(0));
    let delivered = Arc::new(AtomicUsize::new(0));

    {
        let in_handler = in_handler.clone();
        let overlaps = overlaps.clone();
        let delivered = delivered.clone();
        bus.subscribe(EventFilter::All, move |_| {
            if in_handler.swap(true, Ordering::SeqCst) {
                overlaps.fetch_add(1, Ordering::SeqCst);
            }
            thread::sleep(Duration::from_micros(200));
            delivered.fetch_add(1, Ordering::SeqCst);
            in_handler.store(false, Ordering::SeqCst);
        });
    }

    // Publish from several threads at once
    let publishers: Vec<_> = (0..4)
        .map(|t| {
            let bus = bus.clone();
            thread::spawn(move || {
                for n in 0..10 {
                    bus.publish(PrinterServiceEvent::PrinterAdded(printer(t * 10 + n)))
                        .unwrap();
                }
            })
        })
        .collect();
    for publisher in publishers {
        publisher.join().unwrap();
    }
    bus.flush_blocking();

    assert_eq!(delivered.load(Ordering::SeqCst), 40);
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}

#[test]
fn test_delivery_happens_off_the_publishing_thread() {
    let bus = EventBus::new().unwrap();
    let publisher = thread::current().id();
    let same_thread = Arc::new(AtomicBool::new(true));

    let s = same_thread.clone();
    bus.subscribe(EventFilter::All, move |_| {
        s.store(thread::current().id() == publisher, Ordering::SeqCst);
    });
    bus.publish(PrinterServiceEvent::Updated(vec![])).unwrap();
    bus.flush_blocking();

    assert!(!same_thread.load(Ordering::SeqCst));
}

#[test]
fn test_subscription_registered_before_publish_sees_initialized() {
    let bus = EventBus::new().unwrap();
    let snapshot = Arc::new(Mutex::new(None));

    let s = snapshot.clone();
    bus.subscribe(EventFilter::Kinds(vec![EventKind::Initialized]), move |event| {
        *s.lock().unwrap() = event.snapshot().map(|p| p.to_vec());
    });

    let printers = vec![printer(1), printer(2)];
    bus.publish(PrinterServiceEvent::Initialized(printers.clone()))
        .unwrap();
    bus.flush_blocking();

    assert_eq!(snapshot.lock().unwrap().as_ref(), Some(&printers));
}
