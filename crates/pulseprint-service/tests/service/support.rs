use parking_lot::Mutex;
use pulseprint_core::{
    EventFilter, FilamentInfo, PrintJob, Printer, PrinterServiceEvent, PrinterStatus,
    PrinterTemperatures,
};
use pulseprint_service::{LocalPrinterService, PrinterService, ServiceConfig, SimulatedTransport};
use std::sync::Arc;

pub fn idle_printer() -> Printer {
    Printer::new("1", "Test Printer 1")
        .with_model("X1C")
        .with_connection("192.168.1.100", "test123", "TEST001")
        .with_status(PrinterStatus::Idle)
        .with_filament(FilamentInfo {
            filament_type: "PLA".to_string(),
            color: "#ffffff".to_string(),
            remaining: 80.0,
        })
}

pub fn printing_printer() -> Printer {
    Printer::new("2", "Test Printer 2")
        .with_model("P1P")
        .with_connection("192.168.1.101", "test456", "TEST002")
        .with_status(PrinterStatus::Printing)
        .with_temperatures(PrinterTemperatures {
            nozzle: 220.0,
            bed: 60.0,
            chamber: 35.0,
        })
        .with_print(PrintJob {
            progress: 75.0,
            file_name: "test_model.3mf".to_string(),
            layer_current: 150,
            layer_total: 200,
            time_remaining: 1800,
            estimated_total_time: 7200,
        })
        .with_filament(FilamentInfo {
            filament_type: "PETG".to_string(),
            color: "#ff0000".to_string(),
            remaining: 60.0,
        })
}

pub fn offline_printer() -> Printer {
    Printer::new("3", "Test Printer 3")
        .with_model("A1")
        .with_connection("192.168.1.102", "test789", "TEST003")
}

pub struct Harness {
    pub service: Arc<LocalPrinterService>,
    pub transport: Arc<SimulatedTransport>,
    pub events: Arc<Mutex<Vec<PrinterServiceEvent>>>,
}

impl Harness {
    /// Service with a recording subscriber registered before `initialize`
    pub async fn start(seed: Vec<Printer>) -> Self {
        let transport = Arc::new(SimulatedTransport::new());
        let service = Arc::new(
            LocalPrinterService::new(ServiceConfig::with_printers(seed), transport.clone())
                .unwrap(),
        );
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        service.subscribe(
            EventFilter::All,
            Arc::new(move |event: &PrinterServiceEvent| sink.lock().push(event.clone())),
        );
        service.initialize().await.unwrap();
        service.flush().await;
        Self {
            service,
            transport,
            events,
        }
    }

    /// Events delivered so far, after draining the queue
    pub async fn events(&self) -> Vec<PrinterServiceEvent> {
        self.service.flush().await;
        self.events.lock().clone()
    }

    /// Forget recorded events
    pub async fn clear(&self) {
        self.service.flush().await;
        self.events.lock().clear();
    }
}
