//! Printer Service
//!
//! Owns the printer collection. Every change is published on the event bus
//! as the specific event followed by `Updated` with the full collection.
//! Commands run one at a time; local state changes only after the transport
//! has accepted the command.

use crate::command::PrintCommand;
use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::simulation;
use crate::transport::{MqttConnectionParams, PrinterTransport};
use crate::wire::PrinterStatusPayload;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use pulseprint_core::{
    AddPrinterParams, EventBus, EventFilter, EventHandler, Printer, PrinterId,
    PrinterServiceEvent, PrinterStatus, SharedPrinters, SnapshotHandler, SubscriptionId,
};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Printer service contract
#[async_trait]
pub trait PrinterService: Send + Sync {
    /// Snapshot of every printer
    fn all_printers(&self) -> Vec<Printer>;

    /// Snapshot of one printer
    fn printer(&self, id: &PrinterId) -> Option<Printer>;

    /// Register an event handler
    fn subscribe(&self, filter: EventFilter, handler: EventHandler) -> SubscriptionId;

    /// Register a handler for the full collection
    fn subscribe_snapshots(&self, handler: SnapshotHandler) -> SubscriptionId;

    /// Remove a handler; no delivery to it starts after this returns
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Wait until every event published so far has been delivered
    async fn flush(&self);

    /// Load the initial printers and announce them
    async fn initialize(&self) -> ServiceResult<()>;

    /// Open the connection to a printer
    async fn connect_printer(&self, id: &PrinterId) -> ServiceResult<()>;

    /// Close the connection to a printer
    async fn disconnect_printer(&self, id: &PrinterId) -> ServiceResult<()>;

    /// Send a print command
    async fn send_print_command(&self, id: &PrinterId, command: PrintCommand)
        -> ServiceResult<()>;

    /// Pause the running print
    async fn pause_print(&self, id: &PrinterId) -> ServiceResult<()> {
        self.send_print_command(id, PrintCommand::Pause).await
    }

    /// Resume a paused print
    async fn resume_print(&self, id: &PrinterId) -> ServiceResult<()> {
        self.send_print_command(id, PrintCommand::Resume).await
    }

    /// Stop the current print
    async fn stop_print(&self, id: &PrinterId) -> ServiceResult<()> {
        self.send_print_command(id, PrintCommand::Stop).await
    }

    /// Add a printer
    async fn add_printer(&self, params: AddPrinterParams) -> ServiceResult<Printer>;

    /// Remove a printer
    async fn remove_printer(&self, id: &PrinterId) -> ServiceResult<Printer>;

    /// Apply a status report from the backend
    fn apply_status(&self, id: &PrinterId, payload: PrinterStatusPayload)
        -> ServiceResult<Printer>;

    /// Shut the service down; safe to call more than once
    async fn destroy(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Running,
    Destroyed,
}

/// In-process printer service
pub struct LocalPrinterService {
    config: ServiceConfig,
    transport: Arc<dyn PrinterTransport>,
    bus: Arc<EventBus>,
    printers: SharedPrinters,
    lifecycle: RwLock<Lifecycle>,
    /// Serializes commands
    command_lock: tokio::sync::Mutex<()>,
    simulator: Mutex<Option<JoinHandle<()>>>,
}

impl LocalPrinterService {
    /// Create a service; call `initialize` before issuing commands
    pub fn new(config: ServiceConfig, transport: Arc<dyn PrinterTransport>) -> ServiceResult<Self> {
        let bus = EventBus::with_config(config.event_bus.clone())?;
        Ok(Self {
            config,
            transport,
            bus: Arc::new(bus),
            printers: pulseprint_core::shared_printers(),
            lifecycle: RwLock::new(Lifecycle::Created),
            command_lock: tokio::sync::Mutex::new(()),
            simulator: Mutex::new(None),
        })
    }

    /// The event bus carrying this service's events
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Whether `initialize` has completed and `destroy` has not been called
    pub fn is_running(&self) -> bool {
        *self.lifecycle.read() == Lifecycle::Running
    }

    fn ensure_running(&self) -> ServiceResult<()> {
        match *self.lifecycle.read() {
            Lifecycle::Running => Ok(()),
            Lifecycle::Created => Err(ServiceError::NotInitialized),
            Lifecycle::Destroyed => Err(ServiceError::Destroyed),
        }
    }

    fn find(&self, id: &PrinterId) -> ServiceResult<Printer> {
        self.printer(id)
            .ok_or_else(|| ServiceError::PrinterNotFound(id.clone()))
    }

    /// Mutate one printer and publish `event(printer)` then `Updated(all)`
    ///
    /// Publishing happens under the write lock so events leave in the same
    /// order the changes were made.
    fn commit<F>(
        &self,
        id: &PrinterId,
        mutate: F,
        event: Option<fn(Printer) -> PrinterServiceEvent>,
    ) -> ServiceResult<Printer>
    where
        F: FnOnce(&mut Printer) -> ServiceResult<()>,
    {
        let mut printers = self.printers.write();
        let printer = printers
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ServiceError::PrinterNotFound(id.clone()))?;

        let mut updated = printer.clone();
        mutate(&mut updated)?;
        updated.normalize();
        *printer = updated.clone();

        if let Some(event) = event {
            self.publish(event(updated.clone()));
        }
        self.publish(PrinterServiceEvent::Updated(printers.clone()));
        Ok(updated)
    }

    fn publish(&self, event: PrinterServiceEvent) {
        let description = event.description();
        if let Err(e) = self.bus.publish(event) {
            tracing::debug!("Dropped event {}: {}", description, e);
        }
    }

    fn start_simulator(&self) {
        let printers = self.printers.clone();
        let bus = self.bus.clone();
        let interval = self.config.update_interval();
        let elapsed_secs = interval.as_secs_f64();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if bus.is_closed() {
                    break;
                }

                let published = {
                    let mut guard = printers.write();
                    let mut changed = false;
                    for printer in guard.iter_mut() {
                        changed |= simulation::advance(printer, elapsed_secs);
                    }
                    !changed || bus.publish(PrinterServiceEvent::Updated(guard.clone())).is_ok()
                };
                if !published {
                    break;
                }
            }
            tracing::debug!("Printer simulator stopped");
        });
        *self.simulator.lock() = Some(handle);
        tracing::info!(
            "Printer simulator running every {} ms",
            self.config.update_interval_ms
        );
    }

    fn stop_simulator(&self) {
        if let Some(handle) = self.simulator.lock().take() {
            handle.abort();
        }
    }
}

#[async_trait]
impl PrinterService for LocalPrinterService {
    fn all_printers(&self) -> Vec<Printer> {
        self.printers.read().clone()
    }

    fn printer(&self, id: &PrinterId) -> Option<Printer> {
        self.printers.read().iter().find(|p| &p.id == id).cloned()
    }

    fn subscribe(&self, filter: EventFilter, handler: EventHandler) -> SubscriptionId {
        self.bus.subscribe(filter, move |event| handler(event))
    }

    fn subscribe_snapshots(&self, handler: SnapshotHandler) -> SubscriptionId {
        self.bus.subscribe_snapshots(move |printers| handler(printers))
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    async fn flush(&self) {
        self.bus.flush().await;
    }

    async fn initialize(&self) -> ServiceResult<()> {
        {
            let mut lifecycle = self.lifecycle.write();
            match *lifecycle {
                Lifecycle::Created => *lifecycle = Lifecycle::Running,
                Lifecycle::Running => return Err(ServiceError::AlreadyInitialized),
                Lifecycle::Destroyed => return Err(ServiceError::Destroyed),
            }
        }

        {
            let mut printers = self.printers.write();
            printers.clear();
            for mut printer in self.config.seed.iter().cloned() {
                if printers.iter().any(|p| p.id == printer.id) {
                    tracing::warn!("Skipping duplicate printer id {}", printer.id);
                    continue;
                }
                printer.normalize();
                printers.push(printer);
            }
            self.publish(PrinterServiceEvent::Initialized(printers.clone()));
            tracing::info!(
                "Printer service initialized with {} printers via {} transport",
                printers.len(),
                self.transport.name()
            );
        }

        if self.config.simulate {
            self.start_simulator();
        }
        Ok(())
    }

    async fn connect_printer(&self, id: &PrinterId) -> ServiceResult<()> {
        self.ensure_running()?;
        let _guard = self.command_lock.lock().await;

        let printer = self.find(id)?;
        if printer.status.is_online() && printer.status != PrinterStatus::Connecting {
            tracing::debug!("Printer {} already connected", printer.name);
            return Ok(());
        }
        let params = MqttConnectionParams::from_printer(&printer)?;

        tracing::info!("Connecting to {} at {}", printer.name, params.host);
        self.transport.connect(id, &params).await.map_err(|e| {
            tracing::warn!("Failed to connect to {}: {}", printer.name, e);
            ServiceError::from(e)
        })?;
        self.ensure_running()?;

        self.commit(
            id,
            |p| {
                p.set_status(PrinterStatus::Idle);
                Ok(())
            },
            Some(PrinterServiceEvent::PrinterConnected),
        )?;
        Ok(())
    }

    async fn disconnect_printer(&self, id: &PrinterId) -> ServiceResult<()> {
        self.ensure_running()?;
        let _guard = self.command_lock.lock().await;

        let printer = self.find(id)?;
        if printer.status == PrinterStatus::Offline {
            return Ok(());
        }

        self.transport.disconnect(id).await.map_err(|e| {
            tracing::warn!("Failed to disconnect from {}: {}", printer.name, e);
            ServiceError::from(e)
        })?;
        self.ensure_running()?;

        self.commit(
            id,
            |p| {
                p.set_status(PrinterStatus::Offline);
                Ok(())
            },
            Some(PrinterServiceEvent::PrinterDisconnected),
        )?;
        tracing::info!("Disconnected from {}", printer.name);
        Ok(())
    }

    async fn send_print_command(
        &self,
        id: &PrinterId,
        command: PrintCommand,
    ) -> ServiceResult<()> {
        self.ensure_running()?;
        let _guard = self.command_lock.lock().await;

        let printer = self.find(id)?;
        let invalid_state = |status| ServiceError::InvalidState {
            printer: id.clone(),
            status,
            command: command.name().to_string(),
        };
        if !command.allowed_from(printer.status) {
            return Err(invalid_state(printer.status));
        }

        tracing::info!("Sending {} to {}", command, printer.name);
        self.transport.send(id, &command).await.map_err(|e| {
            tracing::warn!("Command {} failed on {}: {}", command, printer.name, e);
            ServiceError::from(e)
        })?;
        self.ensure_running()?;

        let event: Option<fn(Printer) -> PrinterServiceEvent> = match command {
            PrintCommand::Start { .. } => None,
            PrintCommand::Pause => Some(PrinterServiceEvent::PrinterPaused),
            PrintCommand::Resume => Some(PrinterServiceEvent::PrinterResumed),
            PrintCommand::Stop => Some(PrinterServiceEvent::PrinterStopped),
        };

        self.commit(
            id,
            |p| {
                // A status report may have landed while the command was in flight
                if !command.allowed_from(p.status) {
                    return Err(invalid_state(p.status));
                }
                if let PrintCommand::Start {
                    file_name,
                    layer_total,
                    estimated_total_time,
                } = &command
                {
                    p.print = Some(pulseprint_core::PrintJob::new(
                        file_name.clone(),
                        *layer_total,
                        *estimated_total_time,
                    ));
                }
                p.set_status(command.resulting_status());
                Ok(())
            },
            event,
        )?;
        Ok(())
    }

    async fn add_printer(&self, params: AddPrinterParams) -> ServiceResult<Printer> {
        self.ensure_running()?;
        params.validate()?;
        let _guard = self.command_lock.lock().await;

        let serial = params.serial.trim().to_string();
        let mut printers = self.printers.write();
        if printers
            .iter()
            .any(|p| p.serial.as_deref() == Some(serial.as_str()))
        {
            return Err(ServiceError::DuplicatePrinter { serial });
        }

        let printer = params.into_printer(PrinterId::generate());
        printers.push(printer.clone());
        self.publish(PrinterServiceEvent::PrinterAdded(printer.clone()));
        self.publish(PrinterServiceEvent::Updated(printers.clone()));
        tracing::info!("Added printer {} ({})", printer.name, printer.id);
        Ok(printer)
    }

    async fn remove_printer(&self, id: &PrinterId) -> ServiceResult<Printer> {
        self.ensure_running()?;
        let _guard = self.command_lock.lock().await;

        let printer = self.find(id)?;
        if printer.status != PrinterStatus::Offline {
            if let Err(e) = self.transport.disconnect(id).await {
                tracing::warn!("Disconnect of {} before removal failed: {}", printer.name, e);
            }
        }
        self.ensure_running()?;

        let mut printers = self.printers.write();
        let index = printers
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| ServiceError::PrinterNotFound(id.clone()))?;
        let removed = printers.remove(index);
        self.publish(PrinterServiceEvent::PrinterRemoved(removed.clone()));
        self.publish(PrinterServiceEvent::Updated(printers.clone()));
        tracing::info!("Removed printer {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    fn apply_status(
        &self,
        id: &PrinterId,
        payload: PrinterStatusPayload,
    ) -> ServiceResult<Printer> {
        self.ensure_running()?;
        self.commit(id, |p| payload.apply_to(p), None)
    }

    async fn destroy(&self) {
        {
            let mut lifecycle = self.lifecycle.write();
            if *lifecycle == Lifecycle::Destroyed {
                return;
            }
            *lifecycle = Lifecycle::Destroyed;
        }
        self.stop_simulator();

        let online: Vec<Printer> = self
            .printers
            .read()
            .iter()
            .filter(|p| p.status != PrinterStatus::Offline)
            .cloned()
            .collect();
        for printer in online {
            if let Err(e) = self.transport.disconnect(&printer.id).await {
                tracing::debug!("Disconnect of {} during shutdown failed: {}", printer.name, e);
            }
        }

        self.bus.close();
        tracing::info!("Printer service destroyed");
    }
}

impl Drop for LocalPrinterService {
    fn drop(&mut self) {
        self.stop_simulator();
        self.bus.close();
    }
}

impl std::fmt::Debug for LocalPrinterService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPrinterService")
            .field("lifecycle", &*self.lifecycle.read())
            .field("printers", &self.printers.read().len())
            .field("transport", &self.transport.name())
            .finish()
    }
}
