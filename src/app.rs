//! Application wiring
//!
//! Builds the settings store and printer service, mounts the dashboard and
//! tears everything down again in order.

use anyhow::Context;
use pulseprint_core::PrinterServiceEvent;
use pulseprint_service::{
    LocalPrinterService, PrinterService, PrinterTransport, ServiceConfig, SimulatedTransport,
};
use pulseprint_settings::{SettingsBackend, SettingsStore};
use pulseprint_ui::{Dashboard, SettingsScreen};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

/// A running PulsePrint instance
pub struct Application {
    service: Arc<LocalPrinterService>,
    settings: Arc<SettingsStore>,
    dashboard: Dashboard,
}

impl Application {
    /// Start with the simulated transport
    pub async fn start(
        config: ServiceConfig,
        backend: Arc<dyn SettingsBackend>,
    ) -> anyhow::Result<Self> {
        Self::start_with_transport(config, backend, Arc::new(SimulatedTransport::new())).await
    }

    /// Load settings, create and initialize the service and mount the dashboard
    ///
    /// Unreadable settings are logged and replaced by defaults.
    pub async fn start_with_transport(
        config: ServiceConfig,
        backend: Arc<dyn SettingsBackend>,
        transport: Arc<dyn PrinterTransport>,
    ) -> anyhow::Result<Self> {
        let settings = Arc::new(SettingsStore::new(backend));
        if let Err(e) = settings.load().await {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
        }

        let service = Arc::new(
            LocalPrinterService::new(config, transport)
                .context("Failed to create printer service")?,
        );

        // Mount before initializing so the dashboard sees the first snapshot
        let dashboard = Dashboard::mount(service.clone(), settings.clone());
        service
            .initialize()
            .await
            .context("Failed to initialize printer service")?;

        Ok(Self {
            service,
            settings,
            dashboard,
        })
    }

    pub fn service(&self) -> &Arc<LocalPrinterService> {
        &self.service
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Open the settings screen; it unmounts when dropped
    pub fn settings_screen(&self) -> SettingsScreen {
        SettingsScreen::mount(self.service.clone(), self.settings.clone())
    }

    /// Log service events until `shutdown` resolves or the bus closes
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: std::future::Future<Output = ()>,
    {
        let mut events = self.service.event_bus().receiver();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                event = events.recv() => match event {
                    Ok(PrinterServiceEvent::Updated(_)) => {
                        let stats = self.dashboard.statistics();
                        tracing::debug!(
                            "{} printers: {} online, {} printing, {} idle, {} errors",
                            stats.total,
                            stats.online,
                            stats.printing,
                            stats.idle,
                            stats.error
                        );
                    }
                    Ok(event) => tracing::info!("{}", event.description()),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Event log fell behind, {} events skipped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    }

    /// Unmount the dashboard and destroy the service
    pub async fn shutdown(self) {
        self.dashboard.unmount();
        self.service.destroy().await;
        tracing::info!("PulsePrint stopped");
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("service", &self.service)
            .field("settings", &self.settings)
            .field("dashboard", &self.dashboard)
            .finish()
    }
}
