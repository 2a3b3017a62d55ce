//! Dashboard view model
//!
//! Subscribes to the printer service on mount and keeps a read-only copy of
//! the printer collection. The layout is recomputed from that copy and the
//! current settings on every call, so it always reflects the latest event.

use crate::notifications::{Notifier, StatusNotifier, TracingNotifier};
use crate::ui::printer_card::{CardAction, PrinterCard, PrinterTable};
use crate::view_mode::{ViewModeToggle, ViewToggleControls};
use parking_lot::{Mutex, RwLock};
use pulseprint_core::{
    EventFilter, Printer, PrinterId, PrinterServiceEvent, PrinterStatistics, SubscriptionId,
};
use pulseprint_service::{PrinterService, ServiceResult};
use pulseprint_settings::{
    ListenerId, SettingKey, SettingValue, SettingsResult, SettingsStore, ViewMode,
};
use serde::Serialize;
use std::sync::{Arc, Weak};

/// Dashboard heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardHeader {
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const HEADER: DashboardHeader = DashboardHeader {
    title: "PulsePrint Desktop",
    subtitle: "Monitor and control your 3D printers",
};

/// Shown instead of cards or table when there are no printers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: &'static str,
    pub message: &'static str,
}

pub const EMPTY_STATE: EmptyState = EmptyState {
    title: "No Printers Added",
    message: "Add a printer or import a printer list to start monitoring",
};

/// What the printer area shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "camelCase")]
pub enum DashboardLayout {
    Empty(EmptyState),
    Cards(Vec<PrinterCard>),
    Table(PrinterTable),
}

impl DashboardLayout {
    /// Cards, when in card view
    pub fn cards(&self) -> Option<&[PrinterCard]> {
        match self {
            DashboardLayout::Cards(cards) => Some(cards),
            _ => None,
        }
    }

    /// Table, when in table view
    pub fn table(&self) -> Option<&PrinterTable> {
        match self {
            DashboardLayout::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DashboardLayout::Empty(_))
    }
}

/// One number in the statistics overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatisticTile {
    pub label: &'static str,
    pub value: usize,
}

/// What `unmount` has to undo
#[derive(Debug, Clone, Copy)]
struct Registration {
    subscription: SubscriptionId,
    settings_listener: ListenerId,
}

#[derive(Debug, Default)]
struct DashboardState {
    printers: Vec<Printer>,
    view: ViewModeToggle,
    /// A snapshot event has arrived since mount
    synced: bool,
}

impl DashboardState {
    fn apply(&mut self, event: &PrinterServiceEvent) {
        match event {
            PrinterServiceEvent::Initialized(printers) | PrinterServiceEvent::Updated(printers) => {
                self.printers = printers.clone();
                self.synced = true;
            }
            PrinterServiceEvent::PrinterRemoved(removed) => {
                self.printers.retain(|p| p.id != removed.id);
            }
            PrinterServiceEvent::PrinterAdded(added) => self.upsert(added),
            PrinterServiceEvent::PrinterPaused(printer)
            | PrinterServiceEvent::PrinterResumed(printer)
            | PrinterServiceEvent::PrinterStopped(printer)
            | PrinterServiceEvent::PrinterConnected(printer)
            | PrinterServiceEvent::PrinterDisconnected(printer) => self.upsert(printer),
        }
    }

    fn upsert(&mut self, printer: &Printer) {
        match self.printers.iter_mut().find(|p| p.id == printer.id) {
            Some(existing) => *existing = printer.clone(),
            None => self.printers.push(printer.clone()),
        }
    }
}

/// Main dashboard screen
pub struct Dashboard {
    service: Arc<dyn PrinterService>,
    settings: Arc<SettingsStore>,
    state: Arc<RwLock<DashboardState>>,
    registration: Mutex<Option<Registration>>,
}

impl Dashboard {
    /// Subscribe to the service, logging notifications through `tracing`
    pub fn mount(service: Arc<dyn PrinterService>, settings: Arc<SettingsStore>) -> Self {
        Self::mount_with_notifier(service, settings, Arc::new(TracingNotifier))
    }

    /// Subscribe to the service, delivering notifications to `notifier`
    pub fn mount_with_notifier(
        service: Arc<dyn PrinterService>,
        settings: Arc<SettingsStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let state = Arc::new(RwLock::new(DashboardState {
            view: ViewModeToggle::new(settings.settings().view_mode),
            ..DashboardState::default()
        }));

        let status_notifier = StatusNotifier::new(notifier);
        let handler_state = state.clone();
        let handler_settings = settings.clone();
        let subscription = service.subscribe(
            EventFilter::All,
            Arc::new(move |event: &PrinterServiceEvent| {
                handler_state.write().apply(event);
                if let Some(printers) = event.snapshot() {
                    status_notifier.observe(printers, &handler_settings.settings());
                }
            }),
        );

        // Seed from the service unless an event got here first
        let current = service.all_printers();
        {
            let mut state = state.write();
            if !state.synced {
                state.printers = current;
            }
        }

        // Follow view mode changes made elsewhere, e.g. a settings reset
        let weak: Weak<RwLock<DashboardState>> = Arc::downgrade(&state);
        let settings_listener = settings.on_setting_changed(move |key, value| {
            if let (SettingKey::ViewMode, SettingValue::ViewMode(mode)) = (key, value) {
                if let Some(state) = weak.upgrade() {
                    state.write().view.select(*mode);
                }
            }
        });

        tracing::debug!("Dashboard mounted ({:?})", subscription);
        Self {
            service,
            settings,
            state,
            registration: Mutex::new(Some(Registration {
                subscription,
                settings_listener,
            })),
        }
    }

    /// Stop receiving events and settings changes; safe to call more than once
    pub fn unmount(&self) {
        let registration = self.registration.lock().take();
        if let Some(registration) = registration {
            self.service.unsubscribe(registration.subscription);
            self.settings.remove_listener(registration.settings_listener);
            tracing::debug!("Dashboard unmounted ({:?})", registration.subscription);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.registration.lock().is_some()
    }

    /// Wait until every event published so far has reached the dashboard
    pub async fn flush(&self) {
        self.service.flush().await;
    }

    pub fn header(&self) -> DashboardHeader {
        HEADER
    }

    /// The dashboard's copy of the printer collection
    pub fn printers(&self) -> Vec<Printer> {
        self.state.read().printers.clone()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.state.read().view.mode()
    }

    /// Empty state, cards or table, depending on printers and view mode
    pub fn layout(&self) -> DashboardLayout {
        let settings = self.settings.settings();
        let state = self.state.read();
        if state.printers.is_empty() {
            return DashboardLayout::Empty(EMPTY_STATE);
        }
        match state.view.mode() {
            ViewMode::Card => DashboardLayout::Cards(
                state
                    .printers
                    .iter()
                    .map(|p| PrinterCard::new(p, &settings))
                    .collect(),
            ),
            ViewMode::Table => DashboardLayout::Table(PrinterTable::new(&state.printers)),
        }
    }

    /// Card/table controls; absent while there are no printers
    pub fn view_toggle(&self) -> Option<ViewToggleControls> {
        let state = self.state.read();
        (!state.printers.is_empty()).then(|| state.view.controls())
    }

    pub fn statistics(&self) -> PrinterStatistics {
        PrinterStatistics::from_printers(&self.state.read().printers)
    }

    /// Statistics overview, in display order
    pub fn statistic_tiles(&self) -> Vec<StatisticTile> {
        let stats = self.statistics();
        vec![
            StatisticTile {
                label: "Total Printers",
                value: stats.total,
            },
            StatisticTile {
                label: "Online",
                value: stats.online,
            },
            StatisticTile {
                label: "Printing",
                value: stats.printing,
            },
            StatisticTile {
                label: "Idle",
                value: stats.idle,
            },
            StatisticTile {
                label: "Errors",
                value: stats.error,
            },
        ]
    }

    /// Switch the view and persist the choice
    ///
    /// The view changes immediately. If saving fails the error is returned
    /// and the view stays as selected.
    pub async fn set_view_mode(&self, mode: ViewMode) -> SettingsResult<()> {
        if self.state.write().view.select(mode) {
            tracing::debug!("Dashboard view switched to {}", mode);
        }
        self.persist_view_mode(mode).await
    }

    /// Switch to the other view and persist the choice
    pub async fn toggle_view_mode(&self) -> SettingsResult<ViewMode> {
        let mode = self.state.write().view.toggle();
        tracing::debug!("Dashboard view switched to {}", mode);
        self.persist_view_mode(mode).await?;
        Ok(mode)
    }

    async fn persist_view_mode(&self, mode: ViewMode) -> SettingsResult<()> {
        self.settings.update_setting(SettingKey::ViewMode, mode)?;
        if let Err(e) = self.settings.save().await {
            tracing::warn!("Failed to save view mode {}: {}", mode, e);
            return Err(e);
        }
        Ok(())
    }

    /// Run a card action against the service
    pub async fn perform(&self, id: &PrinterId, action: CardAction) -> ServiceResult<()> {
        tracing::info!("{} requested for printer {}", action.label(), id);
        match action {
            CardAction::Connect => self.service.connect_printer(id).await,
            CardAction::Disconnect => self.service.disconnect_printer(id).await,
            CardAction::Pause => self.service.pause_print(id).await,
            CardAction::Resume => self.service.resume_print(id).await,
            CardAction::Stop => self.service.stop_print(id).await,
        }
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Dashboard")
            .field("printers", &state.printers.len())
            .field("view", &state.view.mode())
            .field("mounted", &self.registration.lock().is_some())
            .finish()
    }
}
