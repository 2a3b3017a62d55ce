//! Event Bus implementation.
//!
//! Events are queued by `publish` and delivered in publication order by a
//! single dispatcher thread, so a handler is never entered twice at once.

use parking_lot::{Mutex, RwLock};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle, ThreadId};
use tokio::sync::{broadcast, oneshot};
use uuid::Uuid;

use super::events::{EventKind, PrinterServiceEvent};
use crate::data::Printer;
use crate::types::EventHandler;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event kinds
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these kinds.
    Kinds(Vec<EventKind>),
    /// Receive only events carrying the full printer collection.
    Snapshots,
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &PrinterServiceEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Kinds(kinds) => kinds.contains(&event.kind()),
            EventFilter::Snapshots => event.kind().carries_snapshot(),
        }
    }
}

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Channel capacity for the async broadcast receivers.
    pub channel_capacity: usize,
    /// Name of the dispatcher thread.
    pub thread_name: String,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            thread_name: "printer-events".to_string(),
        }
    }
}

/// Error types for event bus operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    /// The bus was closed
    #[error("Event bus is closed")]
    Closed,
    /// The dispatcher thread could not be started
    #[error("Failed to start event dispatcher: {0}")]
    Spawn(String),
}

/// A registered handler
struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: EventHandler,
    active: AtomicBool,
    /// Held by the dispatcher for the whole of one delivery
    delivery: Mutex<()>,
}

impl Subscription {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

type Subscriptions = Arc<RwLock<Vec<Arc<Subscription>>>>;

/// Completion signal for `flush`
enum Barrier {
    Async(oneshot::Sender<()>),
    Blocking(mpsc::Sender<()>),
}

impl Barrier {
    fn release(self) {
        match self {
            Barrier::Async(tx) => {
                let _ = tx.send(());
            }
            Barrier::Blocking(tx) => {
                let _ = tx.send(());
            }
        }
    }
}

/// Item on the dispatcher queue
enum Envelope {
    Event(PrinterServiceEvent),
    Barrier(Barrier),
}

/// Event bus delivering printer service events to subscribers
pub struct EventBus {
    /// Queue feeding the dispatcher thread, `None` once closed
    queue: Mutex<Option<mpsc::Sender<Envelope>>>,
    /// Registered handlers, in registration order
    subscriptions: Subscriptions,
    /// Broadcast channel sender for async receivers
    sender: broadcast::Sender<PrinterServiceEvent>,
    /// Dispatcher thread
    worker: Mutex<Option<JoinHandle<()>>>,
    /// Dispatcher thread id, used to avoid self-joins and self-waits
    worker_id: Option<ThreadId>,
    closed: Arc<AtomicBool>,
    config: EventBusConfig,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Result<Self, EventBusError> {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Result<Self, EventBusError> {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        let (tx, rx) = mpsc::channel::<Envelope>();
        let subscriptions: Subscriptions = Arc::new(RwLock::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));

        let worker = {
            let subscriptions = subscriptions.clone();
            let closed = closed.clone();
            thread::Builder::new()
                .name(config.thread_name.clone())
                .spawn(move || dispatch_loop(rx, subscriptions, closed))
                .map_err(|e| EventBusError::Spawn(e.to_string()))?
        };
        let worker_id = Some(worker.thread().id());

        Ok(Self {
            queue: Mutex::new(Some(tx)),
            subscriptions,
            sender,
            worker: Mutex::new(Some(worker)),
            worker_id,
            closed,
            config,
        })
    }

    /// Publish an event to all subscribers
    ///
    /// The event is queued and delivered on the dispatcher thread. Returns
    /// the number of subscriptions matching it at publish time.
    pub fn publish(&self, event: PrinterServiceEvent) -> Result<usize, EventBusError> {
        let queue = self.queue.lock();
        let tx = queue.as_ref().ok_or(EventBusError::Closed)?;

        let matching = self
            .subscriptions
            .read()
            .iter()
            .filter(|s| s.filter.matches(&event))
            .count();

        tracing::trace!("Publishing {} to {} subscribers", event.description(), matching);

        // Async receivers are optional; an error only means nobody listens
        let _ = self.sender.send(event.clone());

        tx.send(Envelope::Event(event))
            .map_err(|_| EventBusError::Closed)?;
        Ok(matching)
    }

    /// Subscribe to events with a handler
    ///
    /// The handler runs on the dispatcher thread and should return quickly.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&PrinterServiceEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.subscriptions.write().push(Arc::new(Subscription {
            id,
            filter,
            handler: Arc::new(handler),
            active: AtomicBool::new(true),
            delivery: Mutex::new(()),
        }));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Subscribe to the full printer collection
    ///
    /// The handler receives the collection carried by every `Initialized`
    /// and `Updated` event.
    pub fn subscribe_snapshots<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&[Printer]) + Send + Sync + 'static,
    {
        self.subscribe(EventFilter::Snapshots, move |event| {
            if let Some(printers) = event.snapshot() {
                handler(printers);
            }
        })
    }

    /// Get a receiver for manual event polling in async code
    pub fn receiver(&self) -> broadcast::Receiver<PrinterServiceEvent> {
        self.sender.subscribe()
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed. Once this
    /// returns, no further delivery to the handler starts. A delivery already
    /// running on another thread is waited for.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut subscriptions = self.subscriptions.write();
            let Some(index) = subscriptions.iter().position(|s| s.id == id) else {
                return false;
            };
            subscriptions.remove(index)
        };
        removed.active.store(false, Ordering::Release);

        // A handler unsubscribing from inside a delivery holds this itself
        if !self.on_worker_thread() {
            drop(removed.delivery.lock());
        }
        tracing::debug!("Subscription {} removed", id);
        true
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Whether the bus has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Wait until every event published so far has been delivered
    pub async fn flush(&self) {
        if self.on_worker_thread() {
            return;
        }
        let (tx, rx) = oneshot::channel();
        if self.enqueue_barrier(Barrier::Async(tx)) {
            let _ = rx.await;
        }
    }

    /// Blocking variant of [`EventBus::flush`] for synchronous callers
    pub fn flush_blocking(&self) {
        if self.on_worker_thread() {
            return;
        }
        let (tx, rx) = mpsc::channel();
        if self.enqueue_barrier(Barrier::Blocking(tx)) {
            let _ = rx.recv();
        }
    }

    /// Close the bus
    ///
    /// Drops every subscription, discards undelivered events and stops the
    /// dispatcher thread. Safe to call more than once.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        // Dropping the sender ends the dispatcher loop
        drop(self.queue.lock().take());

        for subscription in self.subscriptions.write().drain(..) {
            subscription.active.store(false, Ordering::Release);
        }

        if let Some(worker) = self.worker.lock().take() {
            if !self.on_worker_thread() && worker.join().is_err() {
                tracing::warn!("Event dispatcher thread panicked");
            }
        }
        tracing::debug!("Event bus closed");
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    fn enqueue_barrier(&self, barrier: Barrier) -> bool {
        match self.queue.lock().as_ref() {
            Some(tx) => tx.send(Envelope::Barrier(barrier)).is_ok(),
            None => false,
        }
    }

    fn on_worker_thread(&self) -> bool {
        self.worker_id == Some(thread::current().id())
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("closed", &self.is_closed())
            .field("config", &self.config)
            .finish()
    }
}

fn dispatch_loop(
    rx: mpsc::Receiver<Envelope>,
    subscriptions: Subscriptions,
    closed: Arc<AtomicBool>,
) {
    while let Ok(envelope) = rx.recv() {
        match envelope {
            Envelope::Event(event) => {
                if closed.load(Ordering::Acquire) {
                    continue;
                }
                // Handlers may (un)subscribe, so no lock is held while they run
                let targets: Vec<Arc<Subscription>> = subscriptions
                    .read()
                    .iter()
                    .filter(|s| s.filter.matches(&event))
                    .cloned()
                    .collect();

                for subscription in targets {
                    let _delivery = subscription.delivery.lock();
                    if !subscription.is_active() || closed.load(Ordering::Acquire) {
                        continue;
                    }
                    let handler = &subscription.handler;
                    if catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
                        tracing::error!(
                            "Handler for {} panicked on {}",
                            subscription.id,
                            event.kind()
                        );
                    }
                }
            }
            Envelope::Barrier(barrier) => barrier.release(),
        }
    }
}
