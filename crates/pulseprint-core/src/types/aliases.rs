//! Type aliases for commonly used complex types.
//!
//! Complex types like `Arc<dyn Fn(&PrinterServiceEvent) + Send + Sync>` are
//! hard to read at a glance. The aliases here give them names that say what
//! they are for and keep the same pattern across crates.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::data::Printer;
use crate::event_bus::PrinterServiceEvent;

/// Callback invoked with every event a subscription matches.
///
/// Handlers run on the event bus dispatcher thread, never concurrently with
/// themselves.
pub type EventHandler = Arc<dyn Fn(&PrinterServiceEvent) + Send + Sync>;

/// Callback invoked with the full printer collection.
pub type SnapshotHandler = Arc<dyn Fn(&[Printer]) + Send + Sync>;

/// A printer collection shared between threads, read far more often than
/// written.
pub type SharedPrinters = Arc<RwLock<Vec<Printer>>>;

/// Create an empty `SharedPrinters`.
pub fn shared_printers() -> SharedPrinters {
    Arc::new(RwLock::new(Vec::new()))
}
