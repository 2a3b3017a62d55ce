//! # Event Bus Module
//!
//! Delivers printer service events to subscribers.
//!
//! ## Overview
//!
//! - The printer service publishes typed events without knowing subscribers
//! - Subscribers filter by event kind, or ask only for full snapshots
//! - Delivery happens on one dispatcher thread, in publication order, so a
//!   handler never runs concurrently with itself
//! - Async code can poll a broadcast receiver instead of registering a handler
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pulseprint_core::event_bus::{EventBus, EventFilter, EventKind, PrinterServiceEvent};
//!
//! let bus = EventBus::new()?;
//! let subscription = bus.subscribe(
//!     EventFilter::Kinds(vec![EventKind::PrinterPaused]),
//!     |event| println!("{}", event.description()),
//! );
//!
//! bus.publish(PrinterServiceEvent::Updated(printers))?;
//!
//! // Unsubscribe when the view goes away
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
