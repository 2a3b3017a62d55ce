//! Service configuration

use crate::simulation;
use pulseprint_core::{EventBusConfig, Printer};
use std::time::Duration;

/// Printer service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Run the status simulator after initialization
    pub simulate: bool,
    /// Simulator tick interval in milliseconds
    pub update_interval_ms: u64,
    /// Printers loaded by `initialize`
    pub seed: Vec<Printer>,
    /// Event bus settings
    pub event_bus: EventBusConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            simulate: true,
            update_interval_ms: 2000,
            seed: simulation::demo_fleet(),
            event_bus: EventBusConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// No printers and no simulator
    pub fn empty() -> Self {
        Self {
            simulate: false,
            seed: Vec::new(),
            ..Self::default()
        }
    }

    /// Static printers with the simulator disabled
    pub fn with_printers(seed: Vec<Printer>) -> Self {
        Self {
            seed,
            ..Self::empty()
        }
    }

    /// Simulator tick interval
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms.max(1))
    }
}
