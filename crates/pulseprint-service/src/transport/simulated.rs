//! Simulated transport
//!
//! Accepts every connection and command unless told to fail. Sent command
//! bodies are recorded so tests can inspect them.

use super::{MqttConnectionParams, PrinterTransport};
use crate::command::PrintCommand;
use crate::error::TransportError;
use async_trait::async_trait;
use parking_lot::RwLock;
use pulseprint_core::PrinterId;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Transport that answers locally
#[derive(Debug, Default)]
pub struct SimulatedTransport {
    connections: RwLock<HashMap<PrinterId, MqttConnectionParams>>,
    unreachable: RwLock<HashSet<PrinterId>>,
    rejected: RwLock<HashSet<&'static str>>,
    sent: RwLock<Vec<(PrinterId, serde_json::Value)>>,
    sequence: AtomicU64,
    latency: Option<Duration>,
}

impl SimulatedTransport {
    /// Create a transport that accepts everything immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every operation by `latency`
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Make operations on this printer fail
    pub fn set_unreachable(&self, printer: &PrinterId, unreachable: bool) {
        let mut set = self.unreachable.write();
        if unreachable {
            set.insert(printer.clone());
        } else {
            set.remove(printer);
        }
    }

    /// Make the printer firmware reject a command by name
    pub fn reject_command(&self, name: &'static str) {
        self.rejected.write().insert(name);
    }

    /// Stop rejecting a command
    pub fn accept_command(&self, name: &'static str) {
        self.rejected.write().remove(name);
    }

    /// Whether a connection to this printer is open
    pub fn is_connected(&self, printer: &PrinterId) -> bool {
        self.connections.read().contains_key(printer)
    }

    /// Command bodies sent so far
    pub fn sent(&self) -> Vec<(PrinterId, serde_json::Value)> {
        self.sent.read().clone()
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_reachable(&self, printer: &PrinterId, host: &str) -> Result<(), TransportError> {
        if self.unreachable.read().contains(printer) {
            return Err(TransportError::ConnectionFailed {
                host: host.to_string(),
                reason: "host unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PrinterTransport for SimulatedTransport {
    async fn connect(
        &self,
        printer: &PrinterId,
        params: &MqttConnectionParams,
    ) -> Result<(), TransportError> {
        self.delay().await;
        self.check_reachable(printer, &params.host)?;
        self.connections
            .write()
            .insert(printer.clone(), params.clone());
        tracing::debug!(
            "Simulated connection to {}:{} ({})",
            params.host,
            params.port,
            params.request_topic()
        );
        Ok(())
    }

    async fn disconnect(&self, printer: &PrinterId) -> Result<(), TransportError> {
        self.delay().await;
        self.connections.write().remove(printer);
        Ok(())
    }

    async fn send(
        &self,
        printer: &PrinterId,
        command: &PrintCommand,
    ) -> Result<(), TransportError> {
        self.delay().await;
        self.check_reachable(printer, printer.as_str())?;
        if self.rejected.read().contains(command.name()) {
            return Err(TransportError::Rejected {
                command: command.name().to_string(),
                reason: "rejected by printer".to_string(),
            });
        }

        let sequence_id = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.sent
            .write()
            .push((printer.clone(), command.to_mqtt_payload(sequence_id)));
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
