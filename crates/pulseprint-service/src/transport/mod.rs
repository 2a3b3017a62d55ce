//! Printer transports
//!
//! A transport carries connection requests and print commands to printers.
//! Bambu printers speak MQTT over TLS on port 8883, authenticated with the
//! LAN access code; [`SimulatedTransport`] answers locally instead.

mod simulated;

pub use simulated::SimulatedTransport;

use crate::command::PrintCommand;
use crate::error::TransportError;
use async_trait::async_trait;
use pulseprint_core::{Printer, PrinterId, ValidationError};

/// Default MQTT TLS port
pub const MQTT_TLS_PORT: u16 = 8883;

/// Username used by printers in LAN mode
pub const LAN_USERNAME: &str = "bblp";

/// Connection parameters for a printer's MQTT broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttConnectionParams {
    /// Printer address
    pub host: String,
    /// Broker port
    pub port: u16,
    /// Use TLS
    pub use_tls: bool,
    /// LAN access code, used as the MQTT password
    pub access_code: String,
    /// Device serial, used in topic names
    pub serial: String,
}

impl MqttConnectionParams {
    /// Build parameters from a printer's connection details
    pub fn from_printer(printer: &Printer) -> Result<Self, ValidationError> {
        let field = |value: &Option<String>, name: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ValidationError::missing(name))
        };

        Ok(Self {
            host: field(&printer.ip, "ip")?,
            port: MQTT_TLS_PORT,
            use_tls: true,
            access_code: field(&printer.access_code, "accessCode")?,
            serial: field(&printer.serial, "serial")?,
        })
    }

    /// Topic the printer publishes reports on
    pub fn report_topic(&self) -> String {
        format!("device/{}/report", self.serial)
    }

    /// Topic commands are published to
    pub fn request_topic(&self) -> String {
        format!("device/{}/request", self.serial)
    }
}

/// Carries commands to printers
#[async_trait]
pub trait PrinterTransport: Send + Sync {
    /// Open a connection to a printer
    async fn connect(
        &self,
        printer: &PrinterId,
        params: &MqttConnectionParams,
    ) -> Result<(), TransportError>;

    /// Close a printer connection
    async fn disconnect(&self, printer: &PrinterId) -> Result<(), TransportError>;

    /// Send a print command and wait for it to be accepted
    async fn send(&self, printer: &PrinterId, command: &PrintCommand)
        -> Result<(), TransportError>;

    /// Transport name for logging
    fn name(&self) -> &str;
}
