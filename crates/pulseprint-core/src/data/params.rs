//! Parameters for adding a printer

use crate::data::printer::{Printer, PrinterId};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Everything needed to reach a printer on the LAN
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPrinterParams {
    /// Display name
    pub name: String,
    /// Printer model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// LAN address (Settings → WLAN → Current Status)
    pub ip: String,
    /// LAN access code (Settings → WLAN → Access Code)
    pub access_code: String,
    /// Serial number (Settings → Device → Serial Number)
    pub serial: String,
}

impl AddPrinterParams {
    /// Create parameters without a model
    pub fn new(
        name: impl Into<String>,
        ip: impl Into<String>,
        access_code: impl Into<String>,
        serial: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            model: None,
            ip: ip.into(),
            access_code: access_code.into(),
            serial: serial.into(),
        }
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Check that every required field is present and the address parses
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::missing("name"));
        }
        if self.ip.trim().is_empty() {
            return Err(ValidationError::missing("ip"));
        }
        if self.ip.trim().parse::<IpAddr>().is_err() {
            return Err(ValidationError::InvalidIp {
                ip: self.ip.clone(),
            });
        }
        if self.access_code.trim().is_empty() {
            return Err(ValidationError::missing("accessCode"));
        }
        if self.serial.trim().is_empty() {
            return Err(ValidationError::missing("serial"));
        }
        if self.serial.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidValue {
                field: "serial".to_string(),
                reason: "must not contain whitespace".to_string(),
            });
        }
        Ok(())
    }

    /// Build the offline printer record these parameters describe
    pub fn into_printer(self, id: PrinterId) -> Printer {
        let mut printer = Printer::new(id, self.name.trim()).with_connection(
            self.ip.trim(),
            self.access_code.trim(),
            self.serial.trim(),
        );
        printer.model = self
            .model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        printer
    }
}

impl From<&Printer> for AddPrinterParams {
    fn from(printer: &Printer) -> Self {
        Self {
            name: printer.name.clone(),
            model: printer.model.clone(),
            ip: printer.ip.clone().unwrap_or_default(),
            access_code: printer.access_code.clone().unwrap_or_default(),
            serial: printer.serial.clone().unwrap_or_default(),
        }
    }
}
