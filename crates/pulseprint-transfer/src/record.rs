//! Printer configuration record
//!
//! One entry of an import or export file: the connection details of a
//! printer, without any live status.

use pulseprint_core::{AddPrinterParams, Printer, ValidationError};
use serde::{Deserialize, Serialize};

/// Connection details of one printer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrinterConfigRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub ip: String,
    #[serde(alias = "access_code")]
    pub access_code: String,
    pub serial: String,
}

impl PrinterConfigRecord {
    /// Record for an existing printer; the access code is blanked unless
    /// `include_access_code` is set
    pub fn from_printer(printer: &Printer, include_access_code: bool) -> Self {
        let params = AddPrinterParams::from(printer);
        Self {
            name: params.name,
            model: params.model,
            ip: params.ip,
            access_code: if include_access_code {
                params.access_code
            } else {
                String::new()
            },
            serial: params.serial,
        }
    }

    /// Set a field by its file key; returns false for unknown keys
    ///
    /// Keys are matched case-insensitively, ignoring `_`, `-` and spaces,
    /// so `accessCode`, `access_code` and `Access Code` are equivalent.
    pub fn set_field(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim().to_string();
        match normalize_key(key).as_str() {
            "name" => self.name = value,
            "model" => self.model = Some(value).filter(|v| !v.is_empty()),
            "ip" | "ipaddress" | "host" => self.ip = value,
            "accesscode" | "code" => self.access_code = value,
            "serial" | "serialnumber" => self.serial = value,
            _ => return false,
        }
        true
    }

    /// Validate and convert into add-printer parameters
    pub fn to_params(&self) -> Result<AddPrinterParams, ValidationError> {
        let params = AddPrinterParams {
            name: self.name.trim().to_string(),
            model: self
                .model
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            ip: self.ip.trim().to_string(),
            access_code: self.access_code.trim().to_string(),
            serial: self.serial.trim().to_string(),
        };
        params.validate()?;
        Ok(params)
    }
}

impl From<&AddPrinterParams> for PrinterConfigRecord {
    fn from(params: &AddPrinterParams) -> Self {
        Self {
            name: params.name.clone(),
            model: params.model.clone(),
            ip: params.ip.clone(),
            access_code: params.access_code.clone(),
            serial: params.serial.clone(),
        }
    }
}

pub(crate) fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
