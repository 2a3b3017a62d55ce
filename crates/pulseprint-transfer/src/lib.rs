//! PulsePrint Transfer Crate
//!
//! Import and export of printer connection lists in JSON, CSV, YAML and
//! plain text.

pub mod error;
pub mod export;
pub mod format;
pub mod import;
pub mod record;

pub use error::{TransferError, TransferResult};
pub use export::{ExportOptions, Exporter};
pub use format::FileFormat;
pub use import::{ImportOptions, ImportResult, Importer};
pub use record::PrinterConfigRecord;
