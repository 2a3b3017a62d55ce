//! Printer list import
//!
//! Parses a printer list, validates every record and drops duplicates.
//! Record problems are collected in [`ImportResult::errors`]; only a
//! document that cannot be read as a printer list at all is an error.

use crate::error::{TransferError, TransferResult};
use crate::format::FileFormat;
use crate::record::{normalize_key, PrinterConfigRecord};
use pulseprint_core::AddPrinterParams;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

/// Import behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Check the file without importing anything
    pub validate_only: bool,
    /// Silently skip printers whose serial is already known; when false
    /// duplicates are reported as errors
    pub skip_duplicates: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            validate_only: false,
            skip_duplicates: true,
        }
    }
}

/// Outcome of an import
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportResult {
    /// No record failed
    pub success: bool,
    /// Records accepted (or that would be, when validating only)
    pub imported: usize,
    /// Duplicate records skipped
    pub skipped: usize,
    /// One message per rejected record
    pub errors: Vec<String>,
    /// The import was a dry run
    pub validate_only: bool,
    /// Accepted printers, in file order
    pub printers: Vec<AddPrinterParams>,
}

impl ImportResult {
    /// Whether the caller should refresh its printer list
    pub fn changed_printers(&self) -> bool {
        self.success && self.imported > 0 && !self.validate_only
    }

    /// Record a failure for a printer that was accepted here but could not
    /// be added afterwards
    pub fn reject(&mut self, serial: &str, reason: impl std::fmt::Display) {
        if let Some(index) = self.printers.iter().position(|p| p.serial == serial) {
            let params = self.printers.remove(index);
            self.imported = self.imported.saturating_sub(1);
            self.errors.push(format!("{}: {}", params.name, reason));
            self.success = false;
        }
    }
}

/// Parsed record, or the reason it could not be read
type RawRecord = Result<PrinterConfigRecord, String>;

/// Imports printer lists
#[derive(Debug, Clone, Default)]
pub struct Importer {
    existing_serials: HashSet<String>,
}

impl Importer {
    /// Create an importer with no known printers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an importer that treats these serials as already present
    pub fn with_existing_serials<I, S>(serials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            existing_serials: serials.into_iter().map(Into::into).collect(),
        }
    }

    /// Import from a string
    pub fn import_str(
        &self,
        content: &str,
        format: FileFormat,
        options: ImportOptions,
    ) -> TransferResult<ImportResult> {
        let records = match format {
            FileFormat::Json => parse_json(content)?,
            FileFormat::Csv => parse_csv(content)?,
            FileFormat::Yaml => parse_yaml(content)?,
            FileFormat::Txt => parse_txt(content),
        };

        let result = self.process(records, options);
        tracing::info!(
            "{} import: {} accepted, {} skipped, {} errors{}",
            format,
            result.imported,
            result.skipped,
            result.errors.len(),
            if options.validate_only { " (validate only)" } else { "" }
        );
        Ok(result)
    }

    /// Import from a file; the format follows the extension
    pub async fn import_file(
        &self,
        path: &Path,
        options: ImportOptions,
    ) -> TransferResult<ImportResult> {
        let format = FileFormat::from_path(path)?;
        let content = tokio::fs::read_to_string(path).await?;
        self.import_str(&content, format, options)
    }

    fn process(&self, records: Vec<RawRecord>, options: ImportOptions) -> ImportResult {
        let mut result = ImportResult {
            validate_only: options.validate_only,
            ..ImportResult::default()
        };
        let mut seen: HashSet<String> = HashSet::new();

        for (index, record) in records.into_iter().enumerate() {
            let label = format!("Record {}", index + 1);
            let params = match record.and_then(|r| r.to_params().map_err(|e| e.to_string())) {
                Ok(params) => params,
                Err(reason) => {
                    result.errors.push(format!("{}: {}", label, reason));
                    continue;
                }
            };

            let duplicate =
                self.existing_serials.contains(&params.serial) || seen.contains(&params.serial);
            if duplicate {
                if options.skip_duplicates {
                    result.skipped += 1;
                } else {
                    result.errors.push(format!(
                        "{}: duplicate serial '{}'",
                        label, params.serial
                    ));
                }
                continue;
            }

            seen.insert(params.serial.clone());
            result.printers.push(params);
        }

        result.imported = result.printers.len();
        result.success = result.errors.is_empty();
        result
    }
}

fn parse_json(content: &str) -> TransferResult<Vec<RawRecord>> {
    let root: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| TransferError::parse(FileFormat::Json, e.to_string()))?;
    let items = match root {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("printers") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(TransferError::parse(
                    FileFormat::Json,
                    "expected an array or an object with a 'printers' array",
                ))
            }
        },
        _ => {
            return Err(TransferError::parse(
                FileFormat::Json,
                "expected an array of printers",
            ))
        }
    };

    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| e.to_string()))
        .collect())
}

fn parse_yaml(content: &str) -> TransferResult<Vec<RawRecord>> {
    let root: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| TransferError::parse(FileFormat::Yaml, e.to_string()))?;
    let items = match root {
        serde_yaml::Value::Sequence(items) => items,
        serde_yaml::Value::Mapping(mut map) => match map.remove("printers") {
            Some(serde_yaml::Value::Sequence(items)) => items,
            _ => {
                return Err(TransferError::parse(
                    FileFormat::Yaml,
                    "expected a list or a mapping with a 'printers' list",
                ))
            }
        },
        serde_yaml::Value::Null => Vec::new(),
        _ => {
            return Err(TransferError::parse(
                FileFormat::Yaml,
                "expected a list of printers",
            ))
        }
    };

    Ok(items
        .into_iter()
        .map(|item| serde_yaml::from_value(item).map_err(|e| e.to_string()))
        .collect())
}

fn parse_csv(content: &str) -> TransferResult<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TransferError::parse(FileFormat::Csv, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let known: Vec<String> = headers.iter().map(|h| normalize_key(h)).collect();
    for required in ["name", "ip", "accesscode", "serial"] {
        if !known.iter().any(|h| h == required) {
            return Err(TransferError::parse(
                FileFormat::Csv,
                format!("missing column '{}'", required),
            ));
        }
    }

    Ok(reader
        .records()
        .map(|row| {
            let row = row.map_err(|e| e.to_string())?;
            let mut record = PrinterConfigRecord::default();
            for (header, value) in headers.iter().zip(row.iter()) {
                record.set_field(header, value);
            }
            Ok(record)
        })
        .collect())
}

fn txt_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z][A-Za-z _-]*?)\s*[:=]\s*(.*?)\s*$")
            .expect("invalid regex pattern")
    })
}

fn parse_txt(content: &str) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut current: Option<RawRecord> = None;

    for (number, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() {
            records.extend(current.take());
            continue;
        }

        let entry = current.get_or_insert_with(|| Ok(PrinterConfigRecord::default()));
        let Ok(record) = entry else {
            continue;
        };
        match txt_line().captures(trimmed) {
            Some(caps) => {
                if !record.set_field(&caps[1], &caps[2]) {
                    tracing::debug!("Ignoring unknown key '{}' on line {}", &caps[1], number + 1);
                }
            }
            None => {
                *entry = Err(format!("line {}: expected 'key: value'", number + 1));
            }
        }
    }
    records.extend(current);
    records
}
