//! Supported file formats

use crate::error::{TransferError, TransferResult};
use std::fmt;
use std::path::Path;

/// Printer list file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Json,
    Csv,
    Yaml,
    Txt,
}

impl FileFormat {
    /// Every format, in the order offered by file dialogs
    pub const ALL: [FileFormat; 4] = [
        FileFormat::Json,
        FileFormat::Csv,
        FileFormat::Yaml,
        FileFormat::Txt,
    ];

    /// Detect the format from a file extension
    pub fn from_extension(ext: &str) -> TransferResult<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "json" => Ok(FileFormat::Json),
            "csv" => Ok(FileFormat::Csv),
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            "txt" => Ok(FileFormat::Txt),
            other => Err(TransferError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Detect the format from a path
    pub fn from_path(path: &Path) -> TransferResult<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| TransferError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    /// Preferred file extension
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Csv => "csv",
            FileFormat::Yaml => "yaml",
            FileFormat::Txt => "txt",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileFormat::Json => "JSON",
            FileFormat::Csv => "CSV",
            FileFormat::Yaml => "YAML",
            FileFormat::Txt => "TXT",
        };
        write!(f, "{}", label)
    }
}
