//! Printer list export

use crate::error::TransferResult;
use crate::format::FileFormat;
use crate::record::PrinterConfigRecord;
use pulseprint_core::Printer;
use serde::Serialize;
use std::path::Path;

/// Export behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    /// Write LAN access codes; they are blanked otherwise
    pub include_access_codes: bool,
}

#[derive(Serialize)]
struct PrinterList<'a> {
    printers: &'a [PrinterConfigRecord],
}

/// Writes printer lists
pub struct Exporter;

impl Exporter {
    /// Render printers in the given format
    pub fn export(
        printers: &[Printer],
        format: FileFormat,
        options: ExportOptions,
    ) -> TransferResult<String> {
        let records: Vec<PrinterConfigRecord> = printers
            .iter()
            .map(|p| PrinterConfigRecord::from_printer(p, options.include_access_codes))
            .collect();

        let content = match format {
            FileFormat::Json => {
                let mut json = serde_json::to_string_pretty(&PrinterList {
                    printers: &records,
                })?;
                json.push('\n');
                json
            }
            FileFormat::Yaml => serde_yaml::to_string(&PrinterList {
                printers: &records,
            })?,
            FileFormat::Csv => render_csv(&records)?,
            FileFormat::Txt => render_txt(&records),
        };

        tracing::info!("Exported {} printers as {}", records.len(), format);
        Ok(content)
    }

    /// Write printers to a file; the format follows the extension
    ///
    /// Returns the number of printers written.
    pub async fn export_file(
        printers: &[Printer],
        path: &Path,
        options: ExportOptions,
    ) -> TransferResult<usize> {
        let format = FileFormat::from_path(path)?;
        let content = Self::export(printers, format, options)?;
        tokio::fs::write(path, content).await?;
        Ok(printers.len())
    }
}

fn render_csv(records: &[PrinterConfigRecord]) -> TransferResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["name", "model", "ip", "accessCode", "serial"])?;
    for record in records {
        writer.write_record([
            record.name.as_str(),
            record.model.as_deref().unwrap_or(""),
            record.ip.as_str(),
            record.access_code.as_str(),
            record.serial.as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn render_txt(records: &[PrinterConfigRecord]) -> String {
    let mut out = String::from("# PulsePrint printer list\n");
    for record in records {
        out.push('\n');
        out.push_str(&format!("name: {}\n", record.name));
        if let Some(model) = &record.model {
            out.push_str(&format!("model: {}\n", model));
        }
        out.push_str(&format!("ip: {}\n", record.ip));
        out.push_str(&format!("accessCode: {}\n", record.access_code));
        out.push_str(&format!("serial: {}\n", record.serial));
    }
    out
}
