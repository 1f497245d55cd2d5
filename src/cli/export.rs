//! Export command

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::{SpendscanError, SpendscanResult};
use crate::export::{export_expenses_csv, export_full_json, export_full_yaml};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV (expenses only)
    Csv,
    /// JSON (everything)
    Json,
    /// YAML (everything, human-readable)
    Yaml,
}

fn write_export<W: Write>(storage: &Storage, format: ExportFormat, writer: W) -> SpendscanResult<()> {
    match format {
        ExportFormat::Csv => export_expenses_csv(storage, writer),
        ExportFormat::Json => export_full_json(storage, writer),
        ExportFormat::Yaml => export_full_yaml(storage, writer),
    }
}

/// Handle `spendscan export`; writes to standard output without `--output`
pub fn handle_export_command(
    storage: &Storage,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> SpendscanResult<()> {
    match output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                SpendscanError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            write_export(storage, format, &mut writer)?;
            writer.flush()?;
            eprintln!("Exported to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_export(storage, format, &mut writer)?;
            if matches!(format, ExportFormat::Json) {
                writeln!(writer)?;
            }
        }
    }

    Ok(())
}
