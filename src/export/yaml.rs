//! YAML Export functionality
//!
//! The same snapshot as the JSON export, in a format that is easier to
//! read by eye.

use std::io::Write;

use crate::error::{SpendscanError, SpendscanResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export all data to YAML with a short header comment
pub fn export_full_yaml<W: Write>(storage: &Storage, mut writer: W) -> SpendscanResult<()> {
    let export = FullExport::from_storage(storage)?;

    writeln!(writer, "# spendscan export")
        .and_then(|_| writeln!(writer, "# Generated: {}", export.exported_at))
        .and_then(|_| writeln!(writer, "# App Version: {}", export.app_version))
        .and_then(|_| writeln!(writer))
        .map_err(|e| SpendscanError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| SpendscanError::Export(e.to_string()))
}
