//! Report command

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::Settings;
use crate::error::{SpendscanError, SpendscanResult};
use crate::reports::SpendingReport;
use crate::storage::Storage;

use super::parse_month;

/// Handle `spendscan report`
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    month: Option<String>,
    output: Option<PathBuf>,
) -> SpendscanResult<()> {
    let month = month.as_deref().map(parse_month).transpose()?;
    let report = SpendingReport::generate(storage, month)?;

    match output {
        Some(path) => {
            let file = File::create(&path).map_err(|e| {
                SpendscanError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            report.export_csv(BufWriter::new(file))?;
            println!("Report exported to: {}", path.display());
        }
        None => print!("{}", report.format_terminal(&settings.currency_symbol)),
    }

    Ok(())
}
