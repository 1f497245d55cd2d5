//! JSON Export functionality
//!
//! Exports every stored record in one versioned document.

use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SpendscanError, SpendscanResult};
use crate::models::{Expense, MerchantMemory, Receipt};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full data export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Application version that created the export
    pub app_version: String,
    pub expenses: Vec<Expense>,
    pub receipts: Vec<Receipt>,
    /// Learned merchant categories
    pub merchants: MerchantMemory,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub expense_count: usize,
    pub receipt_count: usize,
    pub merchant_count: usize,
    pub earliest_expense: Option<NaiveDate>,
    pub latest_expense: Option<NaiveDate>,
}

impl FullExport {
    /// Snapshot everything in storage
    pub fn from_storage(storage: &Storage) -> SpendscanResult<Self> {
        let expenses = storage.expenses.get_all()?;
        let receipts = storage.receipts.get_all()?;
        let merchants = storage.merchants.snapshot()?;

        let metadata = ExportMetadata {
            expense_count: expenses.len(),
            receipt_count: receipts.len(),
            merchant_count: merchants.len(),
            earliest_expense: expenses.iter().map(|e| e.date).min(),
            latest_expense: expenses.iter().map(|e| e.date).max(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            expenses,
            receipts,
            merchants,
            metadata,
        })
    }
}

/// Export all data as pretty-printed JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: W) -> SpendscanResult<()> {
    let export = FullExport::from_storage(storage)?;
    serde_json::to_writer_pretty(writer, &export)
        .map_err(|e| SpendscanError::Export(e.to_string()))
}
