//! Receipt record repository
//!
//! Manages loading and saving scanned receipt records to receipts.json.
//! Image files themselves live in the receipts directory and are handled
//! by [`super::images::ReceiptImageStore`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendscanError;
use crate::models::{Receipt, ReceiptId};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ReceiptData {
    receipts: Vec<Receipt>,
}

/// Repository for receipt record persistence
pub struct ReceiptRepository {
    path: PathBuf,
    data: RwLock<HashMap<ReceiptId, Receipt>>,
}

impl ReceiptRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load receipt records from disk
    pub fn load(&self) -> Result<(), SpendscanError> {
        let file_data: ReceiptData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for receipt in file_data.receipts {
            data.insert(receipt.id, receipt);
        }

        Ok(())
    }

    /// Save receipt records to disk
    pub fn save(&self) -> Result<(), SpendscanError> {
        let receipts = self.get_all()?;
        write_json_atomic(&self.path, &ReceiptData { receipts })
    }

    pub fn get(&self, id: ReceiptId) -> Result<Option<Receipt>, SpendscanError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All receipt records, most recently scanned first
    pub fn get_all(&self) -> Result<Vec<Receipt>, SpendscanError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut receipts: Vec<_> = data.values().cloned().collect();
        receipts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(receipts)
    }

    pub fn upsert(&self, receipt: Receipt) -> Result<(), SpendscanError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(receipt.id, receipt);
        Ok(())
    }

    pub fn delete(&self, id: ReceiptId) -> Result<Option<Receipt>, SpendscanError> {
        let mut data = self.data.write().map_err(lock_error)?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, SpendscanError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
