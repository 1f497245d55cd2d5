//! Storage layer for spendscan
//!
//! JSON files under `data/` with atomic writes, plus copied receipt images
//! under `receipts/`.

pub mod expenses;
pub mod file_io;
pub mod images;
pub mod merchants;
pub mod receipts;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use images::ReceiptImageStore;
pub use merchants::MerchantRepository;
pub use receipts::ReceiptRepository;

use crate::config::paths::SpendscanPaths;
use crate::error::SpendscanError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: SpendscanPaths,
    pub expenses: ExpenseRepository,
    pub receipts: ReceiptRepository,
    pub merchants: MerchantRepository,
    pub images: ReceiptImageStore,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: SpendscanPaths) -> Result<Self, SpendscanError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            receipts: ReceiptRepository::new(paths.receipts_file()),
            merchants: MerchantRepository::new(paths.merchants_file()),
            images: ReceiptImageStore::new(paths.base_dir().clone()),
            paths,
        })
    }

    /// Create and load in one step
    pub fn open(paths: SpendscanPaths) -> Result<Self, SpendscanError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &SpendscanPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), SpendscanError> {
        self.expenses.load()?;
        self.receipts.load()?;
        self.merchants.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), SpendscanError> {
        self.receipts.save()?;
        self.expenses.save()?;
        self.merchants.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendscanPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("receipts").exists());
        assert_eq!(storage.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_save_all_writes_every_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendscanPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        storage.save_all().unwrap();

        let data = temp_dir.path().join("data");
        assert!(data.join("expenses.json").exists());
        assert!(data.join("receipts.json").exists());
        assert!(data.join("merchants.json").exists());
    }
}
