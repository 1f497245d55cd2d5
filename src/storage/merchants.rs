//! Merchant memory repository
//!
//! Persists learned merchant -> category associations to merchants.json
//! as a flat JSON object.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendscanError;
use crate::models::{ExpenseCategory, MerchantMemory};

use super::file_io::{lock_error, read_json, write_json_atomic};

pub struct MerchantRepository {
    path: PathBuf,
    memory: RwLock<MerchantMemory>,
}

impl MerchantRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            memory: RwLock::new(MerchantMemory::new()),
        }
    }

    pub fn load(&self) -> Result<(), SpendscanError> {
        let loaded: MerchantMemory = read_json(&self.path)?;
        *self.memory.write().map_err(lock_error)? = loaded;
        Ok(())
    }

    pub fn save(&self) -> Result<(), SpendscanError> {
        let memory = self.memory.read().map_err(lock_error)?;
        write_json_atomic(&self.path, &*memory)
    }

    /// Category remembered for a merchant, matched case-insensitively
    pub fn get(&self, merchant: &str) -> Result<Option<ExpenseCategory>, SpendscanError> {
        let memory = self.memory.read().map_err(lock_error)?;
        Ok(memory.get(merchant))
    }

    /// Remember a category; returns `true` if anything changed
    pub fn record(&self, merchant: &str, category: ExpenseCategory) -> Result<bool, SpendscanError> {
        let mut memory = self.memory.write().map_err(lock_error)?;
        Ok(memory.record(merchant, category))
    }

    pub fn forget(&self, merchant: &str) -> Result<Option<ExpenseCategory>, SpendscanError> {
        let mut memory = self.memory.write().map_err(lock_error)?;
        Ok(memory.forget(merchant))
    }

    /// Copy of the whole memory, ordered by merchant key
    pub fn snapshot(&self) -> Result<MerchantMemory, SpendscanError> {
        let memory = self.memory.read().map_err(lock_error)?;
        Ok(memory.clone())
    }
}
