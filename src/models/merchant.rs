//! Merchant category memory
//!
//! Remembers which category the user last finalized for each merchant so
//! the next receipt from the same place gets the same suggestion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::ExpenseCategory;

/// Learned merchant -> category associations, keyed by normalized merchant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantMemory {
    entries: BTreeMap<String, ExpenseCategory>,
}

impl MerchantMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a merchant name for matching
    pub fn normalize_key(merchant: &str) -> String {
        merchant.trim().to_lowercase()
    }

    /// Look up a merchant by any spelling that normalizes to the same key
    pub fn get(&self, merchant: &str) -> Option<ExpenseCategory> {
        self.entries.get(&Self::normalize_key(merchant)).copied()
    }

    /// Remember `category` for `merchant`
    ///
    /// Returns `true` if the stored association changed. Blank merchants
    /// are never recorded.
    pub fn record(&mut self, merchant: &str, category: ExpenseCategory) -> bool {
        let key = Self::normalize_key(merchant);
        if key.is_empty() {
            return false;
        }
        if self.entries.get(&key) == Some(&category) {
            return false;
        }
        self.entries.insert(key, category);
        true
    }

    /// Forget a merchant, returning its category if one was stored
    pub fn forget(&mut self, merchant: &str) -> Option<ExpenseCategory> {
        self.entries.remove(&Self::normalize_key(merchant))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ExpenseCategory)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ExpenseCategory)> for MerchantMemory {
    fn from_iter<I: IntoIterator<Item = (String, ExpenseCategory)>>(iter: I) -> Self {
        let mut memory = Self::new();
        for (merchant, category) in iter {
            memory.record(&merchant, category);
        }
        memory
    }
}
