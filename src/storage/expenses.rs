//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::SpendscanError;
use crate::models::{Expense, ExpenseId, ReceiptId};

use super::file_io::{lock_error, read_json, write_json_atomic};

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
}

/// Newest purchase first; same-day expenses by most recently recorded
fn newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), SpendscanError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for expense in file_data.expenses {
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), SpendscanError> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, SpendscanError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All expenses, newest first
    pub fn get_all(&self) -> Result<Vec<Expense>, SpendscanError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut expenses: Vec<_> = data.values().cloned().collect();
        newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Resolve a full or short ID typed by the user
    ///
    /// A fragment matching more than one expense is rejected rather than
    /// picking one of them.
    pub fn find(&self, query: &str) -> Result<Expense, SpendscanError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut matches = data.values().filter(|e| e.id.matches(query));

        match (matches.next(), matches.next()) {
            (Some(expense), None) => Ok(expense.clone()),
            (Some(_), Some(_)) => Err(SpendscanError::Validation(format!(
                "'{}' matches more than one expense",
                query
            ))),
            (None, _) => Err(SpendscanError::expense_not_found(query)),
        }
    }

    /// Expenses created from the given receipt
    pub fn get_by_receipt(&self, receipt_id: ReceiptId) -> Result<Vec<Expense>, SpendscanError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut expenses: Vec<_> = data
            .values()
            .filter(|e| e.receipt_id == Some(receipt_id))
            .cloned()
            .collect();
        newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Insert or update an expense
    pub fn upsert(&self, expense: Expense) -> Result<(), SpendscanError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(expense.id, expense);
        Ok(())
    }

    /// Remove an expense, returning it if it existed
    pub fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, SpendscanError> {
        let mut data = self.data.write().map_err(lock_error)?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, SpendscanError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, ExpenseRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        (temp_dir, repo)
    }

    fn expense(title: &str, day: u32) -> Expense {
        Expense::new(
            title,
            Decimal::from(10),
            ExpenseCategory::Food,
            NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_get_all_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(expense("Older", 1)).unwrap();
        repo.upsert(expense("Newer", 20)).unwrap();
        repo.upsert(expense("Middle", 10)).unwrap();

        let titles: Vec<_> = repo.get_all().unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Newer", "Middle", "Older"]);
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, repo) = create_test_repo();
        let e = expense("Cafe", 5);
        let id = e.id;
        repo.upsert(e).unwrap();

        assert_eq!(repo.find(&id.to_string()).unwrap().id, id);
        assert!(repo.find("exp-zzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_get_by_receipt() {
        let (_temp_dir, repo) = create_test_repo();
        let receipt_id = ReceiptId::new();
        repo.upsert(expense("Scanned", 3).with_receipt(receipt_id)).unwrap();
        repo.upsert(expense("Typed", 4)).unwrap();

        let linked = repo.get_by_receipt(receipt_id).unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].title, "Scanned");
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let e = expense("Cafe", 5).with_notes("team lunch");
        let id = e.id;
        repo.upsert(e).unwrap();
        repo.save().unwrap();

        let reloaded = ExpenseRepository::new(temp_dir.path().join("expenses.json"));
        reloaded.load().unwrap();
        let found = reloaded.get(id).unwrap().unwrap();
        assert_eq!(found.title, "Cafe");
        assert_eq!(found.notes.as_deref(), Some("team lunch"));
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let e = expense("Cafe", 5);
        let id = e.id;
        repo.upsert(e).unwrap();

        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.delete(id).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
