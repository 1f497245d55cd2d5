//! Ledger service
//!
//! Business logic over the expense, receipt and merchant repositories.
//! This is the production [`ExpenseLedger`]: finalized scans become a
//! stored image, a receipt record and an expense, and the chosen category
//! is remembered for the merchant.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::{SpendscanError, SpendscanResult};
use crate::models::{fit_title, Expense, ExpenseCategory, MerchantMemory, Receipt, ReceiptId};
use crate::parsing::CategoryLookup;
use crate::scan::{ExpenseLedger, ReceiptSubmission};
use crate::storage::Storage;

/// Service for expense management
pub struct LedgerService<'a> {
    storage: &'a Storage,
}

/// Options for filtering expense listings
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Year and month (1-12)
    pub month: Option<(i32, u32)>,
    pub category: Option<ExpenseCategory>,
    /// Maximum number of expenses to return
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn month(mut self, year: i32, month: u32) -> Self {
        self.month = Some((year, month));
        self
    }

    pub fn category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn accepts(&self, expense: &Expense) -> bool {
        if let Some((year, month)) = self.month {
            if !expense.is_in_month(year, month) {
                return false;
            }
        }
        self.category.map_or(true, |c| expense.category == c)
    }
}

/// Input for recording an expense by hand
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub title: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub tax: Option<Decimal>,
}

impl<'a> LedgerService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record an expense entered by hand
    pub fn add_expense(&self, input: NewExpense) -> SpendscanResult<Expense> {
        let mut expense = Expense::new(input.title.trim(), input.amount, input.category, input.date)
            .with_tax(input.tax);
        if let Some(notes) = input.notes {
            expense = expense.with_notes(notes.trim());
        }

        expense
            .validate()
            .map_err(|e| SpendscanError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;
        self.record_category(&expense.title, expense.category)?;

        info!(expense = %expense.id, title = %expense.title, "expense added");
        Ok(expense)
    }

    /// Find an expense by full or short ID
    pub fn find(&self, query: &str) -> SpendscanResult<Expense> {
        self.storage.expenses.find(query)
    }

    /// The receipt an expense was scanned from, if any
    pub fn receipt_for(&self, expense: &Expense) -> SpendscanResult<Option<Receipt>> {
        match expense.receipt_id {
            Some(id) => self.storage.receipts.get(id),
            None => Ok(None),
        }
    }

    /// Expenses matching the filter, newest first
    pub fn list(&self, filter: &ExpenseFilter) -> SpendscanResult<Vec<Expense>> {
        let expenses = self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .filter(|e| filter.accepts(e));

        Ok(match filter.limit {
            Some(limit) => expenses.take(limit).collect(),
            None => expenses.collect(),
        })
    }

    /// Delete an expense
    ///
    /// A receipt no other expense refers to is deleted with it, image
    /// included.
    pub fn delete(&self, query: &str) -> SpendscanResult<Expense> {
        let expense = self.storage.expenses.find(query)?;
        self.storage.expenses.delete(expense.id)?;
        self.storage.expenses.save()?;

        if let Some(receipt_id) = expense.receipt_id {
            self.remove_orphaned_receipt(receipt_id)?;
        }

        info!(expense = %expense.id, "expense deleted");
        Ok(expense)
    }

    fn remove_orphaned_receipt(&self, receipt_id: ReceiptId) -> SpendscanResult<()> {
        if !self.storage.expenses.get_by_receipt(receipt_id)?.is_empty() {
            return Ok(());
        }

        if let Some(receipt) = self.storage.receipts.delete(receipt_id)? {
            self.storage.receipts.save()?;
            self.storage.images.remove(&receipt.image_path)?;
        }
        Ok(())
    }

    fn persist_scanned(&self, receipt: Receipt, expense: &Expense) -> SpendscanResult<()> {
        self.storage.receipts.upsert(receipt)?;
        self.storage.receipts.save()?;
        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()
    }

    /// Undo a partially written scan so no receipt is left without its expense
    fn discard_scanned(&self, receipt_id: ReceiptId, expense: &Expense, image_path: &str) {
        let cleanup = [
            self.storage.expenses.delete(expense.id).map(drop),
            self.storage.receipts.delete(receipt_id).map(drop),
            self.storage.receipts.save(),
            self.storage.images.remove(image_path),
        ];
        for err in cleanup.into_iter().filter_map(Result::err) {
            warn!(receipt = %receipt_id, error = %err, "cleanup after failed save incomplete");
        }
    }

    /// Learned merchant categories
    pub fn merchants(&self) -> SpendscanResult<MerchantMemory> {
        self.storage.merchants.snapshot()
    }

    /// Forget a learned merchant category
    pub fn forget_merchant(&self, merchant: &str) -> SpendscanResult<ExpenseCategory> {
        let removed = self
            .storage
            .merchants
            .forget(merchant)?
            .ok_or_else(|| SpendscanError::merchant_not_found(merchant.trim()))?;
        self.storage.merchants.save()?;
        Ok(removed)
    }
}

impl CategoryLookup for LedgerService<'_> {
    fn lookup_category(&self, normalized_merchant: &str) -> Option<ExpenseCategory> {
        match self.storage.merchants.get(normalized_merchant) {
            Ok(category) => category,
            Err(err) => {
                warn!(error = %err, "merchant memory unavailable");
                None
            }
        }
    }
}

impl ExpenseLedger for LedgerService<'_> {
    fn record_category(&self, merchant: &str, category: ExpenseCategory) -> SpendscanResult<bool> {
        let changed = self.storage.merchants.record(merchant, category)?;
        if changed {
            self.storage.merchants.save()?;
        }
        Ok(changed)
    }

    fn save_submission(&self, submission: ReceiptSubmission) -> SpendscanResult<Expense> {
        let receipt_id = ReceiptId::new();
        let expense = Expense::new(
            fit_title(submission.merchant()),
            submission.amount(),
            submission.category(),
            submission.date(),
        )
        .with_notes(submission.notes())
        .with_tax(submission.tax())
        .with_receipt(receipt_id);

        expense
            .validate()
            .map_err(|e| SpendscanError::Validation(e.to_string()))?;

        let image_path = self.storage.images.store(receipt_id, submission.image())?;
        let mut receipt = Receipt::new(receipt_id, image_path.clone(), submission.recognized_text());
        receipt.parsed_total = Some(submission.amount());
        receipt.parsed_date = Some(submission.date());
        receipt.parsed_merchant = Some(submission.merchant().to_string());
        receipt.tax_amount = submission.tax();

        if let Err(err) = self.persist_scanned(receipt, &expense) {
            warn!(receipt = %receipt_id, error = %err, "receipt save failed, discarding");
            self.discard_scanned(receipt_id, &expense, &image_path);
            return Err(err);
        }

        self.record_category(submission.merchant(), submission.category())?;

        info!(
            expense = %expense.id,
            receipt = %receipt_id,
            title = %expense.title,
            "receipt saved"
        );
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SpendscanPaths;
    use crate::models::expense::MAX_TITLE_LEN;
    use crate::parsing::{extract, suggest};
    use crate::scan::{ReceiptImage, RecognizedLines, ScanDraft, ScanFlow, ScanOutcome};
    use std::str::FromStr;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendscanPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
    }

    fn new_expense(title: &str, amount: &str, category: ExpenseCategory, date: NaiveDate) -> NewExpense {
        NewExpense {
            title: title.into(),
            amount: Decimal::from_str(amount).unwrap(),
            category,
            date,
            notes: None,
            tax: None,
        }
    }

    fn submission_for(temp_dir: &TempDir, lines: &[&str]) -> ReceiptSubmission {
        let photo = temp_dir.path().join("photo.jpg");
        std::fs::write(&photo, b"jpeg").unwrap();
        let metadata = extract(lines);
        let category = suggest(metadata.merchant.as_deref(), &MerchantMemory::new());
        let draft = ScanDraft::new(ReceiptImage::new(&photo), &metadata, category);
        ReceiptSubmission::from_draft(&draft, date(20)).unwrap()
    }

    #[test]
    fn test_add_expense_validates() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LedgerService::new(&storage);

        let err = service
            .add_expense(new_expense("  ", "10", ExpenseCategory::Food, date(1)))
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .add_expense(new_expense("Cafe", "0", ExpenseCategory::Food, date(1)))
            .unwrap_err();
        assert!(err.is_validation());

        let expense = service
            .add_expense(new_expense("Cafe", "12.50", ExpenseCategory::Food, date(1)))
            .unwrap();
        assert_eq!(service.find(&expense.id.to_string()).unwrap().title, "Cafe");
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LedgerService::new(&storage);

        service
            .add_expense(new_expense("Cafe", "10", ExpenseCategory::Food, date(3)))
            .unwrap();
        service
            .add_expense(new_expense("Metro", "2", ExpenseCategory::Transport, date(4)))
            .unwrap();
        service
            .add_expense(new_expense(
                "Cinema",
                "15",
                ExpenseCategory::Entertainment,
                NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            ))
            .unwrap();

        assert_eq!(service.list(&ExpenseFilter::new()).unwrap().len(), 3);
        assert_eq!(service.list(&ExpenseFilter::new().month(2025, 10)).unwrap().len(), 2);

        let food = service
            .list(&ExpenseFilter::new().category(ExpenseCategory::Food))
            .unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].title, "Cafe");

        let latest = service.list(&ExpenseFilter::new().limit(1)).unwrap();
        assert_eq!(latest[0].title, "Metro");
    }

    #[test]
    fn test_save_submission_stores_everything() {
        let (temp_dir, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let submission = submission_for(&temp_dir, &["Uber Ride", "05/10/2025", "Total 300", "GST 15"]);

        let expense = service.save_submission(submission).unwrap();
        assert_eq!(expense.title, "Uber Ride");
        assert_eq!(expense.amount, Decimal::from(300));
        assert_eq!(expense.category, ExpenseCategory::Transport);
        assert_eq!(expense.date, date(5));

        let receipt = service.receipt_for(&expense).unwrap().unwrap();
        assert!(receipt.recognized_text.contains("Total 300"));
        assert!(receipt.image_location(storage.paths().base_dir()).exists());

        assert_eq!(
            service.lookup_category("uber ride"),
            Some(ExpenseCategory::Transport)
        );
    }

    #[test]
    fn test_record_category_is_idempotent() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LedgerService::new(&storage);

        assert!(service.record_category("Cafe", ExpenseCategory::Food).unwrap());
        assert!(!service.record_category("cafe", ExpenseCategory::Food).unwrap());
        assert!(service.record_category("CAFE", ExpenseCategory::Shopping).unwrap());
        assert_eq!(service.merchants().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_removes_orphaned_receipt() {
        let (temp_dir, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let expense = service
            .save_submission(submission_for(&temp_dir, &["Cafe Mocha", "Total 120"]))
            .unwrap();
        let receipt = service.receipt_for(&expense).unwrap().unwrap();
        let image = receipt.image_location(storage.paths().base_dir());
        assert!(image.exists());

        service.delete(&expense.id.to_string()).unwrap();

        assert!(storage.receipts.get(receipt.id).unwrap().is_none());
        assert!(!image.exists());
        assert!(service.find(&expense.id.to_string()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_add_expense_teaches_merchant_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LedgerService::new(&storage);

        service
            .add_expense(new_expense("Uber Ride", "10", ExpenseCategory::Shopping, date(2)))
            .unwrap();

        assert_eq!(
            service.lookup_category("uber ride"),
            Some(ExpenseCategory::Shopping)
        );
        assert_eq!(
            suggest(Some("UBER RIDE"), &service),
            ExpenseCategory::Shopping
        );
    }

    #[test]
    fn test_long_merchant_is_shortened_on_save() {
        let (temp_dir, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let header = format!("Sri Lakshmi Venkateswara {}", "Super Market ".repeat(8));
        assert!(header.trim().chars().count() > MAX_TITLE_LEN);

        let expense = service
            .save_submission(submission_for(&temp_dir, &[header.as_str(), "Total 250"]))
            .unwrap();

        assert_eq!(expense.title.chars().count(), MAX_TITLE_LEN);
        assert!(header.starts_with(&expense.title));
        let receipt = service.receipt_for(&expense).unwrap().unwrap();
        assert_eq!(receipt.parsed_merchant.as_deref(), Some(header.trim()));
        assert!(receipt.recognized_text.contains(header.trim()));
    }

    #[test]
    fn test_long_merchant_still_auto_saves() {
        let (temp_dir, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let photo = temp_dir.path().join("long.jpg");
        std::fs::write(&photo, b"jpeg").unwrap();
        let header = "Very Long Shop Header ".repeat(6);

        let mut flow = ScanFlow::new(&service, true);
        let token = flow.start(ReceiptImage::new(&photo)).unwrap();
        let outcome = flow
            .complete(
                token,
                Ok(RecognizedLines::new(vec![header.clone(), "Total 250".into()])),
            )
            .unwrap();

        match outcome {
            ScanOutcome::AutoSaved(expense) => {
                assert_eq!(expense.title.chars().count(), MAX_TITLE_LEN);
                assert_eq!(expense.amount, Decimal::from(250));
            }
            other => panic!("expected auto-save, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_expense_write_leaves_no_receipt() {
        let (temp_dir, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        let submission = submission_for(&temp_dir, &["Cafe Mocha", "Total 120"]);

        // a directory where the temp file goes makes the expense write fail
        std::fs::create_dir_all(storage.paths().expenses_file().with_extension("json.tmp")).unwrap();

        let err = service.save_submission(submission).unwrap_err();
        assert!(matches!(err, SpendscanError::Storage(_)));

        assert_eq!(storage.receipts.count().unwrap(), 0);
        assert_eq!(storage.expenses.count().unwrap(), 0);
        let stored_images = std::fs::read_dir(storage.paths().receipts_dir())
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(stored_images, 0);
        assert_eq!(service.lookup_category("cafe mocha"), None);
    }

    #[test]
    fn test_forget_unknown_merchant() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LedgerService::new(&storage);
        assert!(service.forget_merchant("Nowhere").unwrap_err().is_not_found());
    }
}
