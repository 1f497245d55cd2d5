//! The expense ledger as seen by a scan

use crate::error::SpendscanResult;
use crate::models::{Expense, ExpenseCategory};
use crate::parsing::CategoryLookup;

use super::draft::ReceiptSubmission;

/// Where finalized scans go, and where learned merchant categories live
pub trait ExpenseLedger: CategoryLookup {
    /// Remember `category` for `merchant`
    ///
    /// Returns `true` if the stored association changed; recording an
    /// association that already exists is a no-op.
    fn record_category(&self, merchant: &str, category: ExpenseCategory) -> SpendscanResult<bool>;

    /// Persist a finalized scan as an expense
    fn save_submission(&self, submission: ReceiptSubmission) -> SpendscanResult<Expense>;
}

impl<T: ExpenseLedger + ?Sized> ExpenseLedger for &T {
    fn record_category(&self, merchant: &str, category: ExpenseCategory) -> SpendscanResult<bool> {
        (**self).record_category(merchant, category)
    }

    fn save_submission(&self, submission: ReceiptSubmission) -> SpendscanResult<Expense> {
        (**self).save_submission(submission)
    }
}
