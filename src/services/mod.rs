//! Service layer for spendscan
//!
//! Business logic on top of the storage layer: validation, receipt
//! bookkeeping and the merchant category write-back.

pub mod ledger;

pub use ledger::{ExpenseFilter, LedgerService, NewExpense};
