//! Core data models for spendscan
//!
//! Expenses, the receipt records they were scanned from, the closed set of
//! spending categories, and the learned merchant -> category memory.

pub mod category;
pub mod expense;
pub mod ids;
pub mod merchant;
pub mod receipt;

pub use category::{ExpenseCategory, UnknownCategory};
pub use expense::{fit_title, Expense, ExpenseValidationError};
pub use ids::{ExpenseId, ReceiptId};
pub use merchant::MerchantMemory;
pub use receipt::Receipt;
