//! spendscan - receipt scanning into categorized expenses
//!
//! Reads the text printed on a photographed receipt, extracts merchant,
//! total, tax and date, suggests a spending category, and records the
//! result as an expense once it has been reviewed (or immediately, when
//! automatic saving is on).
//!
//! # Architecture
//!
//! - `parsing`: pure text analysis (extractor, date layouts, category suggester)
//! - `scan`: text sources, review drafts and the scan review flow
//! - `models`: expenses, receipts, categories and merchant memory
//! - `storage`: JSON file storage layer
//! - `services`: business logic on top of storage
//! - `reports`, `export`, `display`, `cli`: outer surfaces
//!
//! # Example
//!
//! ```rust
//! use spendscan::models::{ExpenseCategory, MerchantMemory};
//! use spendscan::parsing::{extract, suggest};
//!
//! let metadata = extract(&["Starbucks Coffee", "Order #452", "Total: ₹245.50"]);
//! assert_eq!(metadata.merchant.as_deref(), Some("Starbucks Coffee"));
//! assert_eq!(
//!     suggest(metadata.merchant.as_deref(), &MerchantMemory::new()),
//!     ExpenseCategory::Food
//! );
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod parsing;
pub mod reports;
pub mod scan;
pub mod services;
pub mod storage;

pub use error::{SpendscanError, SpendscanResult};
