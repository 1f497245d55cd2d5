//! Reports module for spendscan
//!
//! Summaries computed over stored expenses.

pub mod spending;

pub use spending::{CategorySpending, SpendingReport};
