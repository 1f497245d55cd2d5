//! Expense model
//!
//! A finalized spending record, either entered by hand or produced by a
//! reviewed receipt scan.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::ExpenseCategory;
use super::ids::{ExpenseId, ReceiptId};

/// Longest accepted expense title
pub const MAX_TITLE_LEN: usize = 100;

/// Cut a title down to [`MAX_TITLE_LEN`] characters
pub fn fit_title(title: &str) -> String {
    let title = title.trim();
    match title.char_indices().nth(MAX_TITLE_LEN) {
        Some((end, _)) => title[..end].trim_end().to_string(),
        None => title.to_string(),
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Merchant or short description
    pub title: String,

    /// Amount spent (always positive)
    pub amount: Decimal,

    pub category: ExpenseCategory,

    /// Date of the purchase
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Tax portion printed on the receipt, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    /// Scanned receipt this expense came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<ReceiptId>,

    /// When the expense was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense
    pub fn new(
        title: impl Into<String>,
        amount: Decimal,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            title: title.into(),
            amount,
            category,
            date,
            notes: None,
            tax: None,
            receipt_id: None,
            created_at: Utc::now(),
        }
    }

    /// Attach notes, treating blank text as no notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }

    pub fn with_tax(mut self, tax: Option<Decimal>) -> Self {
        self.tax = tax;
        self
    }

    pub fn with_receipt(mut self, receipt_id: ReceiptId) -> Self {
        self.receipt_id = Some(receipt_id);
        self
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.title.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyTitle);
        }

        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(ExpenseValidationError::TitleTooLong(self.title.chars().count()));
        }

        if self.amount <= Decimal::ZERO {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if matches!(self.tax, Some(tax) if tax < Decimal::ZERO) {
            return Err(ExpenseValidationError::NegativeTax);
        }

        Ok(())
    }

    /// Check whether the expense falls in the given month
    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        use chrono::Datelike;
        self.date.year() == year && self.date.month() == month
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:.2}", self.date, self.title, self.amount)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyTitle,
    TitleTooLong(usize),
    NonPositiveAmount(Decimal),
    NegativeTax,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Expense title cannot be empty"),
            Self::TitleTooLong(len) => {
                write!(f, "Expense title too long ({} chars, max {})", len, MAX_TITLE_LEN)
            }
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive (got {})", amount)
            }
            Self::NegativeTax => write!(f, "Tax cannot be negative"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
