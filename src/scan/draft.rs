//! Review drafts and finalized receipt submissions

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

use super::source::ReceiptImage;
use crate::models::ExpenseCategory;
use crate::parsing::{parse_amount, ParsedMetadata};

/// Merchant used when an automatic save finds no merchant name
pub const FALLBACK_MERCHANT: &str = "Receipt";

/// Longest note derived from recognized text
pub const SUMMARY_NOTE_LIMIT: usize = 120;

/// Editable working copy of one scan attempt
///
/// Seeded from [`ParsedMetadata`]; every later correction is made here and
/// never on the metadata itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDraft {
    pub image: ReceiptImage,
    pub merchant: String,
    /// Total as read from the receipt
    pub total: Option<Decimal>,
    /// Amount field as the user sees and edits it
    pub amount: String,
    pub tax: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub category: ExpenseCategory,
    pub notes: String,
    pub recognized_text: String,
}

impl ScanDraft {
    pub fn new(image: ReceiptImage, metadata: &ParsedMetadata, category: ExpenseCategory) -> Self {
        Self {
            image,
            merchant: metadata.merchant.clone().unwrap_or_default(),
            total: metadata.total,
            amount: metadata.total.map(|t| t.to_string()).unwrap_or_default(),
            tax: metadata.tax,
            date: metadata.date,
            category,
            notes: String::new(),
            recognized_text: metadata.combined_text(),
        }
    }

    /// Amount field parsed as a positive decimal
    pub fn parsed_amount(&self) -> Option<Decimal> {
        parse_amount(&self.amount)
    }

    /// Whether a manual save would be accepted
    pub fn can_save(&self) -> bool {
        !self.merchant.trim().is_empty() && self.parsed_amount().is_some()
    }

    /// First line of the recognized text, trimmed and capped in length
    pub fn summary_note(&self) -> String {
        self.recognized_text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(|line| line.chars().take(SUMMARY_NOTE_LIMIT).collect::<String>())
            .map(|note| note.trim().to_string())
            .unwrap_or_default()
    }
}

/// Why a draft cannot be turned into a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    EmptyMerchant,
    InvalidAmount(String),
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMerchant => write!(f, "Merchant cannot be empty"),
            Self::InvalidAmount(input) => {
                write!(f, "Amount '{}' is not a positive number", input)
            }
        }
    }
}

impl std::error::Error for SubmissionError {}

/// Finalized receipt data handed to the ledger
///
/// Only constructible from a draft, so the merchant is never empty and the
/// amount is always a positive decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSubmission {
    image: ReceiptImage,
    merchant: String,
    amount: Decimal,
    date: NaiveDate,
    category: ExpenseCategory,
    tax: Option<Decimal>,
    notes: String,
    recognized_text: String,
}

impl ReceiptSubmission {
    /// Validate a manually reviewed draft
    ///
    /// `today` stands in for a missing date.
    pub fn from_draft(draft: &ScanDraft, today: NaiveDate) -> Result<Self, SubmissionError> {
        let merchant = draft.merchant.trim();
        if merchant.is_empty() {
            return Err(SubmissionError::EmptyMerchant);
        }
        let amount = draft
            .parsed_amount()
            .ok_or_else(|| SubmissionError::InvalidAmount(draft.amount.clone()))?;

        Ok(Self {
            image: draft.image.clone(),
            merchant: merchant.to_string(),
            amount,
            date: draft.date.unwrap_or(today),
            category: draft.category,
            tax: draft.tax,
            notes: draft.notes.trim().to_string(),
            recognized_text: draft.recognized_text.clone(),
        })
    }

    /// Build the submission saved without review
    ///
    /// Requires a positive parsed total. A blank merchant becomes
    /// [`FALLBACK_MERCHANT`] and blank notes become the receipt's first line.
    pub fn automatic(draft: &ScanDraft, today: NaiveDate) -> Option<Self> {
        let amount = draft.total.filter(|total| *total > Decimal::ZERO)?;

        let merchant = match draft.merchant.trim() {
            "" => FALLBACK_MERCHANT.to_string(),
            trimmed => trimmed.to_string(),
        };
        let notes = if draft.notes.trim().is_empty() {
            draft.summary_note()
        } else {
            draft.notes.clone()
        };

        Some(Self {
            image: draft.image.clone(),
            merchant,
            amount,
            date: draft.date.unwrap_or(today),
            category: draft.category,
            tax: draft.tax,
            notes,
            recognized_text: draft.recognized_text.clone(),
        })
    }

    pub fn image(&self) -> &ReceiptImage {
        &self.image
    }

    pub fn merchant(&self) -> &str {
        &self.merchant
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    pub fn tax(&self) -> Option<Decimal> {
        self.tax
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn recognized_text(&self) -> &str {
        &self.recognized_text
    }
}
