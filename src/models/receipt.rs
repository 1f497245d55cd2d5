//! Receipt record model
//!
//! Keeps the stored image location and the text that was recognized from
//! it, next to the values the extractor read out of that text.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ids::ReceiptId;

/// A stored receipt scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,

    /// Image location relative to the data root
    pub image_path: String,

    /// Recognized text, one line per row
    pub recognized_text: String,

    #[serde(default)]
    pub parsed_total: Option<Decimal>,

    #[serde(default)]
    pub parsed_date: Option<NaiveDate>,

    #[serde(default)]
    pub parsed_merchant: Option<String>,

    #[serde(default)]
    pub tax_amount: Option<Decimal>,

    pub created_at: DateTime<Utc>,
}

impl Receipt {
    pub fn new(id: ReceiptId, image_path: impl Into<String>, recognized_text: impl Into<String>) -> Self {
        Self {
            id,
            image_path: image_path.into(),
            recognized_text: recognized_text.into(),
            parsed_total: None,
            parsed_date: None,
            parsed_merchant: None,
            tax_amount: None,
            created_at: Utc::now(),
        }
    }

    /// Absolute image location given the data root
    pub fn image_location(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.image_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_location_is_relative_to_base() {
        let receipt = Receipt::new(ReceiptId::new(), "receipts/abc.jpg", "Cafe\nTotal 10");
        assert_eq!(
            receipt.image_location(Path::new("/data")),
            PathBuf::from("/data/receipts/abc.jpg")
        );
    }

    #[test]
    fn test_optional_fields_default_when_missing() {
        let id = ReceiptId::new();
        let json = format!(
            r#"{{"id":"{}","image_path":"receipts/x.png","recognized_text":"","created_at":"2025-10-20T10:00:00Z"}}"#,
            id.as_uuid()
        );
        let receipt: Receipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt.id, id);
        assert!(receipt.parsed_total.is_none());
        assert!(receipt.parsed_merchant.is_none());
    }
}
