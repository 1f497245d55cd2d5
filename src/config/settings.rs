//! User settings for spendscan
//!
//! Manages user preferences: whether confident scans are saved without a
//! review step, the OCR command used to read images, and display formats.

use serde::{Deserialize, Serialize};

use super::paths::SpendscanPaths;
use crate::error::SpendscanError;

/// Placeholder replaced by the image path in `ocr_command`
pub const IMAGE_PLACEHOLDER: &str = "{image}";

/// User settings for spendscan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Save a scan without review when a total was found
    #[serde(default = "default_auto_save_scans")]
    pub auto_save_scans: bool,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// OCR program and arguments; `{image}` is replaced by the image path
    #[serde(default = "default_ocr_command")]
    pub ocr_command: Vec<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_auto_save_scans() -> bool {
    true
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_ocr_command() -> Vec<String> {
    vec![
        "tesseract".to_string(),
        IMAGE_PLACEHOLDER.to_string(),
        "stdout".to_string(),
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            auto_save_scans: default_auto_save_scans(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            ocr_command: default_ocr_command(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &SpendscanPaths) -> Result<Self, SpendscanError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                SpendscanError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                SpendscanError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SpendscanPaths) -> Result<(), SpendscanError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            SpendscanError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            SpendscanError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Format an amount with the configured currency symbol
    pub fn format_amount(&self, amount: rust_decimal::Decimal) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}
