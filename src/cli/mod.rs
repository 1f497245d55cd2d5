//! CLI command handlers
//!
//! Bridges clap argument parsing with the scan flow and the service layer.

pub mod config;
pub mod expense;
pub mod export;
pub mod merchant;
pub mod report;
pub mod scan;

pub use config::{handle_config_command, ConfigCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportFormat};
pub use merchant::{handle_merchant_command, MerchantCommands};
pub use report::handle_report_command;
pub use scan::{handle_parse_command, handle_scan_command, ScanArgs};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{SpendscanError, SpendscanResult};
use crate::models::ExpenseCategory;
use crate::parsing::dates::parse_date_token;
use crate::parsing::parse_amount;

/// Parse `YYYY-MM` into a year and month
pub fn parse_month(input: &str) -> SpendscanResult<(i32, u32)> {
    use chrono::Datelike;

    NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .map(|d| (d.year(), d.month()))
        .map_err(|_| {
            SpendscanError::Validation(format!("Invalid month '{}', expected YYYY-MM", input))
        })
}

/// Parse a date given as `YYYY-MM-DD` or in any layout printed on receipts
pub fn parse_date_arg(input: &str) -> SpendscanResult<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_date_token(input))
        .ok_or_else(|| SpendscanError::Validation(format!("Invalid date '{}'", input)))
}

/// Parse a positive amount; currency glyphs and digit grouping are accepted
pub fn parse_amount_arg(input: &str) -> SpendscanResult<Decimal> {
    parse_amount(input).ok_or_else(|| {
        SpendscanError::Validation(format!("Amount '{}' is not a positive number", input))
    })
}

pub fn parse_category_arg(input: &str) -> SpendscanResult<ExpenseCategory> {
    input
        .parse()
        .map_err(|e: crate::models::UnknownCategory| SpendscanError::Validation(e.to_string()))
}
