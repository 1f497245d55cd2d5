//! CSV Export functionality
//!
//! Exports expenses to a spreadsheet-friendly CSV file.

use std::io::Write;

use crate::error::{SpendscanError, SpendscanResult};
use crate::storage::Storage;

fn export_error(err: impl std::fmt::Display) -> SpendscanError {
    SpendscanError::Export(err.to_string())
}

/// Export all expenses to CSV, newest first
pub fn export_expenses_csv<W: Write>(storage: &Storage, writer: W) -> SpendscanResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "ID", "Date", "Title", "Category", "Amount", "Tax", "Notes", "Receipt",
        ])
        .map_err(export_error)?;

    for expense in storage.expenses.get_all()? {
        csv_writer
            .write_record([
                expense.id.as_uuid().to_string(),
                expense.date.to_string(),
                expense.title,
                expense.category.label().to_string(),
                format!("{:.2}", expense.amount),
                expense.tax.map(|t| format!("{:.2}", t)).unwrap_or_default(),
                expense.notes.unwrap_or_default(),
                expense
                    .receipt_id
                    .map(|id| id.as_uuid().to_string())
                    .unwrap_or_default(),
            ])
            .map_err(export_error)?;
    }

    csv_writer.flush().map_err(export_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SpendscanPaths;
    use crate::models::{Expense, ExpenseCategory};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    #[test]
    fn test_csv_export_quotes_fields() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::open(SpendscanPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage
            .expenses
            .upsert(
                Expense::new(
                    "Dinner, with friends",
                    Decimal::new(4550, 2),
                    ExpenseCategory::Food,
                    NaiveDate::from_ymd_opt(2025, 10, 12).unwrap(),
                )
                .with_tax(Some(Decimal::new(250, 2))),
            )
            .unwrap();

        let mut buffer = Vec::new();
        export_expenses_csv(&storage, &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Date,Title,Category,Amount,Tax,Notes,Receipt"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("2025-10-12,\"Dinner, with friends\",Food & Dining,45.50,2.50,,"));
    }
}
