//! Expense display formatting

use rust_decimal::Decimal;

use crate::config::Settings;
use crate::models::{Expense, Receipt};

use super::truncate;

/// Format expenses as a table, one row each
pub fn format_expense_list(expenses: &[Expense], settings: &Settings) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {:24} {:16} {:>12}\n",
        "ID", "Date", "Title", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(78));
    output.push('\n');

    for expense in expenses {
        let receipt_marker = if expense.receipt_id.is_some() { " *" } else { "" };
        output.push_str(&format!(
            "{:12} {:10} {:24} {:16} {:>12}{}\n",
            expense.id.short(),
            expense.date.format(&settings.date_format).to_string(),
            truncate(&expense.title, 24),
            truncate(expense.category.label(), 16),
            settings.format_amount(expense.amount),
            receipt_marker
        ));
    }

    let total: Decimal = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&"-".repeat(78));
    output.push('\n');
    output.push_str(&format!(
        "{} expense(s), total {}\n",
        expenses.len(),
        settings.format_amount(total)
    ));
    if expenses.iter().any(|e| e.receipt_id.is_some()) {
        output.push_str("* = scanned from a receipt\n");
    }

    output
}

/// Format one expense and, if it has one, its receipt
pub fn format_expense_details(
    expense: &Expense,
    receipt: Option<&Receipt>,
    settings: &Settings,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:  {}\n", expense.id));
    output.push_str(&format!("Title:    {}\n", expense.title));
    output.push_str(&format!("Amount:   {}\n", settings.format_amount(expense.amount)));
    if let Some(tax) = expense.tax {
        output.push_str(&format!("Tax:      {}\n", settings.format_amount(tax)));
    }
    output.push_str(&format!("Category: {}\n", expense.category));
    output.push_str(&format!("Date:     {}\n", expense.date.format(&settings.date_format)));
    if let Some(notes) = &expense.notes {
        output.push_str(&format!("Notes:    {}\n", notes));
    }

    if let Some(receipt) = receipt {
        output.push_str(&format!("\nReceipt:  {}\n", receipt.id));
        output.push_str(&format!("Image:    {}\n", receipt.image_path));
        if !receipt.recognized_text.is_empty() {
            output.push_str("Text:\n");
            for line in receipt.recognized_text.lines() {
                output.push_str(&format!("  | {}\n", line));
            }
        }
    }

    output
}
