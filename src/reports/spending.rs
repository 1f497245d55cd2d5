//! Spending Report
//!
//! Totals expenses per category, optionally for a single month.

use std::collections::HashMap;
use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{SpendscanError, SpendscanResult};
use crate::models::{Expense, ExpenseCategory};
use crate::services::{ExpenseFilter, LedgerService};
use crate::storage::Storage;

/// Spending for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpending {
    pub category: ExpenseCategory,
    pub total: Decimal,
    pub count: usize,
}

impl CategorySpending {
    /// Share of `overall`, in percent
    pub fn percentage(&self, overall: Decimal) -> Decimal {
        if overall.is_zero() {
            Decimal::ZERO
        } else {
            (self.total * Decimal::ONE_HUNDRED / overall).round_dp(1)
        }
    }
}

/// Spending Report
#[derive(Debug, Clone, Serialize)]
pub struct SpendingReport {
    /// Year and month covered, or `None` for all time
    pub month: Option<(i32, u32)>,
    /// Categories with spending, largest first
    pub categories: Vec<CategorySpending>,
    pub total: Decimal,
    pub expense_count: usize,
}

impl SpendingReport {
    /// Generate a report from stored expenses
    pub fn generate(storage: &Storage, month: Option<(i32, u32)>) -> SpendscanResult<Self> {
        let mut filter = ExpenseFilter::new();
        if let Some((year, month)) = month {
            filter = filter.month(year, month);
        }
        let expenses = LedgerService::new(storage).list(&filter)?;
        Ok(Self::from_expenses(&expenses, month))
    }

    /// Aggregate an already selected set of expenses
    pub fn from_expenses(expenses: &[Expense], month: Option<(i32, u32)>) -> Self {
        let mut by_category: HashMap<ExpenseCategory, (Decimal, usize)> = HashMap::new();
        for expense in expenses {
            let entry = by_category
                .entry(expense.category)
                .or_insert((Decimal::ZERO, 0));
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        let mut categories: Vec<_> = by_category
            .into_iter()
            .map(|(category, (total, count))| CategorySpending {
                category,
                total,
                count,
            })
            .collect();
        // Equal totals fall back to the fixed category order
        categories.sort_by(|a, b| {
            b.total.cmp(&a.total).then_with(|| {
                let position = |c: ExpenseCategory| ExpenseCategory::ALL.iter().position(|x| *x == c);
                position(a.category).cmp(&position(b.category))
            })
        });

        Self {
            month,
            total: categories.iter().map(|c| c.total).sum(),
            expense_count: expenses.len(),
            categories,
        }
    }

    fn period_label(&self) -> String {
        match self.month {
            Some((year, month)) => format!("{}-{:02}", year, month),
            None => "all time".to_string(),
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Spending Report: {}\n", self.period_label()));
        output.push_str(&"=".repeat(56));
        output.push('\n');

        if self.categories.is_empty() {
            output.push_str("No expenses recorded.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<24} {:>14} {:>7} {:>7}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(56));
        output.push('\n');

        for row in &self.categories {
            output.push_str(&format!(
                "{:<24} {:>14} {:>7} {:>6}%\n",
                row.category.label(),
                format!("{}{:.2}", currency_symbol, row.total),
                row.count,
                row.percentage(self.total)
            ));
        }

        output.push_str(&"-".repeat(56));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>14} {:>7}\n",
            "TOTAL",
            format!("{}{:.2}", currency_symbol, self.total),
            self.expense_count
        ));

        output
    }

    /// Export the report as CSV rows
    pub fn export_csv<W: Write>(&self, writer: W) -> SpendscanResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let period = self.period_label();

        csv_writer
            .write_record(["Period", "Category", "Amount", "Count", "Percentage"])
            .map_err(|e| SpendscanError::Export(e.to_string()))?;

        for row in &self.categories {
            csv_writer
                .write_record([
                    period.clone(),
                    row.category.label().to_string(),
                    format!("{:.2}", row.total),
                    row.count.to_string(),
                    format!("{:.1}", row.percentage(self.total)),
                ])
                .map_err(|e| SpendscanError::Export(e.to_string()))?;
        }

        csv_writer
            .flush()
            .map_err(|e| SpendscanError::Export(e.to_string()))?;
        Ok(())
    }
}
