//! Expense CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::SpendscanResult;
use crate::parsing::suggest;
use crate::services::{ExpenseFilter, LedgerService, NewExpense};
use crate::storage::Storage;

use super::{parse_amount_arg, parse_category_arg, parse_date_arg, parse_month};

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// List recorded expenses, newest first
    List {
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Show at most this many
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Record an expense by hand
    Add {
        /// Merchant or short description
        title: String,

        amount: String,

        /// Category; suggested from the title when omitted
        #[arg(short, long)]
        category: Option<String>,

        /// Purchase date, today when omitted
        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,

        #[arg(long)]
        tax: Option<String>,
    },

    /// Show an expense and its receipt
    Show {
        /// Expense ID (short form is fine)
        id: String,
    },

    /// Delete an expense
    Delete {
        /// Expense ID (short form is fine)
        id: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> SpendscanResult<()> {
    let service = LedgerService::new(storage);

    match cmd {
        ExpenseCommands::List {
            month,
            category,
            limit,
        } => {
            let mut filter = ExpenseFilter::new();
            if let Some(month) = month {
                let (year, month) = parse_month(&month)?;
                filter = filter.month(year, month);
            }
            if let Some(category) = category {
                filter = filter.category(parse_category_arg(&category)?);
            }
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let expenses = service.list(&filter)?;
            print!("{}", format_expense_list(&expenses, settings));
        }

        ExpenseCommands::Add {
            title,
            amount,
            category,
            date,
            notes,
            tax,
        } => {
            let category = match category {
                Some(category) => parse_category_arg(&category)?,
                None => suggest(Some(&title), &service),
            };
            let date = match date {
                Some(date) => parse_date_arg(&date)?,
                None => Local::now().date_naive(),
            };
            let tax = tax.as_deref().map(parse_amount_arg).transpose()?;

            let expense = service.add_expense(NewExpense {
                title,
                amount: parse_amount_arg(&amount)?,
                category,
                date,
                notes,
                tax,
            })?;

            println!(
                "Added expense {}: {} {} ({})",
                expense.id,
                expense.title,
                settings.format_amount(expense.amount),
                expense.category
            );
        }

        ExpenseCommands::Show { id } => {
            let expense = service.find(&id)?;
            let receipt = service.receipt_for(&expense)?;
            print!(
                "{}",
                format_expense_details(&expense, receipt.as_ref(), settings)
            );
        }

        ExpenseCommands::Delete { id } => {
            let expense = service.delete(&id)?;
            println!("Deleted expense {}: {}", expense.id, expense.title);
        }
    }

    Ok(())
}
