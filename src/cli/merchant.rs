//! Merchant memory CLI commands
//!
//! Inspect and correct the categories learned from saved receipts.

use clap::Subcommand;

use crate::error::SpendscanResult;
use crate::models::MerchantMemory;
use crate::parsing::{suggest, CategoryLookup};
use crate::scan::ExpenseLedger;
use crate::services::LedgerService;
use crate::storage::Storage;

use super::parse_category_arg;

/// Merchant subcommands
#[derive(Subcommand, Debug)]
pub enum MerchantCommands {
    /// List learned merchant categories
    List,

    /// Remember a category for a merchant
    Set {
        merchant: String,
        category: String,
    },

    /// Forget a learned merchant
    Forget { merchant: String },

    /// Show the category a receipt from this merchant would get
    Suggest { merchant: String },
}

/// Handle a merchant command
pub fn handle_merchant_command(storage: &Storage, cmd: MerchantCommands) -> SpendscanResult<()> {
    let service = LedgerService::new(storage);

    match cmd {
        MerchantCommands::List => {
            let memory = service.merchants()?;
            if memory.is_empty() {
                println!("No merchants learned yet.");
                return Ok(());
            }

            println!("{:32} {}", "Merchant", "Category");
            println!("{}", "-".repeat(50));
            for (merchant, category) in memory.iter() {
                println!("{:32} {}", merchant, category);
            }
            println!("\nTotal: {} merchants", memory.len());
        }

        MerchantCommands::Set { merchant, category } => {
            let category = parse_category_arg(&category)?;
            if service.record_category(&merchant, category)? {
                println!("'{}' will be filed under {}", merchant.trim(), category);
            } else {
                println!("'{}' is already filed under {}", merchant.trim(), category);
            }
        }

        MerchantCommands::Forget { merchant } => {
            let category = service.forget_merchant(&merchant)?;
            println!("Forgot '{}' ({})", merchant.trim(), category);
        }

        MerchantCommands::Suggest { merchant } => {
            let category = suggest(Some(&merchant), &service);
            let learned = service
                .lookup_category(&MerchantMemory::normalize_key(&merchant))
                .is_some();
            let source = if learned { "learned" } else { "keywords" };
            println!("{} ({})", category, source);
        }
    }

    Ok(())
}
