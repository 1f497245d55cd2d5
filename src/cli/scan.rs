//! Scan and parse commands
//!
//! `scan` runs one receipt through the review flow; `parse` runs only the
//! extractor and suggester over a transcript.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::config::Settings;
use crate::display::{format_draft, format_expense_details};
use crate::error::{SpendscanError, SpendscanResult};
use crate::models::ExpenseCategory;
use crate::parsing::{extract, suggest, ParsedMetadata};
use crate::scan::{
    CommandTextSource, FlowExit, ReceiptImage, ScanDraft, ScanFlow, ScanOutcome, TextSource,
    TranscriptTextSource,
};
use crate::services::LedgerService;
use crate::storage::Storage;

use super::{parse_amount_arg, parse_category_arg, parse_date_arg};

/// Arguments for `spendscan scan`
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Photo of the receipt
    pub image: PathBuf,

    /// Read recognized text from this file instead of running OCR
    ///
    /// Without it, a `.txt` file next to the image is used when present.
    #[arg(long)]
    pub text: Option<PathBuf>,

    /// Save without review when a total is found
    #[arg(long, conflicts_with = "no_auto_save")]
    pub auto_save: bool,

    /// Always stop for review
    #[arg(long)]
    pub no_auto_save: bool,

    /// Correct the merchant
    #[arg(long)]
    pub merchant: Option<String>,

    /// Correct the amount
    #[arg(long)]
    pub amount: Option<String>,

    /// Correct the category
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Correct the date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Correct the tax amount
    #[arg(long)]
    pub tax: Option<String>,

    /// Save the reviewed draft
    #[arg(long)]
    pub save: bool,
}

impl ScanArgs {
    fn has_edits(&self) -> bool {
        self.merchant.is_some()
            || self.amount.is_some()
            || self.category.is_some()
            || self.notes.is_some()
            || self.date.is_some()
            || self.tax.is_some()
    }

    /// Auto-save policy for this run
    ///
    /// Corrections on the command line mean the user wants the reviewed
    /// values, so they switch automatic saving off.
    fn auto_save(&self, settings: &Settings) -> bool {
        if self.has_edits() || self.no_auto_save {
            false
        } else {
            self.auto_save || settings.auto_save_scans
        }
    }

    fn apply_edits(&self, draft: &mut ScanDraft) -> SpendscanResult<()> {
        if let Some(merchant) = &self.merchant {
            draft.merchant = merchant.clone();
        }
        if let Some(amount) = &self.amount {
            draft.amount = amount.clone();
        }
        if let Some(category) = &self.category {
            draft.category = parse_category_arg(category)?;
        }
        if let Some(notes) = &self.notes {
            draft.notes = notes.clone();
        }
        if let Some(date) = &self.date {
            draft.date = Some(parse_date_arg(date)?);
        }
        if let Some(tax) = &self.tax {
            draft.tax = Some(parse_amount_arg(tax)?);
        }
        Ok(())
    }
}

fn text_source(args: &ScanArgs, settings: &Settings) -> SpendscanResult<Box<dyn TextSource>> {
    match &args.text {
        Some(path) => Ok(Box::new(TranscriptTextSource::from_file(path))),
        None if args.image.with_extension("txt").is_file() => {
            debug!("using transcript next to the image");
            Ok(Box::new(TranscriptTextSource::sidecar()))
        }
        None => {
            let source = CommandTextSource::new(&settings.ocr_command)
                .map_err(|e| SpendscanError::Recognition(e.to_string()))?;
            Ok(Box::new(source))
        }
    }
}

/// Handle `spendscan scan`
pub async fn handle_scan_command(
    storage: &Storage,
    settings: &Settings,
    args: ScanArgs,
) -> SpendscanResult<()> {
    if !args.image.is_file() {
        return Err(SpendscanError::Validation(format!(
            "Image not found: {}",
            args.image.display()
        )));
    }

    let source = text_source(&args, settings)?;
    let ledger = LedgerService::new(storage);
    let mut flow = ScanFlow::new(&ledger, args.auto_save(settings));
    debug!(auto_save = flow.auto_save(), "scanning receipt");

    match flow.scan(source.as_ref(), ReceiptImage::new(&args.image)).await? {
        ScanOutcome::AutoSaved(expense) => {
            println!("Saved automatically:");
            println!();
            let receipt = ledger.receipt_for(&expense)?;
            print!("{}", format_expense_details(&expense, receipt.as_ref(), settings));
            Ok(())
        }
        ScanOutcome::Failed(message) => {
            flow.dismiss();
            Err(SpendscanError::Recognition(message))
        }
        ScanOutcome::Discarded => Ok(()),
        ScanOutcome::NeedsReview => {
            if let Some(draft) = flow.draft_mut() {
                args.apply_edits(draft)?;
            }
            if let Some(draft) = flow.draft() {
                print!("{}", format_draft(draft, settings));
            }

            if !args.save {
                println!();
                if flow.can_save() {
                    println!("Not saved. Re-run with --save to record it.");
                } else {
                    println!("Not saved. Provide --merchant and --amount, then --save.");
                }
                flow.dismiss();
                return Ok(());
            }

            match flow.save_draft()? {
                FlowExit::Saved(expense) => {
                    println!();
                    println!("Saved expense {}", expense.id);
                }
                FlowExit::Dismissed => {}
            }
            Ok(())
        }
    }
}

/// Extraction result as printed by `spendscan parse`
#[derive(Debug, Serialize)]
struct ParseReport {
    #[serde(flatten)]
    metadata: ParsedMetadata,
    category: ExpenseCategory,
}

/// Handle `spendscan parse`; reads standard input when no file is given
pub fn handle_parse_command(storage: &Storage, file: Option<PathBuf>) -> SpendscanResult<()> {
    let text = match file {
        Some(path) => std::fs::read_to_string(&path).map_err(|e| {
            SpendscanError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let lines: Vec<&str> = text.lines().collect();
    let metadata = extract(&lines);
    let category = suggest(metadata.merchant.as_deref(), &LedgerService::new(storage));

    let report = ParseReport { metadata, category };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
