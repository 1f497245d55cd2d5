//! Scan draft display

use crate::config::Settings;
use crate::scan::ScanDraft;

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

/// Format a draft the way it is presented for review
pub fn format_draft(draft: &ScanDraft, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Image:    {}\n", draft.image.path().display()));
    output.push_str(&format!(
        "Merchant: {}\n",
        if draft.merchant.is_empty() { "-" } else { draft.merchant.as_str() }
    ));
    output.push_str(&format!(
        "Total:    {}\n",
        or_dash(draft.total.map(|t| settings.format_amount(t)))
    ));
    output.push_str(&format!(
        "Tax:      {}\n",
        or_dash(draft.tax.map(|t| settings.format_amount(t)))
    ));
    output.push_str(&format!(
        "Date:     {}\n",
        or_dash(draft.date.map(|d| d.format(&settings.date_format).to_string()))
    ));
    output.push_str(&format!("Category: {}\n", draft.category));
    if !draft.notes.is_empty() {
        output.push_str(&format!("Notes:    {}\n", draft.notes));
    }

    output
}
