//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for expenses and scan drafts.

pub mod expense;
pub mod scan;

pub use expense::{format_expense_details, format_expense_list};
pub use scan::format_draft;

/// Pad or cut `s` to exactly `width` characters, marking cuts with `...`
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        format!("{:width$}", s, width = width)
    } else {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
