//! Receipt metadata extraction
//!
//! Turns recognized receipt lines into a merchant, total, tax and date.
//! Extraction never fails: anything that cannot be resolved is left as
//! `None`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::dates::parse_date_token;
use super::patterns::{
    contains_currency, contains_date, currency_tokens, date_token, decimal_value,
    first_currency_value, MRP_KEYWORDS, TAX_KEYWORDS, TOTAL_KEYWORDS,
};

/// Structured data read from one receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedMetadata {
    pub merchant: Option<String>,
    pub total: Option<Decimal>,
    pub tax: Option<Decimal>,
    pub date: Option<NaiveDate>,
    /// Trimmed, non-empty input lines in their original order
    pub lines: Vec<String>,
}

impl ParsedMetadata {
    /// Sanitized lines joined back into one block of text
    pub fn combined_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Trim every line and drop the blank ones
pub fn sanitize_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.as_ref().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract receipt metadata from recognized text lines
pub fn extract<S: AsRef<str>>(lines: &[S]) -> ParsedMetadata {
    let lines = sanitize_lines(lines);

    ParsedMetadata {
        merchant: extract_merchant(&lines),
        total: extract_total(&lines),
        tax: extract_tax(&lines),
        date: extract_date(&lines),
        lines,
    }
}

/// Facts about the line a total candidate was read from
struct LineContext<'a> {
    line: &'a str,
    is_last: bool,
}

/// Extra weight a candidate earns when its line satisfies `applies`
struct WeightRule {
    applies: fn(&LineContext<'_>) -> bool,
    bonus: u32,
}

fn has_total_keyword(ctx: &LineContext<'_>) -> bool {
    TOTAL_KEYWORDS.matches(ctx.line)
}

fn is_last_line(ctx: &LineContext<'_>) -> bool {
    ctx.is_last
}

const BASE_WEIGHT: u32 = 1;

/// A labelled line lifts a candidate from 1 to 5; the final line adds 1
const WEIGHT_RULES: &[WeightRule] = &[
    WeightRule {
        applies: has_total_keyword,
        bonus: 4,
    },
    WeightRule {
        applies: is_last_line,
        bonus: 1,
    },
];

#[derive(Debug, Clone, Copy)]
struct TotalCandidate {
    value: Decimal,
    weight: u32,
    line_index: usize,
}

fn line_weight(ctx: &LineContext<'_>) -> u32 {
    WEIGHT_RULES
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(|rule| rule.bonus)
        .sum::<u32>()
        + BASE_WEIGHT
}

/// Pick the amount most likely to be the receipt total
///
/// A printed MRP short-circuits everything else. Otherwise every amount on
/// the receipt is a candidate; keyword-labelled and final-line amounts weigh
/// more, and ties go to the larger, then the later, figure.
pub fn extract_total(lines: &[String]) -> Option<Decimal> {
    if let Some(mrp) = extract_mrp(lines) {
        return Some(mrp);
    }

    let last_index = lines.len().checked_sub(1);

    lines
        .iter()
        .enumerate()
        .flat_map(|(line_index, line)| {
            let weight = line_weight(&LineContext {
                line,
                is_last: Some(line_index) == last_index,
            });
            currency_tokens(line)
                .filter_map(decimal_value)
                .map(move |value| TotalCandidate {
                    value,
                    weight,
                    line_index,
                })
        })
        .max_by(|a, b| {
            a.weight
                .cmp(&b.weight)
                .then_with(|| a.value.cmp(&b.value))
                .then_with(|| a.line_index.cmp(&b.line_index))
        })
        .map(|candidate| candidate.value)
}

/// The printed maximum retail price, from the keyword line or the one after it
fn extract_mrp(lines: &[String]) -> Option<Decimal> {
    lines.iter().enumerate().find_map(|(index, line)| {
        if !MRP_KEYWORDS.matches(line) {
            return None;
        }
        first_currency_value(line).or_else(|| lines.get(index + 1).and_then(|next| first_currency_value(next)))
    })
}

/// First amount on a tax-labelled line
pub fn extract_tax(lines: &[String]) -> Option<Decimal> {
    lines
        .iter()
        .filter(|line| TAX_KEYWORDS.matches(line))
        .find_map(|line| first_currency_value(line))
}

/// Date from the first line carrying a date-shaped token
///
/// Only that first token is tried. A later line is never consulted even if
/// the first candidate fits no layout, which keeps reference numbers such as
/// `2025/10/99` from pulling in some unrelated date further down.
pub fn extract_date(lines: &[String]) -> Option<NaiveDate> {
    lines
        .iter()
        .find_map(|line| date_token(line))
        .and_then(parse_date_token)
}

/// First line that reads like a name rather than an amount, date or label
///
/// Falls back to the first line when every line looks like data.
pub fn extract_merchant(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .find(|line| {
            !contains_currency(line)
                && !contains_date(line)
                && !TOTAL_KEYWORDS.matches(line)
                && !TAX_KEYWORDS.matches(line)
        })
        .or_else(|| lines.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parses_total_with_keyword() {
        let metadata = extract(&["Starbucks Coffee", "Order #452", "Total: ₹245.50"]);
        assert_eq!(metadata.total, Some(dec("245.50")));
        assert_eq!(metadata.merchant.as_deref(), Some("Starbucks Coffee"));
    }

    #[test]
    fn test_parses_largest_total_when_no_keyword() {
        let metadata = extract(&["Mini Mart", "Items 5", "120.00", "248.90"]);
        assert_eq!(metadata.total, Some(dec("248.90")));
    }

    #[test]
    fn test_parses_date_with_dash_separator() {
        let metadata = extract(&["Cafe Mocha", "12-10-2025", "Total 120"]);
        assert_eq!(metadata.date, Some(ymd(2025, 10, 12)));
        assert_eq!(metadata.total, Some(dec("120")));
    }

    #[test]
    fn test_parses_merchant_as_first_non_numeric_line() {
        let metadata = extract(&["  ", "12345", "Cafe Indigo", "Total 100"]);
        assert_eq!(metadata.merchant.as_deref(), Some("Cafe Indigo"));
        assert_eq!(metadata.lines, vec!["12345", "Cafe Indigo", "Total 100"]);
    }

    #[test]
    fn test_mrp_overrides_other_amounts() {
        let lines = [
            "Corner Store",
            "Biscuits MRP 40.00",
            "Grand Total 9999.00",
        ];
        assert_eq!(extract(&lines).total, Some(dec("40.00")));
    }

    #[test]
    fn test_mrp_value_on_following_line() {
        let lines = ["Corner Store", "Maximum Retail Price", "Rs. 55", "Total 60"];
        assert_eq!(extract(&lines).total, Some(dec("55")));
    }

    #[test]
    fn test_mrp_without_any_amount_falls_through() {
        let lines = ["Shop", "MRP", "inclusive of all taxes", "Total 60"];
        assert_eq!(extract(&lines).total, Some(dec("60")));
    }

    #[test]
    fn test_keyword_line_beats_larger_unlabelled_amount() {
        let lines = ["Bistro", "Table 12 covers 4500", "Total 1,250.00", "Thank you"];
        assert_eq!(extract(&lines).total, Some(dec("1250.00")));
    }

    #[test]
    fn test_later_line_breaks_value_ties() {
        let lines = ["Bistro", "Subtotal 100.00", "Total 100.00", "Visit again"];
        // both labelled lines weigh 5 with the same value; either way 100
        assert_eq!(extract(&lines).total, Some(dec("100.00")));

        let lines = ["Bistro", "Amount 80.00", "Total 95.00", "Visit again"];
        assert_eq!(extract(&lines).total, Some(dec("95.00")));
    }

    #[test]
    fn test_final_line_outweighs_larger_subtotal() {
        let lines = ["Shop", "Subtotal 300.00", "Total 250.00"];
        assert_eq!(extract(&lines).total, Some(dec("250.00")));
    }

    #[test]
    fn test_final_line_outweighs_larger_bare_amount() {
        assert_eq!(extract(&["Shop", "500", "120"]).total, Some(dec("120")));

        // once the small figure is no longer last, size wins again
        assert_eq!(extract(&["Shop", "500", "120", "Thanks"]).total, Some(dec("500")));
    }

    #[test]
    fn test_no_amounts_means_no_total() {
        let metadata = extract(&["Cafe", "Thank you"]);
        assert_eq!(metadata.total, None);
        assert_eq!(metadata.tax, None);
    }

    #[test]
    fn test_tax_from_first_tax_line() {
        let lines = ["Cafe", "CGST 6.15", "SGST 6.15", "Service Tax 3.00", "Total 260"];
        assert_eq!(extract(&lines).tax, Some(dec("6.15")));
    }

    #[test]
    fn test_tax_line_without_amount_is_skipped() {
        let lines = ["Cafe", "GST included", "VAT 4.50", "Total 50"];
        assert_eq!(extract(&lines).tax, Some(dec("4.50")));
    }

    #[test]
    fn test_date_stops_at_first_date_shaped_line() {
        let lines = ["Store", "Ref 2025/10/12", "Date 12-10-2025"];
        assert_eq!(extract(&lines).date, None);
    }

    #[test]
    fn test_merchant_falls_back_to_first_line() {
        let metadata = extract(&["12345", "Total 100"]);
        assert_eq!(metadata.merchant.as_deref(), Some("12345"));
    }

    #[test]
    fn test_empty_input() {
        let metadata = extract::<&str>(&[]);
        assert_eq!(metadata.merchant, None);
        assert_eq!(metadata.total, None);
        assert_eq!(metadata.date, None);
        assert!(metadata.lines.is_empty());
        assert_eq!(metadata.combined_text(), "");
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let lines = vec![
            " Cafe Aroma ".to_string(),
            "12/10/2025".to_string(),
            "GST 12.30".to_string(),
            "Total ₹245.50".to_string(),
        ];
        let first = extract(&lines);
        let second = extract(&first.lines);
        assert_eq!(first, second);
        assert_eq!(first.combined_text(), "Cafe Aroma\n12/10/2025\nGST 12.30\nTotal ₹245.50");
    }
}
