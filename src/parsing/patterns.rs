//! Token patterns and keyword tables for receipt text
//!
//! Every heuristic the extractor applies is driven by the tables in this
//! module, so adding a keyword never means touching control flow.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Currency glyphs that may precede an amount
pub const CURRENCY_GLYPHS: &[char] = &['₹', '$', '€', '£', '¥'];

/// Optional glyph, digits grouped by comma or space in clusters of 2-3,
/// optional one or two decimal places.
static CURRENCY_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[₹$€£¥]?\s*[0-9]+(?:[,\s][0-9]{2,3})*(?:\.[0-9]{1,2})?")
        .expect("currency token pattern is valid")
});

static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}[/-]\d{1,2}[/-]\d{1,2})\b")
        .expect("date token pattern is valid")
});

/// A named list of lowercase keywords matched as substrings
#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

impl KeywordSet {
    /// Case-insensitive substring match against any keyword
    pub fn matches(&self, line: &str) -> bool {
        let lowered = line.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Lines that label the amount actually paid
pub const TOTAL_KEYWORDS: KeywordSet = KeywordSet {
    name: "total",
    keywords: &[
        "total",
        "grand total",
        "amount",
        "balance due",
        "amount due",
        "subtotal",
    ],
};

/// Printed maximum retail price; overrides every other total candidate
pub const MRP_KEYWORDS: KeywordSet = KeywordSet {
    name: "mrp",
    keywords: &["mrp", "m.r.p", "maximum retail price"],
};

pub const TAX_KEYWORDS: KeywordSet = KeywordSet {
    name: "tax",
    keywords: &["tax", "gst", "vat", "service tax"],
};

/// All currency-shaped fragments of a line, in order of appearance
pub fn currency_tokens(line: &str) -> impl Iterator<Item = &str> + '_ {
    CURRENCY_TOKEN.find_iter(line).map(|m| m.as_str())
}

pub fn contains_currency(line: &str) -> bool {
    CURRENCY_TOKEN.is_match(line)
}

/// The first currency token of a line that reads as a decimal
pub fn first_currency_value(line: &str) -> Option<Decimal> {
    currency_tokens(line).next().and_then(decimal_value)
}

/// First date-shaped fragment of a line
pub fn date_token(line: &str) -> Option<&str> {
    DATE_TOKEN.find(line).map(|m| m.as_str())
}

pub fn contains_date(line: &str) -> bool {
    DATE_TOKEN.is_match(line)
}

/// Read a currency token as a decimal, dropping glyphs, grouping
/// separators and stray punctuation around it
pub fn decimal_value(token: &str) -> Option<Decimal> {
    let cleaned: String = token
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | ';' | '-'))
        .chars()
        .filter(|c| !CURRENCY_GLYPHS.contains(c) && *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parse a user-typed amount; only strictly positive values are accepted
pub fn parse_amount(input: &str) -> Option<Decimal> {
    if input.trim_start().starts_with('-') {
        return None;
    }
    decimal_value(input).filter(|value| *value > Decimal::ZERO)
}
