//! Receipt date layouts
//!
//! Receipts print dates day-first far more often than month-first, so the
//! day-first layouts are tried before the US ones. The order of
//! [`DATE_LAYOUTS`] is the tie-break for ambiguous dates like `04/05/2025`.

use chrono::NaiveDate;

/// Where the year sits in a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearPosition {
    First,
    Last,
}

/// One accepted date layout
#[derive(Debug, Clone, Copy)]
pub struct DateLayout {
    /// Layout as written on receipts, e.g. `dd/MM/yyyy`
    pub pattern: &'static str,
    strftime: &'static str,
    separator: char,
    year_position: YearPosition,
    year_digits: usize,
}

impl DateLayout {
    const fn new(
        pattern: &'static str,
        strftime: &'static str,
        separator: char,
        year_position: YearPosition,
        year_digits: usize,
    ) -> Self {
        Self {
            pattern,
            strftime,
            separator,
            year_position,
            year_digits,
        }
    }

    /// Parse `token` if it has exactly this layout's shape
    ///
    /// chrono accepts any year width for `%Y`, so the year component's
    /// width is checked up front; otherwise `12/10/25` would read as the
    /// year 25 under `dd/MM/yyyy`.
    pub fn parse(&self, token: &str) -> Option<NaiveDate> {
        let parts: Vec<&str> = token.split(self.separator).collect();
        if parts.len() != 3 {
            return None;
        }

        let (year, rest) = match self.year_position {
            YearPosition::First => (parts[0], [parts[1], parts[2]]),
            YearPosition::Last => (parts[2], [parts[0], parts[1]]),
        };

        if year.len() != self.year_digits || rest.iter().any(|p| p.is_empty() || p.len() > 2) {
            return None;
        }

        NaiveDate::parse_from_str(token, self.strftime).ok()
    }
}

/// Accepted layouts, tried in order; the first that parses wins
pub const DATE_LAYOUTS: [DateLayout; 7] = [
    DateLayout::new("dd/MM/yyyy", "%d/%m/%Y", '/', YearPosition::Last, 4),
    DateLayout::new("dd-MM-yyyy", "%d-%m-%Y", '-', YearPosition::Last, 4),
    DateLayout::new("yyyy-MM-dd", "%Y-%m-%d", '-', YearPosition::First, 4),
    DateLayout::new("dd/MM/yy", "%d/%m/%y", '/', YearPosition::Last, 2),
    DateLayout::new("dd-MM-yy", "%d-%m-%y", '-', YearPosition::Last, 2),
    DateLayout::new("MM/dd/yyyy", "%m/%d/%Y", '/', YearPosition::Last, 4),
    DateLayout::new("MM-dd-yyyy", "%m-%d-%Y", '-', YearPosition::Last, 4),
];

/// Parse a date token with the first layout that accepts it
pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    DATE_LAYOUTS.iter().find_map(|layout| layout.parse(token))
}
