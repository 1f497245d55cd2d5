//! Receipt text analysis
//!
//! - `patterns`: currency/date token grammars and keyword tables
//! - `dates`: accepted date layouts, in priority order
//! - `extractor`: recognized lines -> merchant, total, tax, date
//! - `suggester`: merchant -> spending category, with learned overrides
//!
//! Everything here is synchronous and pure; none of it can fail.

pub mod dates;
pub mod extractor;
pub mod patterns;
pub mod suggester;

pub use extractor::{extract, ParsedMetadata};
pub use patterns::parse_amount;
pub use suggester::{suggest, CategoryLookup};
