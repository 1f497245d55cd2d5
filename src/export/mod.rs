//! Export module for spendscan
//!
//! - CSV: expenses only, spreadsheet-compatible
//! - JSON: full machine-readable snapshot
//! - YAML: the same snapshot, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_expenses_csv;
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
