//! Strongly-typed ID wrappers for stored entities
//!
//! Expenses and receipt records both key on UUIDs; the newtypes keep them
//! from being swapped by accident.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short form shown in listings, e.g. `exp-1a2b3c4d`
            pub fn short(&self) -> String {
                format!("{}{}", $prefix, &self.0.simple().to_string()[..8])
            }

            /// Check whether `query` names this ID, either as the full UUID
            /// or as a (possibly prefixed) leading fragment of it
            pub fn matches(&self, query: &str) -> bool {
                let query = query.trim();
                let query = query.strip_prefix($prefix).unwrap_or(query);
                if query.is_empty() {
                    return false;
                }
                let full = self.0.to_string();
                full == query || full.starts_with(query) || self.0.simple().to_string().starts_with(query)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.short())
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(ExpenseId, "exp-");
define_id!(ReceiptId, "rct-");
