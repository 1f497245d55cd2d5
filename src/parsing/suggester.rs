//! Category suggestion for scanned merchants
//!
//! A category the user chose before for the same merchant always wins;
//! otherwise an ordered keyword table is consulted and the first group
//! with a matching keyword decides.

use std::collections::HashMap;

use crate::models::{ExpenseCategory, MerchantMemory};

/// Read access to remembered merchant categories
///
/// Keys passed in are already normalized (trimmed, lower-cased).
pub trait CategoryLookup {
    fn lookup_category(&self, normalized_merchant: &str) -> Option<ExpenseCategory>;
}

impl CategoryLookup for MerchantMemory {
    fn lookup_category(&self, normalized_merchant: &str) -> Option<ExpenseCategory> {
        self.get(normalized_merchant)
    }
}

impl CategoryLookup for HashMap<String, ExpenseCategory> {
    fn lookup_category(&self, normalized_merchant: &str) -> Option<ExpenseCategory> {
        self.get(normalized_merchant).copied()
    }
}

impl<T: CategoryLookup + ?Sized> CategoryLookup for &T {
    fn lookup_category(&self, normalized_merchant: &str) -> Option<ExpenseCategory> {
        (**self).lookup_category(normalized_merchant)
    }
}

/// Keywords that point at a category
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub keywords: &'static [&'static str],
    pub category: ExpenseCategory,
}

impl CategoryRule {
    fn matches(&self, lowered_merchant: &str) -> bool {
        self.keywords.iter().any(|k| lowered_merchant.contains(k))
    }
}

/// Highest priority first
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        keywords: &[
            "coffee", "cafe", "café", "starbucks", "tea", "grocery", "groceries", "supermarket",
            "mart",
        ],
        category: ExpenseCategory::Food,
    },
    CategoryRule {
        keywords: &["restaurant", "diner", "food", "pizza", "burger", "kitchen"],
        category: ExpenseCategory::Food,
    },
    CategoryRule {
        keywords: &[
            "uber", "ola", "ride", "cab", "taxi", "metro", "bus", "petrol", "fuel", "diesel",
            "gas station",
        ],
        category: ExpenseCategory::Transport,
    },
    CategoryRule {
        keywords: &["movie", "cinema", "theatre", "theater", "entertainment"],
        category: ExpenseCategory::Entertainment,
    },
    CategoryRule {
        keywords: &["amazon", "flipkart", "store", "mall", "shop"],
        category: ExpenseCategory::Shopping,
    },
    CategoryRule {
        keywords: &["electric", "water", "gas", "utility", "utilities", "power"],
        category: ExpenseCategory::Utilities,
    },
    CategoryRule {
        keywords: &["rent", "apartment", "housing", "property"],
        category: ExpenseCategory::Housing,
    },
    CategoryRule {
        keywords: &["clinic", "doctor", "medical", "pharmacy", "hospital"],
        category: ExpenseCategory::Health,
    },
    CategoryRule {
        keywords: &["netflix", "spotify", "prime", "subscription"],
        category: ExpenseCategory::Subscriptions,
    },
];

/// Suggest a category for a merchant
pub fn suggest<L: CategoryLookup + ?Sized>(merchant: Option<&str>, lookup: &L) -> ExpenseCategory {
    let key = match merchant.map(MerchantMemory::normalize_key) {
        Some(key) if !key.is_empty() => key,
        _ => return ExpenseCategory::Other,
    };

    if let Some(remembered) = lookup.lookup_category(&key) {
        return remembered;
    }

    CATEGORY_RULES
        .iter()
        .find(|rule| rule.matches(&key))
        .map(|rule| rule.category)
        .unwrap_or(ExpenseCategory::Other)
}
