//! User-controlled view parameters for the product list.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CatalogError;

/// Category sentinel meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Ordering applied by the pipeline's sort stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Case-insensitive title order
    #[default]
    #[serde(rename = "name-asc")]
    NameAsc,
    /// Cheapest first
    #[serde(rename = "price-asc")]
    PriceAsc,
    /// Most expensive first
    #[serde(rename = "price-desc")]
    PriceDesc,
}

impl SortKey {
    /// Every sort key, in menu order
    pub const ALL: [Self; 3] = [Self::NameAsc, Self::PriceAsc, Self::PriceDesc];

    /// Wire name (`name-asc`, `price-asc`, `price-desc`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| CatalogError::Validation(format!("Unknown sort key: {s:?}")))
    }
}

/// Current search text, category and sort selection of the list screen.
///
/// Always fully defined: every field has a default, so there is no partial
/// state to guard against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    /// Free-text search, matched case-insensitively
    pub search_text: String,
    /// Category slug, or [`ALL_CATEGORIES`]
    pub category: String,
    /// Sort order
    pub sort_key: SortKey,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category: ALL_CATEGORIES.to_string(),
            sort_key: SortKey::default(),
        }
    }
}

impl QueryDescriptor {
    /// Builder: Set search text
    #[must_use]
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Builder: Set category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: Set sort key
    #[must_use]
    pub const fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Whether the category stage filters anything
    #[must_use]
    pub fn filters_category(&self) -> bool {
        self.category != ALL_CATEGORIES
    }

    /// Trimmed, lower-cased search needle, or `None` when search is inactive
    #[must_use]
    pub fn search_needle(&self) -> Option<String> {
        let trimmed = self.search_text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    /// Whether this is the initial descriptor (no filters, default sort)
    #[must_use]
    pub fn is_default(&self) -> bool {
        !self.filters_category()
            && self.search_needle().is_none()
            && self.sort_key == SortKey::default()
    }
}
