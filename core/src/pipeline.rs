//! Product query pipeline.
//!
//! A pure projection from the raw product collection to the list a user
//! sees. Stages run in a fixed order:
//!
//! 1. category filter (exact, case-sensitive)
//! 2. search filter (case-insensitive substring)
//! 3. stable sort by the selected [`SortKey`]
//!
//! Titles are ordered with the Unicode Collation Algorithm at the CLDR root
//! locale, after case folding, so "Éclair" sorts next to "eclair" rather than
//! after "Zebra".
//!
//! Filtering happens before sorting so the sort only pays for what survives.
//! Nothing here mutates the input slice or panics on malformed products: a
//! missing title sorts as the empty string and a missing price sorts as zero.

use std::cmp::Ordering;
use std::collections::HashSet;

use feruca::{Collator, Locale, Tailoring};
use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::query::{ALL_CATEGORIES, QueryDescriptor, SortKey};

/// Which product fields the search stage matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Match `title` only
    #[default]
    Title,
    /// Match `title` or `description`
    TitleAndDescription,
}

/// Pipeline configuration, fixed for the lifetime of a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fields the search stage looks at
    pub search_scope: SearchScope,
}

impl PipelineConfig {
    /// Builder: Set search scope
    #[must_use]
    pub const fn with_search_scope(mut self, scope: SearchScope) -> Self {
        self.search_scope = scope;
        self
    }
}

/// Project `raw` through the category, search and sort stages.
///
/// Returns a newly allocated list, possibly empty, never longer than `raw`.
#[must_use]
pub fn project(raw: &[Product], query: &QueryDescriptor, config: &PipelineConfig) -> Vec<Product> {
    let needle = query.search_needle();

    let mut visible: Vec<Product> = raw
        .iter()
        .filter(|product| matches_category(product, &query.category))
        .filter(|product| {
            needle
                .as_deref()
                .is_none_or(|needle| matches_search(product, needle, config.search_scope))
        })
        .cloned()
        .collect();

    sort_products(&mut visible, query.sort_key);

    tracing::trace!(
        raw = raw.len(),
        visible = visible.len(),
        sort_key = %query.sort_key,
        "Pipeline projection completed"
    );

    visible
}

/// Category stage predicate.
#[must_use]
pub fn matches_category(product: &Product, category: &str) -> bool {
    category == ALL_CATEGORIES || product.category == category
}

/// Search stage predicate. `needle` must already be trimmed and lower-cased.
#[must_use]
pub fn matches_search(product: &Product, needle: &str, scope: SearchScope) -> bool {
    if product.title.to_lowercase().contains(needle) {
        return true;
    }

    match scope {
        SearchScope::Title => false,
        SearchScope::TitleAndDescription => product.description.to_lowercase().contains(needle),
    }
}

/// Sort stage. All sorts are stable, so equal keys keep their input order.
pub fn sort_products(products: &mut Vec<Product>, sort_key: SortKey) {
    match sort_key {
        SortKey::NameAsc => {
            let mut collator = TitleCollator::new();
            let mut keyed: Vec<(String, Product)> = products
                .drain(..)
                .map(|p| (p.title.to_lowercase(), p))
                .collect();
            keyed.sort_by(|(a, _), (b, _)| collator.compare_folded(a, b));
            products.extend(keyed.into_iter().map(|(_, p)| p));
        },
        SortKey::PriceAsc => products.sort_by(|a, b| compare_price(a, b)),
        SortKey::PriceDesc => products.sort_by(|a, b| compare_price(b, a)),
    }
}

/// Case-insensitive, locale-aware title ordering used by [`SortKey::NameAsc`].
///
/// Uses the root collation table with no tailoring. Titles differing only in
/// case compare equal.
pub struct TitleCollator {
    collator: Collator,
}

impl TitleCollator {
    /// Create a collator for the CLDR root locale
    #[must_use]
    pub fn new() -> Self {
        Self {
            collator: Collator::new(Tailoring::Cldr(Locale::Root), false, false),
        }
    }

    /// Compare two titles
    pub fn compare(&mut self, a: &str, b: &str) -> Ordering {
        self.compare_folded(&a.to_lowercase(), &b.to_lowercase())
    }

    fn compare_folded(&mut self, a: &str, b: &str) -> Ordering {
        self.collator.collate(a, b)
    }
}

impl Default for TitleCollator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TitleCollator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleCollator").finish_non_exhaustive()
    }
}

fn compare_price(a: &Product, b: &Product) -> Ordering {
    a.price_or_zero().total_cmp(&b.price_or_zero())
}

/// Category chips for the list screen: [`ALL_CATEGORIES`] followed by each
/// distinct category of `raw` in first-seen order.
#[must_use]
pub fn available_categories(raw: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut categories = vec![ALL_CATEGORIES.to_string()];

    for product in raw {
        if product.category.is_empty() || product.category == ALL_CATEGORIES {
            continue;
        }
        if seen.insert(product.category.as_str()) {
            categories.push(product.category.clone());
        }
    }

    categories
}
