//! Product list screen state and its reducer.
//!
//! Every user interaction on the list screen (typing, tapping a category,
//! picking a sort) is a [`ProductListAction`]. The reducer updates the
//! [`QueryDescriptor`] and recomputes the visible items from the raw
//! collection already in memory. No action here causes a network call.

use std::sync::Arc;

use crate::pipeline::{PipelineConfig, available_categories, project};
use crate::product::Product;
use crate::query::{QueryDescriptor, SortKey};
use crate::reducer::Reducer;

/// State owned by one product list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListState {
    /// Current view parameters
    pub query: QueryDescriptor,
    /// Raw collection from the last successful fetch, empty before that
    pub products: Arc<[Product]>,
    /// `products` projected through the pipeline with `query`
    pub items: Vec<Product>,
    /// Category chips derived from `products`
    pub categories: Vec<String>,
}

impl Default for ProductListState {
    fn default() -> Self {
        Self {
            query: QueryDescriptor::default(),
            products: Arc::from(Vec::new()),
            items: Vec::new(),
            categories: available_categories(&[]),
        }
    }
}

impl ProductListState {
    /// Create a state over an already-fetched collection
    #[must_use]
    pub fn with_products(products: Arc<[Product]>, config: &PipelineConfig) -> Self {
        let mut state = Self {
            categories: available_categories(&products),
            products,
            ..Self::default()
        };
        state.recompute(config);
        state
    }

    fn recompute(&mut self, config: &PipelineConfig) {
        self.items = project(&self.products, &self.query, config);
    }
}

/// Inputs to the product list reducer
#[derive(Debug, Clone, PartialEq)]
pub enum ProductListAction {
    /// The search box changed
    SetSearchText(String),
    /// A category chip was selected
    SetCategory(String),
    /// A sort option was selected
    SetSortKey(SortKey),
    /// Back to the default descriptor
    ResetQuery,
    /// A new raw collection replaced the previous one
    ProductsReplaced(Arc<[Product]>),
}

/// Product list reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductListReducer;

impl ProductListReducer {
    /// Create a new product list reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ProductListReducer {
    type State = ProductListState;
    type Action = ProductListAction;
    type Environment = PipelineConfig;

    fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment) {
        match action {
            ProductListAction::SetSearchText(text) => {
                if state.query.search_text == text {
                    return;
                }
                state.query.search_text = text;
            },
            ProductListAction::SetCategory(category) => {
                if state.query.category == category {
                    return;
                }
                state.query.category = category;
            },
            ProductListAction::SetSortKey(sort_key) => {
                if state.query.sort_key == sort_key {
                    return;
                }
                state.query.sort_key = sort_key;
            },
            ProductListAction::ResetQuery => {
                if state.query.is_default() {
                    return;
                }
                state.query = QueryDescriptor::default();
            },
            ProductListAction::ProductsReplaced(products) => {
                state.categories = available_categories(&products);
                state.products = products;
            },
        }

        state.recompute(env);
    }
}
