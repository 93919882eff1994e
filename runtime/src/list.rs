//! Product list model.
//!
//! Fetches the raw collection once through a [`RequestLifecycle`] and keeps
//! the visible list in sync with the user's query by dispatching
//! [`ProductListAction`]s to the pure [`ProductListReducer`]. Changing the
//! search text, category or sort never touches the network.

use crate::lifecycle::RequestLifecycle;
use catalog_core::environment::CatalogApi;
use catalog_core::reducer::Reducer;
use catalog_core::{
    ErrorInfo, PipelineConfig, Product, ProductListAction, ProductListReducer, ProductListState,
    QueryDescriptor, RequestState, SortKey,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Raw collection as published by the list lifecycle
type RawProducts = Arc<[Product]>;

/// Everything a list screen renders
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListView {
    /// Products after category filter, search and sort
    pub items: Vec<Product>,
    /// A fetch is running
    pub is_loading: bool,
    /// Why the last fetch failed
    pub error: Option<ErrorInfo>,
    /// `"all"` followed by the categories present in the raw collection
    pub categories: Vec<String>,
    /// Query the items were computed with
    pub query: QueryDescriptor,
}

/// The product list screen's model
pub struct ProductListModel {
    api: Arc<dyn CatalogApi>,
    lifecycle: RequestLifecycle<(), RawProducts>,
    updates: watch::Receiver<RequestState<RawProducts>>,
    state: ProductListState,
    reducer: ProductListReducer,
    config: PipelineConfig,
}

impl ProductListModel {
    /// Create a list model with the default pipeline configuration
    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self::with_config(api, PipelineConfig::default())
    }

    /// Create a list model with an explicit pipeline configuration
    #[must_use]
    pub fn with_config(api: Arc<dyn CatalogApi>, config: PipelineConfig) -> Self {
        let lifecycle = RequestLifecycle::new();
        let updates = lifecycle.subscribe();

        Self {
            api,
            lifecycle,
            updates,
            state: ProductListState::default(),
            reducer: ProductListReducer::new(),
            config,
        }
    }

    /// Fetch the raw collection, replacing any fetch in flight.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[tracing::instrument(skip_all)]
    pub fn load(&self) {
        tracing::debug!("Loading product list");

        let api = Arc::clone(&self.api);
        self.lifecycle.start((), move || async move {
            match api.fetch_products().await {
                Ok(page) => {
                    tracing::debug!(
                        count = page.products.len(),
                        total = page.total,
                        "Product list fetched"
                    );
                    Ok(RawProducts::from(page.products))
                },
                Err(error) => {
                    crate::log_failure("fetch_products", &"all", &error);
                    Err(error)
                },
            }
        });
    }

    /// Re-run the list fetch after a failure
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn retry(&self) {
        self.load();
    }

    /// Update the search text
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.send(ProductListAction::SetSearchText(text.into()));
    }

    /// Select a category, or [`ALL_CATEGORIES`](catalog_core::ALL_CATEGORIES)
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.send(ProductListAction::SetCategory(category.into()));
    }

    /// Select the sort order
    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        self.send(ProductListAction::SetSortKey(sort_key));
    }

    /// Clear search, category and sort back to their defaults
    pub fn reset_query(&mut self) {
        self.send(ProductListAction::ResetQuery);
    }

    /// Current query
    #[must_use]
    pub const fn query(&self) -> &QueryDescriptor {
        &self.state.query
    }

    /// Current view, including any fetch outcome published since the last
    /// call
    pub fn snapshot(&mut self) -> ProductListView {
        let request = self.absorb();

        ProductListView {
            items: self.state.items.clone(),
            is_loading: request.is_loading(),
            error: request.error().cloned(),
            categories: self.state.categories.clone(),
            query: self.state.query.clone(),
        }
    }

    /// Wait for the next lifecycle transition.
    ///
    /// Returns `false` once no further transitions can arrive.
    pub async fn changed(&mut self) -> bool {
        self.updates.changed().await.is_ok()
    }

    /// Stop the fetch in flight; its outcome will never be applied
    pub fn dispose(&self) {
        self.lifecycle.dispose();
    }

    fn send(&mut self, action: ProductListAction) {
        self.absorb();
        self.reducer.reduce(&mut self.state, action, &self.config);
    }

    /// Fold the latest published request state into the list state
    fn absorb(&mut self) -> RequestState<RawProducts> {
        let request = self.updates.borrow_and_update().clone();

        // A failed or running fetch has no data to show.
        let products = request
            .data()
            .map_or_else(|| RawProducts::from(Vec::new()), Arc::clone);

        let unchanged = Arc::ptr_eq(&products, &self.state.products)
            || (products.is_empty() && self.state.products.is_empty());
        if !unchanged {
            self.reducer.reduce(
                &mut self.state,
                ProductListAction::ProductsReplaced(products),
                &self.config,
            );
        }

        request
    }
}

impl std::fmt::Debug for ProductListModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductListModel")
            .field("lifecycle", &self.lifecycle)
            .field("query", &self.state.query)
            .field("items", &self.state.items.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
