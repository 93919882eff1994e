//! Product detail model.

use crate::lifecycle::RequestLifecycle;
use catalog_core::environment::CatalogApi;
use catalog_core::{ErrorInfo, Product, ProductId, RequestState};
use std::sync::Arc;
use tokio::sync::watch;

/// Everything a detail screen renders
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetailView {
    /// The product, once loaded
    pub product: Option<Product>,
    /// A fetch is running
    pub is_loading: bool,
    /// Why the last fetch failed; check [`ErrorInfo::is_not_found`] to tell
    /// a missing product from a network failure
    pub error: Option<ErrorInfo>,
}

/// The product detail screen's model.
///
/// Shows one product at a time. Switching to another id cancels the fetch
/// for the previous one.
pub struct ProductDetailModel {
    api: Arc<dyn CatalogApi>,
    lifecycle: RequestLifecycle<ProductId, Product>,
    updates: watch::Receiver<RequestState<Product>>,
    current: Option<ProductId>,
}

impl ProductDetailModel {
    /// Create an empty detail model
    #[must_use]
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        let lifecycle = RequestLifecycle::new();
        let updates = lifecycle.subscribe();

        Self {
            api,
            lifecycle,
            updates,
            current: None,
        }
    }

    /// Show product `id`.
    ///
    /// Does nothing if `id` is already loaded or loading.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn show(&mut self, id: ProductId) {
        if self.current == Some(id) {
            let loaded = self.updates.borrow().data().is_some();
            if loaded || self.lifecycle.is_in_flight() {
                return;
            }
        }

        self.current = Some(id);
        self.fetch(id);
    }

    /// Show the product named by a route parameter.
    ///
    /// An id that is not a positive integer fails immediately with a
    /// validation error and no request is made.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn show_raw(&mut self, raw: &str) {
        match raw.parse::<ProductId>() {
            Ok(id) => self.show(id),
            Err(error) => {
                crate::log_failure("parse_product_id", &raw, &error);
                self.current = None;
                self.lifecycle.reject(error);
            },
        }
    }

    /// Fetch the current product again
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn retry(&self) {
        if let Some(id) = self.current {
            self.fetch(id);
        }
    }

    /// Id of the product being shown
    #[must_use]
    pub const fn current_id(&self) -> Option<ProductId> {
        self.current
    }

    /// Current view
    pub fn snapshot(&mut self) -> ProductDetailView {
        let request = self.updates.borrow_and_update();

        ProductDetailView {
            product: request.data().cloned(),
            is_loading: request.is_loading(),
            error: request.error().cloned(),
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

    #[tracing::instrument(skip_all, fields(product_id = %id))]
    fn fetch(&self, id: ProductId) {
        tracing::debug!("Loading product");

        let api = Arc::clone(&self.api);
        self.lifecycle.start(id, move || async move {
            api.fetch_product_by_id(id)
                .await
                .inspect_err(|error| crate::log_failure("fetch_product_by_id", &id, error))
        });
    }
}

impl std::fmt::Debug for ProductDetailModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductDetailModel")
            .field("current", &self.current)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}
