//! In-memory catalog API for tests
//!
//! [`MockCatalogApi`] serves a fixed product collection the way the real
//! API would, and lets a test script the awkward cases:
//! - [`fail_next`](MockCatalogApi::fail_next): make the next matching call fail
//! - [`hold`](MockCatalogApi::hold): keep the next matching call pending until
//!   its [`Gate`] is released
//! - [`calls`](MockCatalogApi::calls): every call made, in order

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use catalog_core::environment::{ApiFuture, CatalogApi};
use catalog_core::{CatalogError, Product, ProductId, ProductPage};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// One call made against [`MockCatalogApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `fetch_products`
    Products,
    /// `search_products` with its query
    Search(String),
    /// `fetch_products_by_category` with its category
    Category(String),
    /// `fetch_categories`
    Categories,
    /// `fetch_product_by_id` with its id
    Product(ProductId),
}

/// Holds a pending call until released
#[derive(Debug, Clone)]
pub struct Gate {
    permits: Arc<Semaphore>,
}

impl Gate {
    fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(0)),
        }
    }

    /// Let the held call complete. Releasing before the call reaches the
    /// gate is fine; it will pass straight through.
    pub fn release(&self) {
        self.permits.add_permits(1);
    }

    async fn pass(&self) {
        // The semaphore is never closed, so acquire cannot fail.
        if let Ok(permit) = self.permits.acquire().await {
            drop(permit);
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    products: Vec<Product>,
    failures: Vec<(ApiCall, CatalogError)>,
    gates: Vec<(ApiCall, Gate)>,
    calls: Vec<ApiCall>,
}

/// Scripted, in-memory [`CatalogApi`]
///
/// # Example
///
/// ```
/// use catalog_core::environment::CatalogApi;
/// use catalog_core::{CatalogError, ProductId};
/// use catalog_testing::{ApiCall, MockCatalogApi, sample_products};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let api = MockCatalogApi::with_products(sample_products());
/// api.fail_next(ApiCall::Product(ProductId::new(1)), CatalogError::Network("offline".into()));
///
/// assert!(api.fetch_product_by_id(ProductId::new(1)).await.is_err());
/// assert!(api.fetch_product_by_id(ProductId::new(1)).await.is_ok());
/// assert_eq!(api.call_count(), 2);
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct MockCatalogApi {
    state: Arc<Mutex<MockState>>,
}

impl MockCatalogApi {
    /// Create an API with an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an API serving `products`
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        let api = Self::new();
        api.state.lock().unwrap().products = products;
        api
    }

    /// Replace the served catalog
    pub fn set_products(&self, products: Vec<Product>) {
        self.state.lock().unwrap().products = products;
    }

    /// Fail the next call matching `call` with `error`
    pub fn fail_next(&self, call: ApiCall, error: CatalogError) {
        self.state.lock().unwrap().failures.push((call, error));
    }

    /// Hold the next call matching `call` until the returned gate is
    /// released
    #[must_use]
    pub fn hold(&self, call: ApiCall) -> Gate {
        let gate = Gate::new();
        self.state.lock().unwrap().gates.push((call, gate.clone()));
        gate
    }

    /// Every call made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of calls made so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Record the call and resolve its outcome now; only the gate is
    /// awaited later.
    fn respond<T, F>(&self, call: ApiCall, serve: F) -> ApiFuture<'_, T>
    where
        T: Send + 'static,
        F: FnOnce(&[Product]) -> Result<T, CatalogError>,
    {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());

        let gate = take_matching(&mut state.gates, &call);
        let outcome = match take_matching(&mut state.failures, &call) {
            Some(error) => Err(error),
            None => serve(&state.products),
        };
        drop(state);

        Box::pin(async move {
            if let Some(gate) = gate {
                gate.pass().await;
            }
            outcome
        })
    }
}

fn take_matching<V>(scripted: &mut Vec<(ApiCall, V)>, call: &ApiCall) -> Option<V> {
    let index = scripted.iter().position(|(c, _)| c == call)?;
    Some(scripted.remove(index).1)
}

fn page(products: Vec<Product>) -> ProductPage {
    let count = products.len() as u64;
    ProductPage {
        products,
        total: count,
        skip: 0,
        limit: count,
    }
}

impl CatalogApi for MockCatalogApi {
    fn fetch_products(&self) -> ApiFuture<'_, ProductPage> {
        self.respond(ApiCall::Products, |products| Ok(page(products.to_vec())))
    }

    fn search_products(&self, query: &str) -> ApiFuture<'_, ProductPage> {
        let needle = query.trim().to_lowercase();
        self.respond(ApiCall::Search(query.to_string()), move |products| {
            if needle.is_empty() {
                return Err(CatalogError::Validation(
                    "Search text must not be empty".to_string(),
                ));
            }
            Ok(page(
                products
                    .iter()
                    .filter(|p| p.title.to_lowercase().contains(&needle))
                    .cloned()
                    .collect(),
            ))
        })
    }

    fn fetch_products_by_category(&self, category: &str) -> ApiFuture<'_, ProductPage> {
        let category = category.to_string();
        self.respond(ApiCall::Category(category.clone()), move |products| {
            if category.trim().is_empty() {
                return Err(CatalogError::Validation(
                    "Category must not be empty".to_string(),
                ));
            }
            Ok(page(
                products
                    .iter()
                    .filter(|p| p.category == category)
                    .cloned()
                    .collect(),
            ))
        })
    }

    fn fetch_categories(&self) -> ApiFuture<'_, Vec<String>> {
        self.respond(ApiCall::Categories, |products| {
            let mut categories: Vec<String> = Vec::new();
            for product in products {
                if !categories.contains(&product.category) {
                    categories.push(product.category.clone());
                }
            }
            Ok(categories)
        })
    }

    fn fetch_product_by_id(&self, id: ProductId) -> ApiFuture<'_, Product> {
        self.respond(ApiCall::Product(id), move |products| {
            products
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or(CatalogError::NotFound { id })
        })
    }
}
