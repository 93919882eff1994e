//! # Catalog Core
//!
//! Core types and pure logic for the product catalog client.
//!
//! This crate has no I/O. It defines the data model returned by the catalog
//! API, the user-controlled query descriptor, the deterministic query
//! pipeline that turns a raw collection into the visible list, and the
//! request state machine used by the runtime's lifecycle manager.
//!
//! ## Core Concepts
//!
//! - **Product**: One catalog item, immutable once fetched
//! - **`QueryDescriptor`**: Search text, category and sort selection
//! - **Pipeline**: Pure `(products, query) → products` projection
//! - **`RequestState`**: `Idle | Loading | Loaded | Failed` for one fetch
//! - **`ProductListState`**: Query plus the projected items of the list screen
//! - **Reducer**: Pure function `(State, Action, Environment) → State`
//! - **Environment**: Injected dependencies via traits (`CatalogApi`)
//!
//! ## Example
//!
//! ```
//! use catalog_core::pipeline::{project, PipelineConfig};
//! use catalog_core::query::{QueryDescriptor, SortKey};
//! use catalog_core::product::{Product, ProductId};
//!
//! let raw = vec![
//!     Product::new(ProductId::new(1), "iPhone 9", "smartphones").with_price(549.0),
//!     Product::new(ProductId::new(2), "Samsung Universe 9", "smartphones").with_price(1249.0),
//!     Product::new(ProductId::new(3), "Red Lipstick", "beauty").with_price(12.0),
//! ];
//!
//! let query = QueryDescriptor::default()
//!     .with_category("smartphones")
//!     .with_sort_key(SortKey::PriceDesc);
//!
//! let visible = project(&raw, &query, &PipelineConfig::default());
//! let ids: Vec<u64> = visible.iter().map(|p| p.id.get()).collect();
//! assert_eq!(ids, vec![2, 1]);
//! ```

pub mod error;
pub mod list;
pub mod pipeline;
pub mod product;
pub mod query;
pub mod request;

pub use error::{CatalogError, ErrorInfo, ErrorKind};
pub use list::{ProductListAction, ProductListReducer, ProductListState};
pub use pipeline::{PipelineConfig, SearchScope, TitleCollator};
pub use product::{Product, ProductId, ProductPage, Review};
pub use query::{ALL_CATEGORIES, QueryDescriptor, SortKey};
pub use request::{RequestAction, RequestReducer, RequestState};

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → State`.
/// They hold every state transition in this crate (request lifecycle,
/// product list query changes) and are deterministic and testable without
/// a runtime. The only side effect in the system, the network fetch, is
/// owned by the runtime and feeds its outcome back in as an action.
pub mod reducer {
    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected configuration this reducer needs
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_core::reducer::Reducer;
    /// use catalog_core::{PipelineConfig, ProductListAction, ProductListReducer, ProductListState, SortKey};
    ///
    /// let reducer = ProductListReducer::new();
    /// let mut state = ProductListState::default();
    ///
    /// reducer.reduce(
    ///     &mut state,
    ///     ProductListAction::SetSortKey(SortKey::PriceAsc),
    ///     &PipelineConfig::default(),
    /// );
    /// assert_eq!(state.query.sort_key, SortKey::PriceAsc);
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into an in-place state change
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        fn reduce(&self, state: &mut Self::State, action: Self::Action, env: &Self::Environment);
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// into the runtime models. The catalog API is the only one.
pub mod environment {
    use crate::error::CatalogError;
    use crate::product::{Product, ProductId, ProductPage};
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future returned by [`CatalogApi`] methods
    pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CatalogError>> + Send + 'a>>;

    /// The remote catalog API, consumed but not implemented by this system.
    ///
    /// # Implementations
    ///
    /// - `CatalogClient` (in `catalog-api`): HTTP implementation
    /// - `MockCatalogApi` (in `catalog-testing`): scripted, in-memory
    ///
    /// # Dyn Compatibility
    ///
    /// Methods return explicit `Pin<Box<dyn Future>>` instead of `async fn`
    /// so the API can be held as `Arc<dyn CatalogApi>` by the models and
    /// captured by spawned fetches.
    pub trait CatalogApi: Send + Sync {
        /// Fetch the full product collection (`GET /products?limit=N`).
        fn fetch_products(&self) -> ApiFuture<'_, ProductPage>;

        /// Server-side search (`GET /products/search?q=..`).
        ///
        /// Empty or whitespace-only `query` fails with
        /// [`CatalogError::Validation`] before any request is made.
        fn search_products(&self, query: &str) -> ApiFuture<'_, ProductPage>;

        /// Products in one category (`GET /products/category/{name}`).
        ///
        /// Empty `category` fails with [`CatalogError::Validation`].
        fn fetch_products_by_category(&self, category: &str) -> ApiFuture<'_, ProductPage>;

        /// Category names (`GET /products/categories`).
        fn fetch_categories(&self) -> ApiFuture<'_, Vec<String>>;

        /// A single product (`GET /products/{id}`).
        ///
        /// HTTP 404 maps to [`CatalogError::NotFound`].
        fn fetch_product_by_id(&self, id: ProductId) -> ApiFuture<'_, Product>;
    }
}
