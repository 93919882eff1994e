//! # Catalog Runtime
//!
//! Async execution for the product catalog client.
//!
//! This crate owns the only side effect in the system, the network fetch.
//! Everything else (query changes, request state transitions) runs through
//! the pure reducers in `catalog-core`.
//!
//! ## Core Components
//!
//! - **`RequestLifecycle`**: One cancellable in-flight fetch with observable
//!   `Idle | Loading | Loaded | Failed` state
//! - **`ProductListModel`**: Fetches the collection once and projects it
//!   through the query pipeline on every query change
//! - **`ProductDetailModel`**: Fetches one product by id
//!
//! ## Example
//!
//! ```ignore
//! use catalog_runtime::ProductListModel;
//!
//! let mut list = ProductListModel::new(api);
//! list.load();
//!
//! while list.snapshot().is_loading {
//!     list.changed().await;
//! }
//!
//! list.set_category("smartphones");
//! list.set_sort_key(SortKey::PriceDesc);
//! for product in list.snapshot().items {
//!     println!("{} {}", product.title, product.price_or_zero());
//! }
//! ```

use catalog_core::{CatalogError, ErrorKind};
use std::fmt::Display;

pub mod detail;
pub mod lifecycle;
pub mod list;

pub use detail::{ProductDetailModel, ProductDetailView};
pub use lifecycle::RequestLifecycle;
pub use list::{ProductListModel, ProductListView};

/// Log a failed catalog operation before it is normalized for display.
///
/// Malformed responses are logged as errors since they point at an API
/// contract change.
pub(crate) fn log_failure(operation: &'static str, key: &dyn Display, error: &CatalogError) {
    let kind = error.kind();
    if kind == ErrorKind::Decode {
        tracing::error!(operation, key = %key, kind = %kind, error = %error, "Catalog operation failed");
    } else {
        tracing::warn!(operation, key = %key, kind = %kind, error = %error, "Catalog operation failed");
    }
}
