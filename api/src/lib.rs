//! # Catalog API Client
//!
//! HTTP client for the remote product catalog REST API, implementing
//! [`CatalogApi`](catalog_core::environment::CatalogApi).
//!
//! ## Example
//!
//! ```no_run
//! use catalog_api::{CatalogClient, ClientConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::with_config(
//!         ClientConfig::default().with_request_timeout(Duration::from_secs(10)),
//!     )?;
//!
//!     let page = client.products().await?;
//!     println!("{} of {} products", page.products.len(), page.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Error mapping
//!
//! - transport failures and timeouts → `CatalogError::Network`
//! - non-2xx → `CatalogError::Status` (404 on `/products/{id}` → `NotFound`)
//! - unparseable body → `CatalogError::Decode`
//! - empty search text / category → `CatalogError::Validation`, no request sent

pub mod client;
pub mod config;

// Re-export main types for convenience
pub use client::CatalogClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_LIST_LIMIT};
