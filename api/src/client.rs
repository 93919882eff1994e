//! Catalog API client implementation

use crate::config::ClientConfig;
use catalog_core::environment::{ApiFuture, CatalogApi};
use catalog_core::{CatalogError, Product, ProductId, ProductPage};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Instant;

/// Catalog API client
#[derive(Clone, Debug)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    list_limit: u32,
}

/// One element of the categories response.
///
/// Older API versions return bare strings, newer ones return objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryEntry {
    Name(String),
    Detailed { slug: String },
}

impl CategoryEntry {
    fn into_slug(self) -> String {
        match self {
            Self::Name(name) => name,
            Self::Detailed { slug } => slug,
        }
    }
}

impl CatalogClient {
    /// Create a client for the public API with default settings
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Network` if the HTTP client cannot be built
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if `base_url` is not an absolute
    /// URL, or `CatalogError::Network` if the HTTP client cannot be built
    pub fn with_config(config: ClientConfig) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            CatalogError::Validation(format!("Invalid base URL {:?}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::Validation(format!(
                "Base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            list_limit: config.list_limit,
        })
    }

    /// API root this client talks to
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the full product collection
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, non-success statuses, or
    /// unparseable bodies
    #[tracing::instrument(skip(self), fields(limit = self.list_limit))]
    pub async fn products(&self) -> Result<ProductPage, CatalogError> {
        let mut url = self.endpoint(&["products"]);
        url.query_pairs_mut()
            .append_pair("limit", &self.list_limit.to_string());

        self.get_json("products", url, None).await
    }

    /// Search products by free text on the server
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` without sending a request when
    /// `query` is empty or whitespace, otherwise the same errors as
    /// [`products`](Self::products)
    #[tracing::instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<ProductPage, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::Validation(
                "Search text must not be empty".to_string(),
            ));
        }

        let mut url = self.endpoint(&["products", "search"]);
        url.query_pairs_mut().append_pair("q", query);

        self.get_json("search", url, None).await
    }

    /// Fetch the products of one category
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` without sending a request when
    /// `category` is empty, otherwise the same errors as
    /// [`products`](Self::products)
    #[tracing::instrument(skip(self))]
    pub async fn products_by_category(&self, category: &str) -> Result<ProductPage, CatalogError> {
        if category.trim().is_empty() {
            return Err(CatalogError::Validation(
                "Category must not be empty".to_string(),
            ));
        }

        let url = self.endpoint(&["products", "category", category]);

        self.get_json("category", url, None).await
    }

    /// Fetch the list of category slugs
    ///
    /// # Errors
    ///
    /// Same errors as [`products`](Self::products)
    #[tracing::instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let url = self.endpoint(&["products", "categories"]);
        let entries: Vec<CategoryEntry> = self.get_json("categories", url, None).await?;

        Ok(entries.into_iter().map(CategoryEntry::into_slug).collect())
    }

    /// Fetch a single product
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` on HTTP 404, otherwise the same
    /// errors as [`products`](Self::products)
    #[tracing::instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let url = self.endpoint(&["products", &id.to_string()]);

        self.get_json("product", url, Some(id)).await
    }

    /// Join path segments onto the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `with_config` rejected cannot-be-a-base URLs, so this always applies.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a GET request and decode the body, recording metrics
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: Url,
        product_id: Option<ProductId>,
    ) -> Result<T, CatalogError> {
        let started = Instant::now();
        let result = self.execute(url, product_id).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(error) => error.kind().as_str(),
        };
        metrics::counter!(
            "catalog.api.requests.total",
            "endpoint" => endpoint,
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!("catalog.api.request.duration_seconds", "endpoint" => endpoint)
            .record(started.elapsed().as_secs_f64());

        result
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        url: Url,
        product_id: Option<ProductId>,
    ) -> Result<T, CatalogError> {
        tracing::debug!(%url, "Sending catalog request");

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!(error = %e, timeout = e.is_timeout(), "Catalog request failed");
            CatalogError::Network(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = product_id {
                tracing::warn!(product_id = %id, "Product not found");
                return Err(CatalogError::NotFound { id });
            }
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Catalog returned error status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, body_len = body.len(), "Failed to decode catalog response");
            CatalogError::Decode(e.to_string())
        })
    }
}

impl CatalogApi for CatalogClient {
    fn fetch_products(&self) -> ApiFuture<'_, ProductPage> {
        Box::pin(self.products())
    }

    fn search_products(&self, query: &str) -> ApiFuture<'_, ProductPage> {
        let query = query.to_string();
        Box::pin(async move { self.search(&query).await })
    }

    fn fetch_products_by_category(&self, category: &str) -> ApiFuture<'_, ProductPage> {
        let category = category.to_string();
        Box::pin(async move { self.products_by_category(&category).await })
    }

    fn fetch_categories(&self) -> ApiFuture<'_, Vec<String>> {
        Box::pin(self.categories())
    }

    fn fetch_product_by_id(&self, id: ProductId) -> ApiFuture<'_, Product> {
        Box::pin(self.product(id))
    }
}
