//! Client configuration

use std::time::Duration;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// Page size for the full-list request.
///
/// Large enough that categories late in the API's ordering are present in
/// the single page the list screen fetches.
pub const DEFAULT_LIST_LIMIT: u32 = 150;

/// Configuration for [`CatalogClient`](crate::CatalogClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, e.g. `https://dummyjson.com`
    pub base_url: String,
    /// `limit` query parameter of the full-list request
    pub list_limit: u32,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// `User-Agent` header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_limit: DEFAULT_LIST_LIMIT,
            request_timeout: None,
            user_agent: concat!("catalog-api/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Builder: Set base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder: Set list limit
    #[must_use]
    pub const fn with_list_limit(mut self, limit: u32) -> Self {
        self.list_limit = limit;
        self
    }

    /// Builder: Set request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builder: Set user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
