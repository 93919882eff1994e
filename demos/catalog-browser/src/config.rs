//! Configuration for the catalog browser.
//!
//! Loads configuration from environment variables with sensible defaults.

use catalog_api::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_LIST_LIMIT};
use catalog_core::{PipelineConfig, SearchScope};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog API root (`CATALOG_API_URL`)
    pub api_url: String,
    /// Products requested by the list screen (`CATALOG_LIST_LIMIT`)
    pub list_limit: u32,
    /// Per-request timeout in seconds, none if unset (`CATALOG_TIMEOUT_SECS`)
    pub timeout_secs: Option<u64>,
    /// Search descriptions as well as titles (`CATALOG_SEARCH_DESCRIPTION`)
    pub search_description: bool,
    /// Fallback log filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            list_limit: DEFAULT_LIST_LIMIT,
            timeout_secs: None,
            search_description: false,
            log_filter: "catalog_browser=info,catalog_runtime=info,catalog_api=warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            api_url: lookup("CATALOG_API_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.api_url),
            list_limit: lookup("CATALOG_LIST_LIMIT")
                .and_then(|s| s.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.list_limit),
            timeout_secs: lookup("CATALOG_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0),
            search_description: lookup("CATALOG_SEARCH_DESCRIPTION")
                .is_some_and(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")),
            log_filter: defaults.log_filter,
        }
    }

    /// HTTP client settings
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::default()
            .with_base_url(self.api_url.clone())
            .with_list_limit(self.list_limit);

        match self.timeout_secs {
            Some(secs) => config.with_request_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// Query pipeline settings
    #[must_use]
    pub const fn pipeline_config(&self) -> PipelineConfig {
        let scope = if self.search_description {
            SearchScope::TitleAndDescription
        } else {
            SearchScope::Title
        };
        PipelineConfig {
            search_scope: scope,
        }
    }
}
