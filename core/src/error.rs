//! Error taxonomy for catalog operations.
//!
//! [`CatalogError`] is what the API collaborator returns. [`ErrorInfo`] is the
//! normalized, UI-safe shape the lifecycle manager exposes: presentation code
//! only ever sees `ErrorInfo`, never a raw transport error.

use crate::product::ProductId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Transport-level failure (offline, DNS, connection refused, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("HTTP error (status {status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The single-product endpoint answered 404.
    #[error("Product {id} not found")]
    NotFound {
        /// The id that was requested
        id: ProductId,
    },

    /// The response body could not be parsed into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Caller-supplied input was rejected before any request was made.
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl CatalogError {
    /// HTTP status associated with this error, when there is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Network(_) | Self::Decode(_) | Self::Validation(_) => None,
        }
    }

    /// The [`ErrorKind`] this error normalizes to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Status { .. } => ErrorKind::HttpStatus,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }
}

/// Category of a normalized failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Transport failure
    Network,
    /// Non-success HTTP status
    HttpStatus,
    /// 404 on a single-product lookup
    NotFound,
    /// Unparseable response
    Decode,
    /// Rejected caller input
    Validation,
}

impl ErrorKind {
    /// Stable snake_case name, used for log fields and metric labels
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::HttpStatus => "http_status",
            Self::NotFound => "not_found",
            Self::Decode => "decode",
            Self::Validation => "validation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized, UI-safe description of a failure.
///
/// `message` is copy a screen can show as-is. `detail` keeps the upstream
/// error text for diagnostics and `status` keeps the HTTP status when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// What went wrong, by category
    pub kind: ErrorKind,
    /// Human-readable message for display
    pub message: String,
    /// Upstream failure detail, for logs
    pub detail: String,
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
}

impl ErrorInfo {
    /// Create an error info with an explicit kind and message
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind,
            detail: message.clone(),
            message,
            status: None,
        }
    }

    /// Builder: Set upstream detail
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Builder: Set HTTP status
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether this is the "product not found" refinement
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<CatalogError> for ErrorInfo {
    fn from(error: CatalogError) -> Self {
        let message = match &error {
            CatalogError::Network(_) => {
                "Could not reach the catalog. Please check your connection and try again.".to_string()
            },
            CatalogError::Status { status, .. } => {
                format!("The catalog service returned an error (HTTP {status}).")
            },
            CatalogError::NotFound { .. } => "Product not found.".to_string(),
            CatalogError::Decode(_) => "The catalog returned data we could not read.".to_string(),
            CatalogError::Validation(reason) => reason.clone(),
        };

        Self {
            kind: error.kind(),
            message,
            detail: error.to_string(),
            status: error.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct_from_network() {
        let not_found = ErrorInfo::from(CatalogError::NotFound {
            id: ProductId::new(7),
        });
        let network = ErrorInfo::from(CatalogError::Network("timed out".to_string()));

        assert_eq!(not_found.kind, ErrorKind::NotFound);
        assert_eq!(not_found.status, Some(404));
        assert!(not_found.is_not_found());

        assert_eq!(network.kind, ErrorKind::Network);
        assert_eq!(network.status, None);
        assert!(network.message.contains("connection"));
        assert!(network.detail.contains("timed out"));
    }

    #[test]
    fn test_status_is_preserved() {
        let info = ErrorInfo::from(CatalogError::Status {
            status: 503,
            body: "maintenance".to_string(),
        });

        assert_eq!(info.kind, ErrorKind::HttpStatus);
        assert_eq!(info.status, Some(503));
        assert!(info.message.contains("503"));
        assert!(info.detail.contains("maintenance"));
    }

    #[test]
    fn test_validation_message_is_shown_verbatim() {
        let info = ErrorInfo::from(CatalogError::Validation(
            "Search text must not be empty".to_string(),
        ));

        assert_eq!(info.kind, ErrorKind::Validation);
        assert_eq!(info.message, "Search text must not be empty");
    }

    #[test]
    fn test_builder() {
        let info = ErrorInfo::new(ErrorKind::Decode, "bad body")
            .with_detail("expected value at line 1 column 1")
            .with_status(200);

        assert_eq!(info.message, "bad body");
        assert_eq!(info.detail, "expected value at line 1 column 1");
        assert_eq!(info.status, Some(200));
        assert_eq!(info.to_string(), "bad body");
    }
}
