//! Catalog API client error types.

use std::sync::Arc;

use adsift_core::CatalogError;

/// Errors from the product catalog client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A credential required to build requests is not configured.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// Configured endpoint is not an http(s) URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Invalid search keyword.
    #[error("invalid keyword: {0}")]
    InvalidKeyword(String),

    /// Invalid item identifier list.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Authentication failed (invalid access key or partner tag).
    #[error("authentication failed: access key rejected")]
    AuthError,

    /// Rate limited by the catalog.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body is not valid catalog JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// Response parsed but carries no usable items.
    #[error("invalid catalog response{}", .0.as_deref().map(|m| format!(". {m}")).unwrap_or_default())]
    InvalidResponse(Option<String>),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ApiError::Timeout } else { ApiError::Network(Arc::new(err)) }
    }
}

impl From<ApiError> for CatalogError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthError
            | ApiError::RateLimited
            | ApiError::HttpError { .. }
            | ApiError::Timeout
            | ApiError::Network(_) => CatalogError::Transport(err.to_string()),
            ApiError::MissingCredential(_)
            | ApiError::InvalidEndpoint(_)
            | ApiError::InvalidKeyword(_)
            | ApiError::InvalidIdentifier(_)
            | ApiError::Parse(_)
            | ApiError::InvalidResponse(_) => CatalogError::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::InvalidKeyword("keyword cannot be empty".to_string());
        assert!(err.to_string().contains("invalid keyword"));

        let err = ApiError::InvalidResponse(Some("Code: AWS.InvalidParameterValue; Message: bad id".into()));
        assert_eq!(err.to_string(), "invalid catalog response. Code: AWS.InvalidParameterValue; Message: bad id");

        assert_eq!(ApiError::InvalidResponse(None).to_string(), "invalid catalog response");
    }

    #[test]
    fn test_transport_failures_map_to_transport() {
        for err in [ApiError::AuthError, ApiError::RateLimited, ApiError::HttpError { status: 503 }, ApiError::Timeout] {
            assert!(matches!(CatalogError::from(err), CatalogError::Transport(_)));
        }
    }

    #[test]
    fn test_rejections_map_to_validation() {
        let errors = [
            ApiError::MissingCredential("access_key".into()),
            ApiError::InvalidIdentifier("B00".into()),
            ApiError::Parse("expected value".into()),
            ApiError::InvalidResponse(None),
        ];
        for err in errors {
            assert!(matches!(CatalogError::from(err), CatalogError::Validation(_)));
        }
    }
}
