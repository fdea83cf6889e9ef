//! Product catalog API client.
//!
//! Implements [`CatalogClient`] over the catalog's JSON endpoint.
//!
//! ### Specification
//!
//! - **Endpoint**: `https://webservices.amazon.{local_site}/onca/json`
//! - **Authentication**: access key and partner tag as query parameters.
//! - **Validation**: keywords and identifier lists are checked before any
//!   request leaves the process.
//! - **Verification**: a response counts only if at least one item has a
//!   title; otherwise the catalog's own error code and message are reported.
//! - **Normalization**: raw items become [`CatalogItem`]s.
//!
//! There is no retry or rate limiting here; the ad engine's cache is what
//! keeps request volume down.

pub mod error;
pub mod request;
pub mod response;

pub use error::ApiError;
pub use response::CatalogApiResponse;

use std::sync::Arc;
use std::time::{Duration, Instant};

use adsift_core::{AppConfig, CatalogClient, CatalogError, CatalogItem, CatalogRequest};
use reqwest::header;

/// Default catalog site.
const DEFAULT_LOCAL_SITE: &str = "de";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "mcp-ads/0.1";

/// Public endpoint for a catalog site.
pub fn endpoint_for(local_site: &str) -> String {
    format!("https://webservices.amazon.{local_site}/onca/json")
}

/// Catalog client configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub access_key: String,
    pub partner_tag: String,
    /// Catalog site suffix (default: de).
    pub local_site: String,
    /// Endpoint URL (default: derived from `local_site`).
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: mcp-ads/0.x).
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            partner_tag: String::new(),
            local_site: DEFAULT_LOCAL_SITE.to_string(),
            base_url: endpoint_for(DEFAULT_LOCAL_SITE),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Build the client configuration from application settings.
    ///
    /// Fails when the access key or partner tag is missing.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ApiError> {
        let access_key = config
            .require_access_key()
            .map_err(|e| ApiError::MissingCredential(e.to_string()))?;
        let partner_tag = config
            .require_partner_tag()
            .map_err(|e| ApiError::MissingCredential(e.to_string()))?;

        Ok(Self {
            access_key: access_key.to_string(),
            partner_tag: partner_tag.to_string(),
            local_site: config.local_site.clone(),
            base_url: config.base_url.clone().unwrap_or_else(|| endpoint_for(&config.local_site)),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// HTTP client for the product catalog.
#[derive(Debug, Clone)]
pub struct ProductApiClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl ProductApiClient {
    /// Create a new catalog client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self, ApiError> {
        if config.access_key.is_empty() {
            return Err(ApiError::MissingCredential("access_key".into()));
        }
        if config.partner_tag.is_empty() {
            return Err(ApiError::MissingCredential("partner_tag".into()));
        }

        let endpoint = url::Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {e}", config.base_url)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ApiError::InvalidEndpoint(format!("unsupported scheme '{}'", endpoint.scheme())));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Execute one lookup or search against the catalog.
    ///
    /// This method handles request validation, HTTP status mapping and
    /// response verification.
    pub async fn execute(&self, request: &CatalogRequest) -> Result<Vec<CatalogItem>, ApiError> {
        request::validate(request)?;

        let start = Instant::now();
        let params = request::query_params(request, &self.config.access_key, &self.config.partner_tag);

        tracing::debug!(operation = request.operation(), site = %self.config.local_site, "querying catalog");

        let http_response = self
            .http
            .get(&self.config.base_url)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .query(&params)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(%status, "catalog response status");

        if status == 401 || status == 403 {
            return Err(ApiError::AuthError);
        }

        if status == 429 {
            return Err(ApiError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(ApiError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let items = CatalogApiResponse::parse(&bytes)?.verify()?;

        tracing::debug!(
            operation = request.operation(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            items = items.len(),
            "catalog request completed"
        );

        Ok(items)
    }
}

#[async_trait::async_trait]
impl CatalogClient for ProductApiClient {
    async fn lookup(&self, request: &CatalogRequest) -> Result<Vec<CatalogItem>, CatalogError> {
        self.execute(request).await.map_err(CatalogError::from)
    }
}
