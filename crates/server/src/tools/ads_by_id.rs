//! ads_by_id tool implementation.
//!
//! Looks up ads for a known list of item identifiers.

use adsift_core::AdEngine;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{AdsOutput, engine_for, json_result};

/// Input parameters for the ads_by_id tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AdsByIdParams {
    /// Comma-separated item identifiers (10 characters each, at most 10).
    pub ids: String,

    /// Catalog response group; unknown names fall back to "Medium".
    #[serde(default = "default_response_group")]
    pub response_group: String,

    /// Serve image URLs from the TLS image host (default: server setting).
    /// Set this when the page embedding the ads is served over HTTPS.
    #[serde(default)]
    pub secure_images: Option<bool>,
}

fn default_response_group() -> String {
    "Medium".into()
}

/// Implementation of the ads_by_id tool.
pub async fn by_id_impl(engine: &AdEngine, params: AdsByIdParams) -> Result<CallToolResult, McpError> {
    let result = engine_for(engine, params.secure_images)
        .get_by_identifier(&params.ids, &params.response_group)
        .await;
    tracing::debug!(ids = %params.ids, items = result.len(), "ads_by_id");
    json_result(&AdsOutput::from(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{engine, output};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_lookup_returns_items() {
        let (engine, catalog, _) = engine(vec!["A Night at the Opera"]).await;
        let params: AdsByIdParams = serde_json::from_str(r#"{"ids": "B000000001"}"#).unwrap();
        assert_eq!(params.response_group, "Medium");

        let result = by_id_impl(&engine, params).await.unwrap();
        let out: AdsOutput = output(&result);

        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].title, "A Night at the Opera (B000000001)");
        assert!(out.cache_date.is_some());
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_ids_is_empty_result_not_error() {
        let (engine, catalog, _) = engine(vec!["unused"]).await;
        let params = AdsByIdParams { ids: " ".into(), response_group: "Medium".into(), secure_images: None };

        let result = by_id_impl(&engine, params).await.unwrap();
        let out: AdsOutput = output(&result);

        assert!(out.items.is_empty());
        assert!(out.cache_date.is_none());
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_secure_images_per_call() {
        let (engine, catalog, _) = engine(vec!["A Night at the Opera"]).await;
        let params: AdsByIdParams =
            serde_json::from_str(r#"{"ids": "B000000001", "secure_images": true}"#).unwrap();

        let secure: AdsOutput = output(&by_id_impl(&engine, params).await.unwrap());
        assert_eq!(secure.items[0].image_url, "https://images-na.ssl-images-amazon.com/images/I/x.jpg");

        // Same cache entry, default host.
        let params: AdsByIdParams = serde_json::from_str(r#"{"ids": "B000000001"}"#).unwrap();
        let plain: AdsOutput = output(&by_id_impl(&engine, params).await.unwrap());
        assert_eq!(plain.items[0].image_url, "http://ecx.images-amazon.com/images/I/x.jpg");
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
        assert!(!engine.secure_images());
    }
}
