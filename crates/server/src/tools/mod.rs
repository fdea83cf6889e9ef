//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-ads server.

pub mod ads_by_id;
pub mod ads_by_keyword;
pub mod ads_by_keyword_multi;
pub mod cache;

use std::borrow::Cow;

use adsift_core::ads::{DEFAULT_LIMIT, DEFAULT_SIMILARITY};
use adsift_core::{AdEngine, Error, ItemRecord, ResultSet, SearchOptions};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use ads_by_id::{AdsByIdParams, by_id_impl};
pub use ads_by_keyword::{AdsByKeywordParams, by_keyword_impl};
pub use ads_by_keyword_multi::{AdsByKeywordMultiParams, by_keyword_multi_impl};

/// Output shared by the ad tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AdsOutput {
    /// RFC 3339 time of the oldest contributing fetch; null when nothing was fetched.
    pub cache_date: Option<String>,
    /// Ads in display order.
    pub items: Vec<ItemRecord>,
}

impl From<ResultSet> for AdsOutput {
    fn from(result: ResultSet) -> Self {
        Self { cache_date: result.cache_date.map(|d| d.to_rfc3339()), items: result.items }
    }
}

/// Limit and similarity as given by a caller; absent values take the defaults.
fn search_options(limit: Option<i64>, similarity: Option<f64>) -> SearchOptions {
    SearchOptions::new(limit.unwrap_or(DEFAULT_LIMIT as i64), similarity.unwrap_or(DEFAULT_SIMILARITY))
}

/// The engine as seen by one call: `secure_images` overrides the configured
/// image host choice when given.
fn engine_for(engine: &AdEngine, secure_images: Option<bool>) -> Cow<'_, AdEngine> {
    match secure_images {
        Some(secure) if secure != engine.secure_images() => Cow::Owned(engine.clone().with_secure_images(secure)),
        _ => Cow::Borrowed(engine),
    }
}

/// Serialize a tool output as pretty JSON text content.
fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(Error::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use adsift_core::{AdEngine, CacheDb, CatalogClient, CatalogError, CatalogItem, CatalogRequest};
    use rmcp::model::CallToolResult;

    /// Catalog answering every request with the same titled items.
    pub struct FixedCatalog {
        pub titles: Vec<&'static str>,
        pub calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CatalogClient for FixedCatalog {
        async fn lookup(&self, request: &CatalogRequest) -> Result<Vec<CatalogItem>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let tag = match request {
                CatalogRequest::ItemLookup { ids, .. } => ids.clone(),
                CatalogRequest::UpcLookup { upc, .. } => upc.clone(),
                CatalogRequest::ItemSearch { search_index, keywords, .. }
                | CatalogRequest::TitleSearch { search_index, title: keywords } => format!("{search_index}/{keywords}"),
            };
            Ok(self
                .titles
                .iter()
                .map(|title| CatalogItem {
                    title: Some(format!("{title} ({tag})")),
                    detail_page_url: Some(format!("https://shop.example/{tag}")),
                    small_image_url: Some("http://ecx.images-amazon.com/images/I/x.jpg".into()),
                    formatted_price: Some("EUR 1,00".into()),
                })
                .collect())
        }
    }

    pub async fn engine(titles: Vec<&'static str>) -> (Arc<AdEngine>, Arc<FixedCatalog>, Arc<CacheDb>) {
        let catalog = Arc::new(FixedCatalog { titles, calls: AtomicUsize::new(0) });
        let cache = Arc::new(CacheDb::open_in_memory().await.unwrap());
        (Arc::new(AdEngine::new(catalog.clone(), cache.clone())), catalog, cache)
    }

    /// Parse the JSON text content of a tool result.
    pub fn output<T: serde::de::DeserializeOwned>(result: &CallToolResult) -> T {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_output_from_result_set() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let output = AdsOutput::from(ResultSet::new(date, Vec::new()));
        assert_eq!(output.cache_date.as_deref(), Some("2024-03-01T12:00:00+00:00"));

        let output = AdsOutput::from(ResultSet::empty());
        assert!(output.cache_date.is_none());
        assert_eq!(serde_json::to_value(&output).unwrap()["cache_date"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_engine_for_overrides_secure_images() {
        let (engine, _, _) = testing::engine(vec![]).await;
        assert!(!engine_for(&engine, None).secure_images());
        assert!(matches!(engine_for(&engine, Some(false)), Cow::Borrowed(_)));
        assert!(engine_for(&engine, Some(true)).secure_images());

        let secure = engine.as_ref().clone().with_secure_images(true);
        assert!(engine_for(&secure, None).secure_images());
        assert!(!engine_for(&secure, Some(false)).secure_images());
    }

    #[test]
    fn test_search_options_defaults_and_clamping() {
        assert_eq!(search_options(None, None), SearchOptions::default());
        assert_eq!(search_options(Some(-1), Some(0.0)), SearchOptions { limit: 0, similarity: 0.0 });
        assert_eq!(search_options(Some(7), None).limit, 7);
    }
}
