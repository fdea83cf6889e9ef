//! ads_by_keyword tool implementation.
//!
//! Searches one category for a keyword string.

use adsift_core::AdEngine;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{AdsOutput, engine_for, json_result, search_options};

/// Input parameters for the ads_by_keyword tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AdsByKeywordParams {
    /// Keyword string, searched as-is.
    pub keyword: String,

    /// Catalog search index, e.g. "Music", "DVD" or "VideoGames".
    pub category: String,

    /// Maximum number of ads (default 3); 0 or less returns all.
    #[serde(default)]
    pub limit: Option<i64>,

    /// Title similarity in percent above which ads are duplicates (default 90); 0 disables.
    #[serde(default)]
    pub similarity: Option<f64>,

    /// Serve image URLs from the TLS image host (default: server setting).
    /// Set this when the page embedding the ads is served over HTTPS.
    #[serde(default)]
    pub secure_images: Option<bool>,
}

/// Implementation of the ads_by_keyword tool.
pub async fn by_keyword_impl(engine: &AdEngine, params: AdsByKeywordParams) -> Result<CallToolResult, McpError> {
    let options = search_options(params.limit, params.similarity);
    let result = engine_for(engine, params.secure_images)
        .get_by_keyword(&params.keyword, &params.category, options)
        .await;
    json_result(&AdsOutput::from(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{engine, output};

    #[tokio::test]
    async fn test_default_limit_applies() {
        let (engine, _, _) = engine(vec!["Alpha", "Bravo", "Charlie", "Delta", "Echo"]).await;
        let params: AdsByKeywordParams =
            serde_json::from_str(r#"{"keyword": "matrix", "category": "DVD"}"#).unwrap();

        let out: AdsOutput = output(&by_keyword_impl(&engine, params).await.unwrap());
        assert_eq!(out.items.len(), 3);
    }

    #[tokio::test]
    async fn test_zero_limit_returns_everything_in_order() {
        let (engine, _, _) = engine(vec!["Alpha", "Bravo", "Charlie", "Delta", "Echo"]).await;
        let params = AdsByKeywordParams {
            keyword: "matrix".into(),
            category: "DVD".into(),
            limit: Some(0),
            similarity: Some(0.0),
            secure_images: None,
        };

        let out: AdsOutput = output(&by_keyword_impl(&engine, params).await.unwrap());
        let titles: Vec<_> = out.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Alpha (DVD/matrix)",
                "Bravo (DVD/matrix)",
                "Charlie (DVD/matrix)",
                "Delta (DVD/matrix)",
                "Echo (DVD/matrix)"
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_keyword_is_empty_result() {
        let (engine, _, _) = engine(vec!["Alpha"]).await;
        let params = AdsByKeywordParams {
            keyword: String::new(),
            category: "DVD".into(),
            limit: None,
            similarity: None,
            secure_images: None,
        };

        let out: AdsOutput = output(&by_keyword_impl(&engine, params).await.unwrap());
        assert!(out.items.is_empty());
    }

    #[tokio::test]
    async fn test_caller_can_turn_secure_images_off() {
        let (engine, _, _) = engine(vec!["Alpha"]).await;
        let engine = engine.as_ref().clone().with_secure_images(true);

        let params: AdsByKeywordParams =
            serde_json::from_str(r#"{"keyword": "matrix", "category": "DVD"}"#).unwrap();
        let secure: AdsOutput = output(&by_keyword_impl(&engine, params).await.unwrap());
        assert!(secure.items[0].image_url.starts_with("https://images-na.ssl-images-amazon.com/"));

        let params: AdsByKeywordParams =
            serde_json::from_str(r#"{"keyword": "matrix", "category": "DVD", "secure_images": false}"#).unwrap();
        let plain: AdsOutput = output(&by_keyword_impl(&engine, params).await.unwrap());
        assert!(plain.items[0].image_url.starts_with("http://ecx.images-amazon.com/"));
    }
}
