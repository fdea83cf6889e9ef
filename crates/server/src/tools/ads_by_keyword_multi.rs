//! ads_by_keyword_multi tool implementation.
//!
//! Expands a keyword expression across several categories and merges the
//! results into one deduplicated, sampled list.

use adsift_core::AdEngine;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{AdsOutput, engine_for, json_result, search_options};

/// Input parameters for the ads_by_keyword_multi tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AdsByKeywordMultiParams {
    /// Keyword expression. Terms prefixed with "+" are required in every
    /// search; each other term yields its own search, e.g.
    /// "+queen live bootleg" searches "queen live" and "queen bootleg".
    pub expression: String,

    /// Comma-separated catalog search indexes, e.g. "Music,DVD".
    pub categories: String,

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

/// Implementation of the ads_by_keyword_multi tool.
pub async fn by_keyword_multi_impl(
    engine: &AdEngine, params: AdsByKeywordMultiParams,
) -> Result<CallToolResult, McpError> {
    let options = search_options(params.limit, params.similarity);
    let result = engine_for(engine, params.secure_images)
        .get_by_keyword_multi(&params.expression, &params.categories, options)
        .await;
    json_result(&AdsOutput::from(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{engine, output};
    use std::sync::atomic::Ordering;

    fn params(expression: &str, categories: &str) -> AdsByKeywordMultiParams {
        AdsByKeywordMultiParams {
            expression: expression.into(),
            categories: categories.into(),
            limit: Some(0),
            similarity: Some(0.0),
            secure_images: None,
        }
    }

    #[tokio::test]
    async fn test_expands_categories_and_terms() {
        let (engine, catalog, _) = engine(vec!["Hit"]).await;

        let out: AdsOutput = output(
            &by_keyword_multi_impl(&engine, params("+queen live bootleg", "Music, DVD"))
                .await
                .unwrap(),
        );

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 4);
        let titles: Vec<_> = out.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Hit (Music/queen live)",
                "Hit (Music/queen bootleg)",
                "Hit (DVD/queen live)",
                "Hit (DVD/queen bootleg)"
            ]
        );
    }

    #[tokio::test]
    async fn test_repeat_call_uses_cache() {
        let (engine, catalog, _) = engine(vec!["Hit"]).await;

        let first: AdsOutput =
            output(&by_keyword_multi_impl(&engine, params("queen", "Music,DVD")).await.unwrap());
        let second: AdsOutput =
            output(&by_keyword_multi_impl(&engine, params("queen", "Music,DVD")).await.unwrap());

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
        assert_eq!(first.items, second.items);
        assert_eq!(first.cache_date, second.cache_date);
    }

    #[tokio::test]
    async fn test_empty_categories_is_empty_result() {
        let (engine, catalog, _) = engine(vec!["Hit"]).await;

        let out: AdsOutput = output(&by_keyword_multi_impl(&engine, params("queen", ",,")).await.unwrap());

        assert!(out.items.is_empty());
        assert!(out.cache_date.is_none());
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_secure_images_apply_to_every_merged_ad() {
        let (engine, _, _) = engine(vec!["Hit"]).await;
        let params = AdsByKeywordMultiParams { secure_images: Some(true), ..params("+queen live bootleg", "Music,DVD") };

        let out: AdsOutput = output(&by_keyword_multi_impl(&engine, params).await.unwrap());

        assert_eq!(out.items.len(), 4);
        assert!(
            out.items
                .iter()
                .all(|i| i.image_url == "https://images-na.ssl-images-amazon.com/images/I/x.jpg")
        );
    }
}
