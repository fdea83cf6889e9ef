//! Cached catalog fetches and multi-query aggregation.
//!
//! ### Fetching
//! - Every catalog request maps to one deterministic [`CacheKey`].
//! - A cached entry younger than [`FRESHNESS_WINDOW_SECS`] is served as-is and
//!   keeps its original timestamp as the result's `cache_date`.
//! - Otherwise the catalog is queried and the decoded items are cached with
//!   the current time. A failed catalog call yields an empty result without a
//!   date; stale data is never served in its place.
//!
//! ### Aggregation
//! - A keyword expression expands into term-groups (see [`parse_expression`]).
//! - Each (category × term-group) pair is fetched in turn, category-major.
//! - The merged list is deduplicated by title, then sampled down to the limit.
//!
//! Nothing here returns an error: bad input, catalog failures and cache
//! trouble are logged and surface as fewer (or no) ads.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};

use super::keywords::parse_expression;
use super::sampling::sample_limit;
use super::similarity::dedupe;
use crate::Error;
use crate::cache::{CacheKey, CacheStore};
use crate::catalog::{CatalogClient, CatalogItem, CatalogRequest, ResponseGroup};
use crate::model::{ItemRecord, ResultSet};

/// Age after which a cache entry must be refreshed from the catalog.
pub const FRESHNESS_WINDOW_SECS: i64 = 86_400;

/// Ads returned per slot unless the caller asks otherwise.
pub const DEFAULT_LIMIT: usize = 3;

/// Title similarity (percent) above which two ads count as duplicates.
pub const DEFAULT_SIMILARITY: f64 = 90.0;

/// Separator between categories in a category list.
pub const CATEGORY_SEPARATOR: char = ',';

/// Result-count and deduplication policy for keyword searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Maximum number of ads; `0` returns everything.
    pub limit: usize,
    /// Similarity threshold in percent; `0.0` disables deduplication.
    pub similarity: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT, similarity: DEFAULT_SIMILARITY }
    }
}

impl SearchOptions {
    /// Options from a signed limit, where any value below one means "all".
    pub fn new(limit: i64, similarity: f64) -> Self {
        Self { limit: usize::try_from(limit).unwrap_or(0), similarity }
    }
}

/// Catalog items together with the time they were fetched.
struct Fetched {
    date: DateTime<Utc>,
    items: Vec<CatalogItem>,
}

fn is_fresh(last_modified: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(last_modified) < Duration::seconds(FRESHNESS_WINDOW_SECS)
}

/// Canonical identifier list: entries trimmed, empties dropped, comma-joined.
fn normalize_ids(ids: &str) -> String {
    ids.split(',').map(str::trim).filter(|id| !id.is_empty()).collect::<Vec<_>>().join(",")
}

/// Canonical keyword string: whitespace runs collapse to single spaces.
fn normalize_keyword(keyword: &str) -> String {
    keyword.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Log a rejected request and return the empty answer callers expect.
fn usage_error(operation: &'static str, message: &str) -> ResultSet {
    let err = Error::InvalidInput(message.to_string());
    tracing::error!(operation, error = %err, "ad request rejected; no search performed");
    ResultSet::empty()
}

/// Ad retrieval engine.
///
/// The catalog client and cache store are injected, so any backend (or a test
/// fake) can be plugged in.
#[derive(Clone)]
pub struct AdEngine {
    catalog: Arc<dyn CatalogClient>,
    cache: Arc<dyn CacheStore>,
    secure_images: bool,
}

impl AdEngine {
    pub fn new(catalog: Arc<dyn CatalogClient>, cache: Arc<dyn CacheStore>) -> Self {
        Self { catalog, cache, secure_images: false }
    }

    /// Serve image URLs from the TLS image host.
    pub fn with_secure_images(mut self, secure: bool) -> Self {
        self.secure_images = secure;
        self
    }

    pub fn set_secure_images(&mut self, secure: bool) {
        self.secure_images = secure;
    }

    pub fn secure_images(&self) -> bool {
        self.secure_images
    }

    /// Ads for a comma-separated identifier list.
    ///
    /// `response_detail` names the catalog response group; unknown names fall
    /// back to `Medium`. Items without a title or detail page are skipped.
    pub async fn get_by_identifier(&self, ids: &str, response_detail: &str) -> ResultSet {
        let ids = normalize_ids(ids);
        if ids.is_empty() {
            return usage_error("get_by_identifier", "identifier list must not be empty");
        }

        let response_group = ResponseGroup::for_lookup(response_detail);
        let key = CacheKey::for_lookup(&ids, response_group);
        let request = CatalogRequest::ItemLookup { ids, response_group };

        match self.fetch(&key, &request).await {
            Some(fetched) => ResultSet::new(
                fetched.date,
                fetched
                    .items
                    .into_iter()
                    .filter_map(|item| ItemRecord::from_lookup(item, self.secure_images))
                    .collect(),
            ),
            None => ResultSet::empty(),
        }
    }

    /// Ads for one keyword string in one category.
    pub async fn get_by_keyword(&self, keyword: &str, category: &str, options: SearchOptions) -> ResultSet {
        if keyword.trim().is_empty() {
            return usage_error("get_by_keyword", "keyword must not be empty");
        }
        let category = category.trim();
        if category.is_empty() {
            return usage_error("get_by_keyword", "category must not be empty");
        }

        let mut result = self.search_one(keyword, category).await;
        result.items = self.finish(result.items, options);
        result
    }

    /// Ads for a keyword expression across a comma-separated category list.
    ///
    /// One category with one term-group is an ordinary keyword search.
    /// Anything else fetches every (category × term-group) combination and
    /// merges them; the merged `cache_date` is that of the stalest fetch.
    pub async fn get_by_keyword_multi(&self, expression: &str, categories: &str, options: SearchOptions) -> ResultSet {
        if expression.trim().is_empty() {
            return usage_error("get_by_keyword_multi", "keyword must not be empty");
        }

        let categories: Vec<&str> = categories
            .split(CATEGORY_SEPARATOR)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        if categories.is_empty() {
            return usage_error("get_by_keyword_multi", "category list must not be empty");
        }

        let groups = parse_expression(expression);
        if let ([category], [group]) = (categories.as_slice(), groups.as_slice()) {
            return self.get_by_keyword(group, category, options).await;
        }

        tracing::debug!(
            categories = categories.len(),
            term_groups = groups.len(),
            "multi-search: fetching every category and term-group"
        );

        let mut items = Vec::new();
        let mut cache_date: Option<DateTime<Utc>> = None;

        for category in &categories {
            for group in &groups {
                let result = self.search_one(group, category).await;
                if let Some(date) = result.cache_date {
                    cache_date = Some(cache_date.map_or(date, |oldest| oldest.min(date)));
                }
                items.extend(result.items);
            }
        }

        ResultSet { cache_date, items: self.finish(items, options) }
    }

    async fn search_one(&self, keyword: &str, category: &str) -> ResultSet {
        let keyword = normalize_keyword(keyword);
        let key = CacheKey::for_search(category, &keyword);
        let request = CatalogRequest::ItemSearch {
            keywords: keyword,
            search_index: category.to_string(),
            response_group: ResponseGroup::Medium,
        };

        match self.fetch(&key, &request).await {
            Some(fetched) => ResultSet::new(
                fetched.date,
                fetched
                    .items
                    .into_iter()
                    .map(|item| ItemRecord::from_search(item, self.secure_images))
                    .collect(),
            ),
            None => ResultSet::empty(),
        }
    }

    /// Dedupe, then apply the limit.
    fn finish(&self, items: Vec<ItemRecord>, options: SearchOptions) -> Vec<ItemRecord> {
        let items = if options.similarity > 0.0 { dedupe(items, options.similarity) } else { items };
        sample_limit(items, options.limit, &mut rand::thread_rng())
    }

    /// Serve `request` from cache when fresh, otherwise from the catalog.
    ///
    /// Returns `None` only when the catalog had to be asked and failed.
    async fn fetch(&self, key: &CacheKey, request: &CatalogRequest) -> Option<Fetched> {
        match self.cache.read(key).await {
            Ok(Some(entry)) if is_fresh(entry.last_modified, Utc::now()) && !entry.content.is_empty() => {
                match serde_json::from_slice::<Vec<CatalogItem>>(&entry.content) {
                    Ok(items) => {
                        tracing::debug!(%key, cached_at = %entry.last_modified, "cache hit");
                        return Some(Fetched { date: entry.last_modified, items });
                    }
                    Err(e) => tracing::warn!(%key, error = %e, "discarding unreadable cache entry"),
                }
            }
            Ok(Some(entry)) => tracing::debug!(%key, cached_at = %entry.last_modified, "cache entry expired"),
            Ok(None) => tracing::debug!(%key, "cache miss"),
            Err(e) => tracing::warn!(%key, error = %e, "cache read failed; querying catalog"),
        }

        let items = match self.catalog.lookup(request).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(%key, operation = request.operation(), error = %e, "catalog request failed");
                return None;
            }
        };

        // Microseconds survive every store, so a live result and its cached
        // replay report the same date.
        let now = Utc::now().trunc_subsecs(6);
        match serde_json::to_vec(&items) {
            Ok(content) => {
                if let Err(e) = self.cache.write(key, &content, Some(now)).await {
                    tracing::warn!(%key, error = %e, "failed to cache catalog response");
                }
            }
            Err(e) => tracing::warn!(%key, error = %e, "failed to serialize catalog response"),
        }

        Some(Fetched { date: now, items })
    }
}
