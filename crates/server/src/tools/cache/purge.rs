//! cache_purge tool implementation.
//!
//! Deletes cache entries older than a given age, whatever backend is in use.

use adsift_core::ads::FRESHNESS_WINDOW_SECS;
use adsift_core::{CacheStore, Error};
use chrono::{Duration, Utc};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Purge entries older than this many days (default: 1, the freshness window).
    #[serde(default)]
    pub older_than_days: Option<i64>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
    /// Entries last written before this RFC 3339 time were eligible.
    pub cutoff: String,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &dyn CacheStore, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let max_age = match params.older_than_days {
        Some(days) if days < 0 => {
            return Err(Error::InvalidInput(format!("older_than_days must not be negative, got {days}")).into());
        }
        Some(days) => Duration::try_days(days)
            .ok_or_else(|| Error::InvalidInput(format!("older_than_days out of range: {days}")))?,
        None => Duration::seconds(FRESHNESS_WINDOW_SECS),
    };

    let cutoff = Utc::now()
        .checked_sub_signed(max_age)
        .ok_or_else(|| Error::InvalidInput("older_than_days reaches before the representable range".into()))?;
    let deleted = cache.purge_before(cutoff).await?;
    tracing::info!(deleted, %cutoff, "purged cache entries");

    json_result(&CachePurgeOutput { deleted, cutoff: cutoff.to_rfc3339() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use adsift_core::{CacheDb, CacheKey, FileCache};
    use crate::tools::testing::output;

    async fn seed(cache: &dyn CacheStore) {
        let now = Utc::now();
        cache
            .write(&CacheKey::for_search("DVD", "matrix"), b"[]", Some(now - Duration::days(10)))
            .await
            .unwrap();
        cache
            .write(&CacheKey::for_search("Music", "queen"), b"[]", Some(now - Duration::days(2)))
            .await
            .unwrap();
        cache
            .write(&CacheKey::for_lookup("B000000001", adsift_core::ResponseGroup::Medium), b"[]", Some(now))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_purge_default_window() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        seed(&cache).await;

        let result = purge_impl(&cache, CachePurgeParams { older_than_days: None }).await.unwrap();
        let out: CachePurgeOutput = output(&result);
        assert_eq!(out.deleted, 2);
        assert_eq!(cache.entry_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purge_older_than_days() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        seed(&cache).await;

        let result = purge_impl(&cache, CachePurgeParams { older_than_days: Some(5) }).await.unwrap();
        let out: CachePurgeOutput = output(&result);
        assert_eq!(out.deleted, 1);
    }

    #[tokio::test]
    async fn test_purge_file_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        seed(&cache).await;

        let result = purge_impl(&cache, CachePurgeParams { older_than_days: Some(0) }).await.unwrap();
        let out: CachePurgeOutput = output(&result);
        assert_eq!(out.deleted, 3);
    }

    #[tokio::test]
    async fn test_purge_negative_days() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let result = purge_impl(&cache, CachePurgeParams { older_than_days: Some(-1) }).await;
        assert!(result.is_err());
    }
}
