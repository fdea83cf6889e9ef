//! Storage contract shared by every cache backend.

use chrono::{DateTime, Utc};

use super::key::CacheKey;
use crate::Error;

/// Content stored under a key, with its last modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub content: Vec<u8>,
    pub last_modified: DateTime<Utc>,
}

/// Key → blob storage with modification timestamps.
///
/// Stores hold no business logic. Callers treat every error as a cache
/// bypass and log it; nothing here is allowed to fail an ad request.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Read an entry. A missing key is `Ok(None)`, never an error.
    async fn read(&self, key: &CacheKey) -> Result<Option<CacheEntry>, Error>;

    /// Store `content` under `key`, stamped with `modified` or the current time.
    ///
    /// Empty content deletes the entry.
    async fn write(&self, key: &CacheKey, content: &[u8], modified: Option<DateTime<Utc>>) -> Result<(), Error>;

    /// Remove an entry if present.
    async fn delete(&self, key: &CacheKey) -> Result<(), Error> {
        self.write(key, &[], None).await
    }

    /// Delete every entry last modified before `cutoff`; returns the count removed.
    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error>;
}
