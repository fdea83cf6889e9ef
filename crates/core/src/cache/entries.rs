//! Cache entry operations on the SQLite store.

use chrono::{DateTime, SecondsFormat, Utc};
use tokio_rusqlite::params;

use super::connection::CacheDb;
use super::key::CacheKey;
use super::store::{CacheEntry, CacheStore};
use crate::Error;

/// Fixed-width UTC form so stored timestamps order correctly as text.
fn to_stored(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn from_stored(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::CorruptEntry(format!("timestamp {raw:?}: {e}")))
}

impl CacheDb {
    /// Number of stored entries.
    pub async fn entry_count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait::async_trait]
impl CacheStore for CacheDb {
    async fn read(&self, key: &CacheKey) -> Result<Option<CacheEntry>, Error> {
        let section = key.section_str().to_string();
        let name = key.name.clone();
        self.conn
            .call(move |conn| -> Result<Option<CacheEntry>, Error> {
                let mut stmt =
                    conn.prepare("SELECT content, last_modified FROM cache_entries WHERE section = ?1 AND name = ?2")?;

                let result = stmt.query_row(params![section, name], |row| {
                    Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, String>(1)?))
                });

                match result {
                    Ok((content, modified)) => Ok(Some(CacheEntry { content, last_modified: from_stored(&modified)? })),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace an entry; empty content deletes it.
    async fn write(&self, key: &CacheKey, content: &[u8], modified: Option<DateTime<Utc>>) -> Result<(), Error> {
        let section = key.section_str().to_string();
        let name = key.name.clone();

        if content.is_empty() {
            return self
                .conn
                .call(move |conn| -> Result<(), Error> {
                    conn.execute(
                        "DELETE FROM cache_entries WHERE section = ?1 AND name = ?2",
                        params![section, name],
                    )?;
                    Ok(())
                })
                .await
                .map_err(Error::from);
        }

        let content = content.to_vec();
        let last_modified = to_stored(modified.unwrap_or_else(Utc::now));

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO cache_entries (section, name, content, last_modified)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(section, name) DO UPDATE SET
                        content = excluded.content,
                        last_modified = excluded.last_modified",
                    params![section, name, content, last_modified],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let cutoff = to_stored(cutoff);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM cache_entries WHERE last_modified < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
