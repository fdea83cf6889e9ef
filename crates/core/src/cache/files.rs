//! File-per-key cache store.
//!
//! Layout: `root/[section/]name.cache`. The entry timestamp is the file's
//! modification time. Writes land in a temporary sibling file that is renamed
//! into place, so readers never observe a partially written entry.

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use super::key::{CacheKey, file_stem};
use super::store::{CacheEntry, CacheStore};
use crate::Error;

const EXTENSION: &str = "cache";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Cache store keeping one file per entry below a root directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Create a store rooted at `root`. Directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        let mut path = self.root.clone();
        if let Some(section) = &key.section {
            path.push(file_stem(section).as_ref());
        }
        path.push(format!("{}.{}", file_stem(&key.name), EXTENSION));
        path
    }
}

async fn blocking<T, F>(op: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| Error::CacheIo(std::io::Error::other(e)))?
}

fn read_entry(path: &Path) -> Result<Option<CacheEntry>, Error> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let modified = file.metadata()?.modified()?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;

    Ok(Some(CacheEntry { content, last_modified: DateTime::<Utc>::from(modified) }))
}

fn remove_entry(path: &Path) -> Result<(), Error> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn write_temp(tmp: &Path, content: &[u8], modified: DateTime<Utc>) -> Result<(), Error> {
    let mut file = File::create(tmp)?;
    file.write_all(content)?;
    file.set_modified(SystemTime::from(modified))?;
    file.sync_all()?;
    Ok(())
}

fn write_entry(path: &Path, content: &[u8], modified: DateTime<Utc>) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp = path.with_extension(format!("{EXTENSION}.{}-{seq}.tmp", std::process::id()));

    let written = write_temp(&tmp, content, modified).and_then(|_| fs::rename(&tmp, path).map_err(Error::from));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

fn purge_dir(dir: &Path, cutoff: SystemTime, depth: usize) -> Result<u64, Error> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut deleted = 0;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let meta = entry.metadata()?;

        if meta.is_dir() {
            // Sections are one level deep.
            if depth == 0 {
                deleted += purge_dir(&path, cutoff, depth + 1)?;
            }
        } else if path.extension().is_some_and(|ext| ext == EXTENSION) && meta.modified()? < cutoff {
            remove_entry(&path)?;
            deleted += 1;
        }
    }
    Ok(deleted)
}

#[async_trait::async_trait]
impl CacheStore for FileCache {
    async fn read(&self, key: &CacheKey) -> Result<Option<CacheEntry>, Error> {
        let path = self.path_for(key);
        blocking(move || read_entry(&path)).await
    }

    async fn write(&self, key: &CacheKey, content: &[u8], modified: Option<DateTime<Utc>>) -> Result<(), Error> {
        let path = self.path_for(key);
        if content.is_empty() {
            return blocking(move || remove_entry(&path)).await;
        }

        let content = content.to_vec();
        let modified = modified.unwrap_or_else(Utc::now);
        blocking(move || write_entry(&path, &content, modified)).await
    }

    async fn purge_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let root = self.root.clone();
        blocking(move || purge_dir(&root, SystemTime::from(cutoff), 0)).await
    }
}
