//! Persistent cache for catalog responses.
//!
//! Entries are opaque blobs addressed by a [`CacheKey`] and stamped with a
//! modification time. Two backends implement [`CacheStore`]:
//!
//! - [`CacheDb`]: SQLite via tokio-rusqlite, WAL mode, versioned migrations
//! - [`FileCache`]: one file per key, sections as subdirectories, atomic
//!   rename-on-write

pub mod connection;
pub mod entries;
pub mod files;
pub mod key;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use files::FileCache;
pub use key::CacheKey;
pub use store::{CacheEntry, CacheStore};
