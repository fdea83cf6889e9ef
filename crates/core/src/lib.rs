//! Core types and shared functionality for mcp-ads.
//!
//! This crate provides:
//! - The ad engine (cached fetches, keyword expressions, dedupe, sampling)
//! - Cache stores with SQLite and file backends
//! - The catalog client boundary
//! - Unified error types
//! - Configuration structures

pub mod ads;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod model;

pub use ads::{AdEngine, SearchOptions};
pub use cache::{CacheDb, CacheKey, CacheStore, FileCache};
pub use catalog::{CatalogClient, CatalogError, CatalogItem, CatalogRequest, ResponseGroup};
pub use config::{AppConfig, CacheBackend, ConfigError};
pub use error::Error;
pub use model::{ItemRecord, ResultSet};
