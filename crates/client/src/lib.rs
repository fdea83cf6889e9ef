//! Client code for mcp-ads.
//!
//! This crate provides the HTTP product catalog client used by the ad
//! engine: request validation, status mapping and response normalization.

pub mod catalog;

pub use catalog::{ApiError, CatalogApiResponse, CatalogConfig, ProductApiClient, endpoint_for};
