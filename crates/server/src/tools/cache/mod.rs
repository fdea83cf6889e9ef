//! Cache-related MCP tools.
//!
//! This module provides tools for maintaining the ad cache.

pub mod purge;

pub use purge::{CachePurgeParams, purge_impl};
