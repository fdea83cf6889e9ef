//! mcp-ads server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use adsift_client::{CatalogConfig, ProductApiClient};
use adsift_core::{AdEngine, AppConfig, CacheBackend, CacheDb, CacheStore, FileCache};
use anyhow::{Context, Result};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

async fn open_cache(config: &AppConfig) -> Result<Arc<dyn CacheStore>> {
    let cache: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Sqlite => Arc::new(
            CacheDb::open(&config.db_path)
                .await
                .with_context(|| format!("opening cache database {}", config.db_path.display()))?,
        ),
        CacheBackend::Files => Arc::new(FileCache::new(&config.cache_dir)),
    };
    Ok(cache)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        local_site = %config.local_site,
        cache_backend = ?config.cache_backend,
        secure_images = config.secure_images,
        "Starting mcp-ads server on stdio transport"
    );

    let catalog = ProductApiClient::new(CatalogConfig::from_app_config(&config)?)?;
    let cache = open_cache(&config).await?;
    let engine = AdEngine::new(Arc::new(catalog), cache.clone()).with_secure_images(config.secure_images);

    let handler = handler::AdServer::new(Arc::new(engine), cache);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
