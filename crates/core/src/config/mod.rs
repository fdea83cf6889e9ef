//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MCP_ADS_*)
//! 2. TOML config file (if MCP_ADS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::{ConfigError, KNOWN_LOCAL_SITES};

/// Which cache store backs the ad engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Single SQLite database at `db_path`.
    #[default]
    Sqlite,
    /// One file per entry below `cache_dir`.
    Files,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MCP_ADS_*)
/// 2. TOML config file (if MCP_ADS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog API access key.
    ///
    /// Set via MCP_ADS_ACCESS_KEY environment variable.
    /// Required only when a catalog client is built.
    #[serde(default)]
    pub access_key: Option<String>,

    /// Partner (associate) tag appended to every catalog request.
    ///
    /// Set via MCP_ADS_PARTNER_TAG environment variable.
    #[serde(default)]
    pub partner_tag: Option<String>,

    /// Catalog site suffix, e.g. `de`, `com` or `co.uk`.
    ///
    /// Set via MCP_ADS_LOCAL_SITE environment variable.
    #[serde(default = "default_local_site")]
    pub local_site: String,

    /// Override for the catalog endpoint; derived from `local_site` when unset.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Set via MCP_ADS_CACHE_BACKEND (`sqlite` or `files`).
    #[serde(default)]
    pub cache_backend: CacheBackend,

    /// Path to SQLite cache database.
    ///
    /// Set via MCP_ADS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Root directory of the file cache.
    ///
    /// Set via MCP_ADS_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via MCP_ADS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via MCP_ADS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Rewrite product images onto the TLS image host.
    ///
    /// Set via MCP_ADS_SECURE_IMAGES environment variable.
    #[serde(default)]
    pub secure_images: bool,
}

fn default_local_site() -> String {
    "de".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./mcp-ads-cache.sqlite")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./mcp-ads-cache")
}

fn default_user_agent() -> String {
    "mcp-ads/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            partner_tag: None,
            local_site: default_local_site(),
            base_url: None,
            cache_backend: CacheBackend::default(),
            db_path: default_db_path(),
            cache_dir: default_cache_dir(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            secure_images: false,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MCP_ADS_`
    /// 2. TOML file from `MCP_ADS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MCP_ADS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MCP_ADS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the catalog access key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the access key is not set.
    pub fn require_access_key(&self) -> Result<&str, ConfigError> {
        self.access_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "access_key".into(),
            hint: "Set MCP_ADS_ACCESS_KEY environment variable".into(),
        })
    }

    /// Check if the partner tag is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the partner tag is not set.
    pub fn require_partner_tag(&self) -> Result<&str, ConfigError> {
        self.partner_tag.as_deref().filter(|t| !t.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "partner_tag".into(),
            hint: "Set MCP_ADS_PARTNER_TAG environment variable".into(),
        })
    }
}
