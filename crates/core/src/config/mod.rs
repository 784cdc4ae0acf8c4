//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (STOREFRONT_*)
//! 2. TOML config file (if STOREFRONT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (STOREFRONT_*)
/// 2. TOML config file (if STOREFRONT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database holding the cache stores.
    ///
    /// Set via STOREFRONT_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Site origin that manifest paths and relative request paths resolve against.
    ///
    /// Set via STOREFRONT_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Base URL of the catalog API.
    ///
    /// Set via STOREFRONT_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Tenant id sent as `X-Tenant-ID` on catalog requests.
    ///
    /// Set via STOREFRONT_TENANT_ID environment variable.
    #[serde(default = "default_tenant_id")]
    pub tenant_id: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via STOREFRONT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via STOREFRONT_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Version-tagged cache store name. Bumping it invalidates every
    /// previously cached asset on the next activation.
    ///
    /// Set via STOREFRONT_CACHE_NAME environment variable.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// Paths pre-cached at install time.
    ///
    /// Set via STOREFRONT_PRECACHE_MANIFEST environment variable.
    #[serde(default = "default_precache_manifest")]
    pub precache_manifest: Vec<String>,

    /// File extensions (without the dot) served cache-first.
    ///
    /// Set via STOREFRONT_STATIC_EXTENSIONS environment variable.
    #[serde(default = "default_static_extensions")]
    pub static_extensions: Vec<String>,

    /// Path prefix whose requests always bypass the cache.
    ///
    /// Set via STOREFRONT_API_PREFIX environment variable.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./storefront-cache.sqlite")
}

fn default_origin() -> String {
    "http://localhost:3000".into()
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api".into()
}

fn default_tenant_id() -> String {
    "a1b2c3d4-e5f6-7890-abcd-ef1234567890".into()
}

fn default_user_agent() -> String {
    "storefront-proxy/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_cache_name() -> String {
    "biasharahub-v1".into()
}

fn default_precache_manifest() -> Vec<String> {
    ["/", "/manifest.json", "/favicon.png", "/logo.png"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_static_extensions() -> Vec<String> {
    ["js", "css", "ico", "png", "jpg", "jpeg", "gif", "svg", "woff", "woff2", "ttf", "eot"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_api_prefix() -> String {
    "/api/".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            origin: default_origin(),
            api_base_url: default_api_base_url(),
            tenant_id: default_tenant_id(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_name: default_cache_name(),
            precache_manifest: default_precache_manifest(),
            static_extensions: default_static_extensions(),
            api_prefix: default_api_prefix(),
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
    /// 1. Environment variables prefixed with `STOREFRONT_`
    /// 2. TOML file from `STOREFRONT_CONFIG_FILE` (if set)
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

        if let Ok(config_path) = std::env::var("STOREFRONT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("STOREFRONT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
