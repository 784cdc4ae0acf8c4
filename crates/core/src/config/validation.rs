//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::collections::HashSet;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| invalid(field, e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(field, format!("unsupported scheme: {scheme}"))),
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `cache_name` is empty
    /// - `origin` or `api_base_url` is not an http(s) URL
    /// - a manifest path does not start with `/`
    /// - a static extension is empty or contains a dot
    /// - `api_prefix` does not start and end with `/`
    ///
    /// Returns `ConfigError::Missing` if `tenant_id` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.cache_name.trim().is_empty() {
            return Err(invalid("cache_name", "must not be empty"));
        }

        if self.tenant_id.is_empty() {
            return Err(ConfigError::Missing {
                field: "tenant_id".into(),
                hint: "Set STOREFRONT_TENANT_ID environment variable".into(),
            });
        }

        validate_http_url("origin", &self.origin)?;
        validate_http_url("api_base_url", &self.api_base_url)?;

        if let Some(path) = self.precache_manifest.iter().find(|p| !p.starts_with('/')) {
            return Err(invalid("precache_manifest", format!("path must start with '/': {path}")));
        }

        if let Some(ext) = self
            .static_extensions
            .iter()
            .find(|e| e.is_empty() || e.contains('.'))
        {
            return Err(invalid("static_extensions", format!("extension must be non-empty without a dot: {ext:?}")));
        }

        if !self.api_prefix.starts_with('/') || !self.api_prefix.ends_with('/') {
            return Err(invalid("api_prefix", "must start and end with '/'"));
        }

        let unique: HashSet<&str> = self.precache_manifest.iter().map(String::as_str).collect();
        if unique.len() != self.precache_manifest.len() {
            tracing::warn!(
                manifest_count = self.precache_manifest.len(),
                unique_count = unique.len(),
                "precache_manifest contains duplicate paths; each is cached once"
            );
        }

        Ok(())
    }
}
