//! Injected proxy configuration.

use reqwest::Url;
use storefront_core::{AppConfig, Error};

use super::classify::RequestClassifier;
use crate::fetch::resolve;

/// Everything the proxy's policy depends on.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Version-tagged store name.
    pub cache_name: String,
    /// Origin the manifest paths resolve against.
    pub origin: Url,
    /// Paths pre-cached at install time, in order.
    pub manifest: Vec<String>,
    pub static_extensions: Vec<String>,
    pub api_prefix: String,
}

impl ProxyConfig {
    /// Build from validated application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(format!("origin: {e}")))?;
        Ok(Self {
            cache_name: config.cache_name.clone(),
            origin,
            manifest: config.precache_manifest.clone(),
            static_extensions: config.static_extensions.clone(),
            api_prefix: config.api_prefix.clone(),
        })
    }

    /// Same policy under a different store version.
    pub fn with_cache_name(mut self, cache_name: impl Into<String>) -> Self {
        self.cache_name = cache_name.into();
        self
    }

    pub fn classifier(&self) -> RequestClassifier {
        RequestClassifier::new(self.api_prefix.clone(), self.manifest.iter().cloned(), &self.static_extensions)
    }

    /// Absolute manifest URLs in manifest order, duplicates removed.
    pub fn manifest_urls(&self) -> Result<Vec<Url>, Error> {
        let mut urls: Vec<Url> = Vec::with_capacity(self.manifest.len());
        for path in &self.manifest {
            let url = resolve(&self.origin, path)?;
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        Ok(urls)
    }
}
