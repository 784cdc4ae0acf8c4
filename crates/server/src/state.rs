//! Shared server state: config, cache database, transport, proxy registration
//! and catalog client.

use std::sync::Arc;

use storefront_client::{
    AssetCachingProxy, CatalogClient, CatalogConfig, ClaimFlag, FetchConfig, HttpTransport, ProxyConfig,
    Registration, Transport,
};
use storefront_core::{AppConfig, CacheDb, Error};

/// Everything the tools share.
pub struct AppState {
    pub config: AppConfig,
    pub db: CacheDb,
    pub network: Arc<dyn Transport>,
    pub registration: Arc<Registration>,
    pub clients: Arc<ClaimFlag>,
    pub catalog: CatalogClient,
}

impl AppState {
    /// Open the cache database and build the HTTP transport.
    pub async fn open(config: AppConfig) -> Result<Self, Error> {
        let db = CacheDb::open(&config.db_path).await?;
        let network: Arc<dyn Transport> = Arc::new(HttpTransport::new(&FetchConfig::from(&config))?);
        Self::with_parts(config, db, network)
    }

    /// Assemble state from pre-built parts.
    ///
    /// Catalog requests are routed through the registration so the active
    /// proxy sees them (and bypasses the cache for the API prefix).
    pub fn with_parts(config: AppConfig, db: CacheDb, network: Arc<dyn Transport>) -> Result<Self, Error> {
        let registration = Arc::new(Registration::new(Arc::clone(&network)));
        let catalog = CatalogClient::new(CatalogConfig::from(&config), registration.clone())?;

        Ok(Self { config, db, network, registration, clients: Arc::new(ClaimFlag::new()), catalog })
    }

    /// A fresh proxy version, optionally under a different store name.
    pub fn proxy_version(&self, cache_name: Option<&str>) -> Result<AssetCachingProxy, Error> {
        let mut proxy_config = ProxyConfig::from_app_config(&self.config)?;
        if let Some(name) = cache_name {
            if name.trim().is_empty() {
                return Err(Error::InvalidInput("cache_name cannot be empty".into()));
            }
            proxy_config = proxy_config.with_cache_name(name);
        }

        Ok(AssetCachingProxy::new(
            proxy_config,
            Arc::new(self.db.clone()),
            Arc::clone(&self.network),
            self.clients.clone(),
        ))
    }

    /// Install and activate the configured version.
    ///
    /// A failure leaves the registration uncontrolled; requests then go
    /// straight to the network.
    pub async fn bootstrap(&self) {
        let proxy = match self.proxy_version(None) {
            Ok(proxy) => proxy,
            Err(e) => {
                tracing::error!(error = %e, "invalid proxy configuration");
                return;
            }
        };

        match self.registration.register(proxy).await {
            Ok(outcome) => tracing::info!(
                cache = %outcome.install.cache_name,
                precached = outcome.install.precached,
                deleted = outcome.activation.deleted.len(),
                "proxy ready"
            ),
            Err(e) => tracing::warn!(error = %e, "initial install failed; serving uncontrolled"),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use storefront_client::header::HeaderMap;
    use storefront_client::{ProxyRequest, ProxyResponse, StatusCode};

    /// Transport serving canned catalog JSON, echoing other paths, failing `/down/`.
    pub struct EchoTransport;

    #[async_trait]
    impl Transport for EchoTransport {
        async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse, Error> {
            if request.url.path().starts_with("/down/") {
                return Err(Error::Network("unreachable".into()));
            }
            let body = match request.url.path() {
                "/api/products" => {
                    r#"[{"id":"p1","name":"Kikoi","category":"Crafts","price":1500,"images":["/img/kikoi.png"]}]"#
                        .to_string()
                }
                "/api/products/categories" => r#"[{"id":"c1","name":"Crafts","displayOrder":2}]"#.to_string(),
                "/api/products/businesses" => r#"[{"id":"b1","name":"Duka La Mama"}]"#.to_string(),
                path => format!("echo {path}"),
            };
            Ok(ProxyResponse::new(request.url.clone(), StatusCode::OK, HeaderMap::new(), body))
        }
    }

    pub async fn state() -> AppState {
        state_with(AppConfig::default()).await
    }

    pub async fn state_with(config: AppConfig) -> AppState {
        let db = CacheDb::open_in_memory().await.unwrap();
        AppState::with_parts(config, db, Arc::new(EchoTransport)).unwrap()
    }
}
