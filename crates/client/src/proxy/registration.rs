//! Version cut-over between proxy versions.
//!
//! A registration holds the active proxy. A new version only replaces it
//! after installing successfully; until then the previous version keeps
//! serving. With no active version, requests go straight to the network.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use storefront_core::Error;
use tokio::sync::RwLock;

use super::{ActivationReport, AssetCachingProxy, InstallOutcome};
use crate::fetch::{ProxyRequest, ProxyResponse, Transport};

/// What happened when a version was registered.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationOutcome {
    pub install: InstallOutcome,
    pub activation: ActivationReport,
    /// Cache name of the version that was replaced, if any.
    pub replaced: Option<String>,
}

/// Holder of the active proxy version.
pub struct Registration {
    network: Arc<dyn Transport>,
    active: RwLock<Option<Arc<AssetCachingProxy>>>,
}

impl Registration {
    /// `network` serves requests while no version is active.
    pub fn new(network: Arc<dyn Transport>) -> Self {
        Self { network, active: RwLock::new(None) }
    }

    /// Install, activate, then promote `proxy` to active.
    ///
    /// If installation fails the error is returned and the current active
    /// version, if any, is left in place.
    pub async fn register(&self, proxy: AssetCachingProxy) -> Result<RegistrationOutcome, Error> {
        let proxy = Arc::new(proxy);

        let install = proxy.on_install().await?;
        let activation = proxy.on_activate().await?;

        let previous = self.active.write().await.replace(Arc::clone(&proxy));
        let replaced = match previous {
            Some(previous) => {
                previous.retire().await;
                Some(previous.cache_name().to_string())
            }
            None => None,
        };

        tracing::info!(cache = %proxy.cache_name(), replaced = ?replaced, "proxy version active");

        Ok(RegistrationOutcome { install, activation, replaced })
    }

    /// The active version, if any.
    pub async fn active(&self) -> Option<Arc<AssetCachingProxy>> {
        self.active.read().await.clone()
    }

    /// Route a request through the active version, or the network if none.
    pub async fn dispatch(&self, request: ProxyRequest) -> Result<ProxyResponse, Error> {
        match self.active().await {
            Some(proxy) => proxy.on_fetch(request).await,
            None => self.network.fetch(&request).await,
        }
    }
}

#[async_trait]
impl Transport for Registration {
    async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse, Error> {
        self.dispatch(request.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::{ClaimFlag, Lifecycle, ProxyConfig};
    use crate::testing::{FlakyStorage, ScriptedTransport, url};
    use storefront_core::AppConfig;

    fn proxy(storage: &Arc<FlakyStorage>, network: &Arc<ScriptedTransport>, name: &str) -> AssetCachingProxy {
        let config = ProxyConfig::from_app_config(&AppConfig::default())
            .unwrap()
            .with_cache_name(name);
        AssetCachingProxy::new(config, storage.clone(), network.clone(), Arc::new(ClaimFlag::new()))
    }

    #[tokio::test]
    async fn test_uncontrolled_requests_go_to_network() {
        let network = ScriptedTransport::new();
        network.respond(url("/logo.png").as_str(), 200, "png");
        let registration = Registration::new(network.clone());

        registration.dispatch(ProxyRequest::get(url("/logo.png"))).await.unwrap();
        registration.dispatch(ProxyRequest::get(url("/logo.png"))).await.unwrap();

        assert!(registration.active().await.is_none());
        assert_eq!(network.calls(), 2);
    }

    #[tokio::test]
    async fn test_register_promotes_and_replaces() {
        let storage = FlakyStorage::new().await;
        let network = ScriptedTransport::new();
        network.serve_manifest();
        let registration = Registration::new(network.clone());

        let first = registration
            .register(proxy(&storage, &network, "biasharahub-v0"))
            .await
            .unwrap();
        assert!(first.replaced.is_none());
        let v0 = registration.active().await.unwrap();

        let second = registration
            .register(proxy(&storage, &network, "biasharahub-v1"))
            .await
            .unwrap();

        assert_eq!(second.replaced.as_deref(), Some("biasharahub-v0"));
        assert_eq!(second.activation.deleted, vec!["biasharahub-v0".to_string()]);
        assert_eq!(v0.state().await, Lifecycle::Redundant);
        assert_eq!(registration.active().await.unwrap().cache_name(), "biasharahub-v1");
        assert_eq!(storage.db.list_store_names().await.unwrap(), vec!["biasharahub-v1".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_install_keeps_previous_version_serving() {
        let storage = FlakyStorage::new().await;
        let network = ScriptedTransport::new();
        network.serve_manifest();
        let registration = Registration::new(network.clone());
        registration
            .register(proxy(&storage, &network, "biasharahub-v1"))
            .await
            .unwrap();

        network.respond(url("/favicon.png").as_str(), 500, "boom");
        let result = registration.register(proxy(&storage, &network, "biasharahub-v2")).await;

        assert!(matches!(result, Err(Error::Installation { .. })));
        assert_eq!(registration.active().await.unwrap().cache_name(), "biasharahub-v1");
        assert_eq!(storage.db.list_store_names().await.unwrap(), vec!["biasharahub-v1".to_string()]);

        let calls = network.calls();
        let response = registration.dispatch(ProxyRequest::get(url("/logo.png"))).await.unwrap();
        assert!(response.from_cache);
        assert_eq!(network.calls(), calls);
    }

    #[tokio::test]
    async fn test_registration_is_a_transport() {
        let storage = FlakyStorage::new().await;
        let network = ScriptedTransport::new();
        network.serve_manifest();
        let registration = Registration::new(network.clone());
        registration
            .register(proxy(&storage, &network, "biasharahub-v1"))
            .await
            .unwrap();

        let transport: Arc<dyn Transport> = Arc::new(registration);
        let response = transport.fetch(&ProxyRequest::get(url("/"))).await.unwrap();
        assert!(response.from_cache);
    }

    #[tokio::test]
    async fn test_in_flight_write_from_old_version_does_not_revive_its_store() {
        let storage = FlakyStorage::new().await;
        let network = ScriptedTransport::new();
        network.serve_manifest();
        let registration = Arc::new(Registration::new(network.clone()));
        registration
            .register(proxy(&storage, &network, "biasharahub-v0"))
            .await
            .unwrap();

        let gate = storage.gate_puts();
        let script = url("/app.js");
        network.respond(script.as_str(), 200, "console.log(0)");
        let response = registration.dispatch(ProxyRequest::get(script.clone())).await.unwrap();
        assert!(!response.from_cache);

        let next = proxy(&storage, &network, "biasharahub-v1");
        let register = tokio::spawn({
            let registration = Arc::clone(&registration);
            async move { registration.register(next).await }
        });

        while storage
            .db
            .list_store_names()
            .await
            .unwrap()
            .contains(&"biasharahub-v0".to_string())
        {
            tokio::task::yield_now().await;
        }
        gate.notify_one();

        let outcome = register.await.unwrap().unwrap();

        assert_eq!(outcome.activation.deleted, vec!["biasharahub-v0".to_string()]);
        assert_eq!(storage.db.list_store_names().await.unwrap(), vec!["biasharahub-v1".to_string()]);
        assert_eq!(storage.puts(), 1);
    }
}
