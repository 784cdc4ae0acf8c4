//! Offline asset-caching proxy.
//!
//! Intercepts requests and answers each one by policy:
//!
//! - **bypass** (API prefix or non-GET): straight to the network
//! - **cache-first** (manifest paths, static extensions): store hit, or
//!   network fetch whose 2xx response is written back in the background
//! - **network-first** (everything else): always the network
//!
//! A proxy version owns one store named after its version. `on_install`
//! pre-caches the manifest all-or-nothing; `on_activate` deletes every other
//! store and claims the clients.

pub mod classify;
pub mod config;
pub mod lifecycle;
pub mod registration;

use std::sync::Arc;

use futures_util::future::{join_all, try_join_all};
use reqwest::Url;
use storefront_core::{CacheStorage, CachedResponse, Error, RequestKey};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;

pub use classify::{RequestClassifier, RequestPolicy};
pub use config::ProxyConfig;
pub use lifecycle::{ActivationReport, ClaimFlag, ClientControl, InstallOutcome, Lifecycle};
pub use registration::{Registration, RegistrationOutcome};

use crate::fetch::{ProxyRequest, ProxyResponse, Transport};

/// One version of the asset-caching proxy.
pub struct AssetCachingProxy {
    config: ProxyConfig,
    classifier: RequestClassifier,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Transport>,
    clients: Arc<dyn ClientControl>,
    lifecycle: RwLock<Lifecycle>,
    writes: Mutex<JoinSet<()>>,
}

impl AssetCachingProxy {
    /// Create a proxy version.
    ///
    /// `network` must be the raw transport, never a `Registration`.
    pub fn new(
        config: ProxyConfig, storage: Arc<dyn CacheStorage>, network: Arc<dyn Transport>,
        clients: Arc<dyn ClientControl>,
    ) -> Self {
        let classifier = config.classifier();
        Self {
            config,
            classifier,
            storage,
            network,
            clients,
            lifecycle: RwLock::new(Lifecycle::Parsed),
            writes: Mutex::new(JoinSet::new()),
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    pub async fn state(&self) -> Lifecycle {
        *self.lifecycle.read().await
    }

    pub fn classify(&self, request: &ProxyRequest) -> RequestPolicy {
        self.classifier.classify(request.url.path(), &request.method)
    }

    async fn transition(&self, from: Lifecycle, to: Lifecycle) -> Result<(), Error> {
        let mut state = self.lifecycle.write().await;
        if *state != from {
            return Err(Error::InvalidState(format!(
                "{}: cannot move to {:?} from {:?}",
                self.config.cache_name, to, *state
            )));
        }
        *state = to;
        Ok(())
    }

    async fn set_state(&self, to: Lifecycle) {
        *self.lifecycle.write().await = to;
    }

    /// Open this version's store and pre-cache every manifest URL.
    ///
    /// All-or-nothing: entries are written in one batch only after every
    /// fetch succeeded. On failure a store created here is deleted, the
    /// proxy becomes `Redundant`, and the error is returned unmasked.
    pub async fn on_install(&self) -> Result<InstallOutcome, Error> {
        self.transition(Lifecycle::Parsed, Lifecycle::Installing).await?;
        let name = self.config.cache_name.clone();

        let created = match self.storage.open(&name).await {
            Ok(created) => created,
            Err(e) => {
                self.set_state(Lifecycle::Redundant).await;
                return Err(Error::Installation { asset: name, reason: format!("open failed: {e}") });
            }
        };

        match self.precache().await {
            Ok(precached) => {
                self.set_state(Lifecycle::Installed).await;
                tracing::info!(cache = %name, precached, created, "install complete");
                Ok(InstallOutcome { cache_name: name, precached, created, skip_waiting: true })
            }
            Err(err) => {
                if created && let Err(e) = self.storage.delete(&name).await {
                    tracing::warn!(cache = %name, error = %e, "failed to remove partially installed store");
                }
                self.set_state(Lifecycle::Redundant).await;
                tracing::warn!(cache = %name, error = %err, "install failed");
                Err(err)
            }
        }
    }

    async fn precache(&self) -> Result<usize, Error> {
        let urls = self
            .config
            .manifest_urls()
            .map_err(|e| Error::Installation { asset: self.config.cache_name.clone(), reason: e.to_string() })?;

        let entries = try_join_all(urls.into_iter().map(|url| self.fetch_manifest_entry(url))).await?;
        let precached = entries.len();

        self.storage
            .put_all(&self.config.cache_name, entries)
            .await
            .map_err(|e| Error::Installation {
                asset: self.config.cache_name.clone(),
                reason: format!("store write failed: {e}"),
            })?;

        Ok(precached)
    }

    async fn fetch_manifest_entry(&self, url: Url) -> Result<(RequestKey, CachedResponse), Error> {
        let request = ProxyRequest::get(url);
        let response = self
            .network
            .fetch(&request)
            .await
            .map_err(|e| Error::Installation { asset: request.url.to_string(), reason: e.to_string() })?;

        if !response.is_success() {
            return Err(Error::Installation {
                asset: request.url.to_string(),
                reason: format!("status {}", response.status.as_u16()),
            });
        }

        Ok((request.key(), response.to_cached()))
    }

    /// Delete every store but this version's, then claim all clients.
    ///
    /// Each stale-store deletion is independent; failures are logged and
    /// reported, never returned.
    pub async fn on_activate(&self) -> Result<ActivationReport, Error> {
        self.transition(Lifecycle::Installed, Lifecycle::Activating).await?;
        let current = self.config.cache_name.clone();
        let mut report = ActivationReport { cache_name: current.clone(), ..Default::default() };

        match self.storage.list_names().await {
            Ok(names) => {
                let stale: Vec<String> = names.into_iter().filter(|n| *n != current).collect();
                let results = join_all(stale.iter().map(|name| self.storage.delete(name))).await;

                for (name, result) in stale.into_iter().zip(results) {
                    match result {
                        Ok(_) => report.deleted.push(name),
                        Err(e) => {
                            let err = Error::ActivationCleanup { store: name.clone(), reason: e.to_string() };
                            tracing::warn!(cache = %current, error = %err, "stale store cleanup failed");
                            report.failed.push(name);
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(cache = %current, error = %e, "could not list stores; skipping cleanup");
            }
        }

        self.clients.claim_all_clients(&current).await;
        self.set_state(Lifecycle::Activated).await;

        tracing::info!(
            cache = %current,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "activation complete"
        );

        Ok(report)
    }

    /// Answer an intercepted request according to its policy.
    pub async fn on_fetch(&self, request: ProxyRequest) -> Result<ProxyResponse, Error> {
        let policy = self.classify(&request);
        tracing::debug!(method = %request.method, url = %request.url, %policy, "request classified");

        match policy {
            RequestPolicy::Bypass | RequestPolicy::NetworkFirst => self.network.fetch(&request).await,
            RequestPolicy::CacheFirst => self.cache_first(request).await,
        }
    }

    async fn cache_first(&self, request: ProxyRequest) -> Result<ProxyResponse, Error> {
        let key = request.key();

        match self.storage.get(&self.config.cache_name, &key).await {
            Ok(Some(cached)) => {
                tracing::debug!(url = %request.url, "cache hit");
                return ProxyResponse::from_cached(request.url, cached);
            }
            Ok(None) => tracing::debug!(url = %request.url, "cache miss"),
            Err(e) => tracing::warn!(url = %request.url, error = %e, "cache read failed; treating as miss"),
        }

        let response = self.network.fetch(&request).await?;

        if response.is_success() {
            self.spawn_cache_write(key, response.to_cached()).await;
        }

        Ok(response)
    }

    /// Store a response without holding up the caller.
    async fn spawn_cache_write(&self, key: RequestKey, cached: CachedResponse) {
        let storage = Arc::clone(&self.storage);
        let store = self.config.cache_name.clone();

        let mut writes = self.writes.lock().await;
        while writes.try_join_next().is_some() {}

        writes.spawn(async move {
            if let Err(e) = storage.put(&store, &key, &cached).await {
                let err = match e {
                    Error::CacheWrite(_) => e,
                    other => Error::CacheWrite(other.to_string()),
                };
                tracing::warn!(cache = %store, url = %key.url, error = %err, "cache write dropped");
            }
        });
    }

    /// Wait for every background cache write started so far.
    pub async fn settle(&self) {
        let mut pending = std::mem::take(&mut *self.writes.lock().await);
        while let Some(result) = pending.join_next().await {
            if let Err(e) = result {
                tracing::warn!(error = %e, "cache write task failed");
            }
        }
    }

    /// Mark this version as replaced after flushing its pending writes.
    pub(crate) async fn retire(&self) {
        self.settle().await;
        self.set_state(Lifecycle::Redundant).await;
    }
}
