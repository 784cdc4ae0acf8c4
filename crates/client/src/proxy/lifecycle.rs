//! Proxy lifecycle states and the host's client-control capability.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

/// Where a proxy version is in its install/activate lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    /// Failed to install, or replaced by a newer version.
    Redundant,
}

/// Result of a successful install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallOutcome {
    pub cache_name: String,
    /// Number of manifest entries written.
    pub precached: usize,
    /// Whether the store was created by this install.
    pub created: bool,
    /// Always true: a freshly installed version may activate immediately.
    pub skip_waiting: bool,
}

/// Result of an activation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivationReport {
    pub cache_name: String,
    /// Stale stores removed.
    pub deleted: Vec<String>,
    /// Stale stores whose deletion failed; retried on the next activation.
    pub failed: Vec<String>,
}

/// Host capability that makes a proxy version the handler for every open
/// client without a reload.
#[async_trait]
pub trait ClientControl: Send + Sync {
    async fn claim_all_clients(&self, cache_name: &str);
}

/// `ClientControl` that records which version holds the clients.
#[derive(Debug, Default)]
pub struct ClaimFlag {
    controller: RwLock<Option<String>>,
}

impl ClaimFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache name of the version that last claimed the clients.
    pub async fn controller(&self) -> Option<String> {
        self.controller.read().await.clone()
    }
}

#[async_trait]
impl ClientControl for ClaimFlag {
    async fn claim_all_clients(&self, cache_name: &str) {
        *self.controller.write().await = Some(cache_name.to_string());
    }
}
