//! proxy_install tool implementation.
//!
//! Registers a new proxy version: install, activate, then cut over.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use storefront_client::{ActivationReport, InstallOutcome};

use crate::state::AppState;
use crate::tools::json_result;

/// Parameters for the proxy_install tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProxyInstallParams {
    /// Store name for the new version (default: the configured cache name).
    #[serde(default)]
    pub cache_name: Option<String>,
}

/// Output from the proxy_install tool.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyInstallOutput {
    pub install: InstallOutcome,
    pub activation: ActivationReport,
    /// Version that stopped serving, if any.
    pub replaced: Option<String>,
    /// Version now controlling clients.
    pub controller: Option<String>,
}

/// Implementation of the proxy_install tool.
pub async fn install_impl(state: &AppState, params: ProxyInstallParams) -> Result<CallToolResult, McpError> {
    let proxy = state.proxy_version(params.cache_name.as_deref())?;
    let outcome = state.registration.register(proxy).await?;

    let output = ProxyInstallOutput {
        install: outcome.install,
        activation: outcome.activation,
        replaced: outcome.replaced,
        controller: state.clients.controller().await,
    };

    json_result(&output)
}
