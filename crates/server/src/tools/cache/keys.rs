//! cache_keys tool implementation.
//!
//! Lists cache stores and the entries of one of them.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use storefront_core::cache::EntrySummary;

use crate::state::AppState;
use crate::tools::json_result;

/// Parameters for the cache_keys tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysParams {
    /// Store to list entries of (default: the active version's store).
    #[serde(default)]
    pub store: Option<String>,
}

/// Output from the cache_keys tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysOutput {
    /// Cache name of the active version, if any.
    pub active: Option<String>,
    /// Every store, oldest first.
    pub stores: Vec<String>,
    /// Store whose entries are listed.
    pub store: Option<String>,
    pub entry_count: u64,
    pub entries: Vec<EntrySummary>,
}

/// Implementation of the cache_keys tool.
pub async fn keys_impl(state: &AppState, params: CacheKeysParams) -> Result<CallToolResult, McpError> {
    let active = state
        .registration
        .active()
        .await
        .map(|proxy| proxy.cache_name().to_string());
    let stores = state.db.list_store_names().await?;

    let store = params.store.or_else(|| active.clone());
    let entries = match &store {
        Some(name) => state.db.list_entries(name).await?,
        None => Vec::new(),
    };

    let output = CacheKeysOutput { active, stores, store, entry_count: entries.len() as u64, entries };
    json_result(&output)
}
