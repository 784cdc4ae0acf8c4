//! MCP tool implementations.
//!
//! Each tool takes the shared [`AppState`](crate::state::AppState) and its
//! params, and returns pretty-printed JSON as text content.

pub mod cache;
pub mod catalog;
pub mod proxy;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use storefront_core::Error;

pub use cache::{CacheKeysParams, keys_impl};
pub use catalog::{CatalogProductsParams, businesses_impl, categories_impl, products_impl};
pub use proxy::{ProxyFetchParams, ProxyInstallParams, fetch_impl, install_impl};

/// Serialize a tool output into a successful result.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) fn result_json(result: &CallToolResult) -> serde_json::Value {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
