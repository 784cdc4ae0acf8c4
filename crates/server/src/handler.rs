//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::state::AppState;
use crate::tools::{
    CacheKeysParams, CatalogProductsParams, ProxyFetchParams, ProxyInstallParams, businesses_impl, categories_impl,
    fetch_impl, install_impl, keys_impl, products_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for the storefront proxy.
#[derive(Clone)]
pub struct StorefrontServer {
    tool_router: ToolRouter<Self>,
    state: Arc<AppState>,
}

#[tool_router]
impl StorefrontServer {
    /// Create a new server handler over shared state.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { tool_router: Self::tool_router(), state }
    }

    #[tool(
        description = "Install and activate a new proxy version. Pre-caches the manifest, deletes older cache stores, and claims clients."
    )]
    async fn proxy_install(&self, params: Parameters<ProxyInstallParams>) -> Result<CallToolResult, McpError> {
        install_impl(&self.state, params.0).await
    }

    /// Send a request through the active proxy version.
    ///
    /// Returns the policy applied, whether the response came from the cache,
    /// and a preview of the body.
    #[tool(description = "Send a request (path or URL) through the asset-caching proxy. Returns policy, status, headers and body preview.")]
    async fn proxy_fetch(&self, params: Parameters<ProxyFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.state, params.0).await
    }

    #[tool(description = "List cache stores and the entries of the active (or named) store.")]
    async fn cache_keys(&self, params: Parameters<CacheKeysParams>) -> Result<CallToolResult, McpError> {
        keys_impl(&self.state, params.0).await
    }

    #[tool(description = "List storefront products, optionally filtered by category, business id, business name or owner id.")]
    async fn catalog_products(&self, params: Parameters<CatalogProductsParams>) -> Result<CallToolResult, McpError> {
        products_impl(&self.state, params.0).await
    }

    #[tool(description = "List storefront product categories.")]
    async fn catalog_categories(&self) -> Result<CallToolResult, McpError> {
        categories_impl(&self.state).await
    }

    #[tool(description = "List businesses (shops) selling on the storefront.")]
    async fn catalog_businesses(&self) -> Result<CallToolResult, McpError> {
        businesses_impl(&self.state).await
    }
}

impl ServerHandler for StorefrontServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "storefront-proxy".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Offline asset-caching proxy for the storefront. Use proxy_fetch to request pages and assets, \
                 proxy_install to roll out a new cache version, and catalog_* to read the product catalog."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support;

    #[tokio::test]
    async fn test_all_tools_registered() {
        let server = StorefrontServer::new(Arc::new(test_support::state().await));

        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "cache_keys",
                "catalog_businesses",
                "catalog_categories",
                "catalog_products",
                "proxy_fetch",
                "proxy_install"
            ]
        );
    }

    #[tokio::test]
    async fn test_server_info() {
        let server = StorefrontServer::new(Arc::new(test_support::state().await));
        let info = server.get_info();
        assert_eq!(info.server_info.name, "storefront-proxy");
        assert!(info.capabilities.tools.is_some());
    }
}
