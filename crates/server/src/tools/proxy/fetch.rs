//! proxy_fetch tool implementation.
//!
//! Sends one request through the registration, exactly as a page would.

use std::collections::BTreeMap;

use chrono::Utc;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use storefront_client::fetch::resolve;
use storefront_client::{Method, ProxyRequest, RequestPolicy, Url};
use storefront_core::Error;

use crate::state::AppState;
use crate::tools::json_result;

/// Parameters for the proxy_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProxyFetchParams {
    /// Absolute URL, or a path resolved against the site origin.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Optional request body, sent as UTF-8.
    #[serde(default)]
    pub body: Option<String>,

    /// Maximum characters of body included in the output (default: 2000).
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_method() -> String {
    "GET".into()
}

fn default_preview_chars() -> usize {
    2000
}

/// Output from the proxy_fetch tool.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyFetchOutput {
    pub method: String,
    pub url: String,
    /// Policy applied, or null when no version is active.
    pub policy: Option<RequestPolicy>,
    /// Version that handled the request.
    pub controlled_by: Option<String>,
    pub status: u16,
    pub from_cache: bool,
    pub content_type: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body_bytes: usize,
    pub body_preview: String,
    pub body_truncated: bool,
    /// ISO8601 timestamp of when the response was produced.
    pub fetched_at: String,
}

/// Implementation of the proxy_fetch tool.
pub async fn fetch_impl(state: &AppState, params: ProxyFetchParams) -> Result<CallToolResult, McpError> {
    let method = Method::from_bytes(params.method.trim().to_uppercase().as_bytes())
        .map_err(|_| Error::InvalidInput(format!("Unknown HTTP method: {}", params.method)))?;
    let origin = Url::parse(&state.config.origin).map_err(|e| Error::InvalidUrl(format!("origin: {e}")))?;
    let url = resolve(&origin, &params.url).map_err(Error::from)?;

    let mut request = ProxyRequest::new(method, url);
    if let Some(body) = params.body {
        request = request.body(body);
    }

    let active = state.registration.active().await;
    let policy = active.as_ref().map(|proxy| proxy.classify(&request));
    let controlled_by = active.as_ref().map(|proxy| proxy.cache_name().to_string());

    let method = request.method.to_string();
    let response = state.registration.dispatch(request).await?;

    let text = String::from_utf8_lossy(&response.body);
    let body_truncated = text.chars().count() > params.preview_chars;
    let body_preview: String = text.chars().take(params.preview_chars).collect();

    let headers = response
        .headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.to_string(), v.to_string())))
        .collect();

    let output = ProxyFetchOutput {
        method,
        url: response.url.to_string(),
        policy,
        controlled_by,
        status: response.status.as_u16(),
        from_cache: response.from_cache,
        content_type: response.content_type().map(str::to_string),
        headers,
        body_bytes: response.body.len(),
        body_preview,
        body_truncated,
        fetched_at: Utc::now().to_rfc3339(),
    };

    json_result(&output)
}
