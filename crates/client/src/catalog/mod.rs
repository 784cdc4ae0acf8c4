//! Storefront catalog API client.
//!
//! Read-only access to products, categories and businesses.
//!
//! ### Contract
//!
//! - **Endpoints**: `{base}/products`, `{base}/products/categories`,
//!   `{base}/products/businesses`
//! - **Headers**: `X-Tenant-ID` and `Content-Type: application/json` on every call
//! - **Filters**: `category`, `businessId`, `businessName`, `ownerId` query
//!   parameters; no query string when no filter is set
//! - No caching, retry or queuing; requests go through whatever transport
//!   the client is given (usually the proxy registration, which bypasses the
//!   cache for API paths).

pub mod error;
pub mod request;
pub mod response;

pub use error::CatalogError;
pub use request::ProductFilter;
pub use response::{Business, Product, ProductCategory};

use std::sync::Arc;
use std::time::Instant;

use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use storefront_core::AppConfig;

use crate::fetch::{ProxyRequest, Transport};

/// Default base URL of the catalog API.
const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Tenant used when none is configured.
const DEFAULT_TENANT_ID: &str = "a1b2c3d4-e5f6-7890-abcd-ef1234567890";

const TENANT_HEADER: HeaderName = HeaderName::from_static("x-tenant-id");

/// Catalog client configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL, without a trailing `/products`.
    pub base_url: String,
    /// Sent as `X-Tenant-ID`.
    pub tenant_id: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), tenant_id: DEFAULT_TENANT_ID.to_string() }
    }
}

impl From<&AppConfig> for CatalogConfig {
    fn from(config: &AppConfig) -> Self {
        Self { base_url: config.api_base_url.clone(), tenant_id: config.tenant_id.clone() }
    }
}

/// Catalog API client.
#[derive(Clone)]
pub struct CatalogClient {
    transport: Arc<dyn Transport>,
    config: CatalogConfig,
    tenant: HeaderValue,
}

impl CatalogClient {
    /// Create a new catalog client over the given transport.
    pub fn new(config: CatalogConfig, transport: Arc<dyn Transport>) -> Result<Self, CatalogError> {
        let tenant = HeaderValue::from_str(&config.tenant_id)
            .map_err(|e| CatalogError::InvalidRequest(format!("tenant id: {e}")))?;
        endpoint(&config.base_url, "products")?;

        Ok(Self { transport, config, tenant })
    }

    /// List product categories.
    pub async fn list_categories(&self) -> Result<Vec<ProductCategory>, CatalogError> {
        let url = endpoint(&self.config.base_url, "products/categories")?;
        self.get_json(url, "categories").await
    }

    /// List businesses (shops).
    pub async fn list_businesses(&self) -> Result<Vec<Business>, CatalogError> {
        let url = endpoint(&self.config.base_url, "products/businesses")?;
        self.get_json(url, "businesses").await
    }

    /// List products matching the filter.
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, CatalogError> {
        let mut url = endpoint(&self.config.base_url, "products")?;
        if !filter.is_empty() {
            url.query_pairs_mut().extend_pairs(filter.query_pairs());
        }
        self.get_json(url, "products").await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, resource: &'static str) -> Result<T, CatalogError> {
        let start = Instant::now();
        let request = ProxyRequest::get(url)
            .header(TENANT_HEADER, self.tenant.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        tracing::debug!("catalog request: {}", request.url);

        let response = self.transport.fetch(&request).await?;

        if !response.is_success() {
            return Err(CatalogError::Status { resource, status: response.status.as_u16() });
        }

        let parsed = serde_json::from_slice(&response.body).map_err(|e| CatalogError::Parse(e.to_string()))?;

        tracing::debug!("catalog {} fetched in {:?}", resource, start.elapsed());

        Ok(parsed)
    }
}

/// Join `path` onto the base URL, keeping the base's own path segments.
fn endpoint(base: &str, path: &str) -> Result<Url, CatalogError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| CatalogError::InvalidRequest(format!("{joined}: {e}")))
}
