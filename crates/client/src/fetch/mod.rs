//! Network transport for the proxy and the catalog client.
//!
//! ### Transport contract
//! - One request in, one response or one failure out.
//! - Non-2xx statuses are responses, not failures; callers decide.
//! - No retry. The only timeout is the HTTP client's own.
//!
//! ### URL handling
//! - Relative paths resolve against the configured site origin.
//! - Fragments are dropped; the query string is kept as-is.

pub mod message;
pub mod url;

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

pub use message::{ProxyRequest, ProxyResponse};
pub use self::url::{UrlError, canonicalize, resolve};

use storefront_core::{AppConfig, Error};

/// Network capability consumed by the proxy.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a request and return whatever the network returns.
    async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse, Error>;
}

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "storefront-proxy/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "storefront-proxy/0.1".to_string(), timeout: Duration::from_millis(20000), max_redirects: 5 }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), ..Default::default() }
    }
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: &FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

fn network_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Network(format!("request timed out: {}", err))
    } else {
        Error::Network(format!("network error: {}", err))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse, Error> {
        let start = Instant::now();

        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(network_error)?;

        let status = response.status();
        let final_url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(network_error)?;

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = status.as_u16(),
            fetch_ms = start.elapsed().as_millis() as u64,
            bytes = body.len(),
            "network fetch completed"
        );

        Ok(ProxyResponse::new(final_url, status, headers, body))
    }
}
