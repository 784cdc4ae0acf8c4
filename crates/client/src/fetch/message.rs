//! Request and response values passed between callers, the proxy and the
//! network transport.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use storefront_core::{CachedResponse, Error, RequestKey};

/// An intercepted request.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl ProxyRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url, headers: HeaderMap::new(), body: None }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Add a header, replacing any previous value.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Cache identity of this request.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(self.method.as_str(), self.url.as_str())
    }
}

/// A response produced by the network or replayed from a cache store.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    /// URL the response answers (final URL after redirects for network responses).
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// True when served from a cache store without touching the network.
    pub from_cache: bool,
}

impl ProxyResponse {
    pub fn new(url: Url, status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self { url, status, headers, body: body.into(), from_cache: false }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Copy of this response in storable form.
    ///
    /// Header values that aren't valid UTF-8 are dropped.
    pub fn to_cached(&self) -> CachedResponse {
        let headers = self
            .headers
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
            .collect();
        CachedResponse::new(self.status.as_u16(), headers, self.body.to_vec())
    }

    /// Rebuild a response from a stored entry.
    pub fn from_cached(url: Url, cached: CachedResponse) -> Result<Self, Error> {
        let status = StatusCode::from_u16(cached.status)
            .map_err(|e| Error::InvalidInput(format!("stored status {}: {e}", cached.status)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &cached.headers {
            if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
                headers.append(name, value);
            }
        }

        Ok(Self { url, status, headers, body: Bytes::from(cached.body), from_cache: true })
    }
}
