//! Catalog API client error types.

/// Errors from the catalog API client.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Non-success response for a resource listing.
    #[error("Failed to fetch {resource} (status {status})")]
    Status { resource: &'static str, status: u16 },

    /// Request could not be built (bad base URL or header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network error; no response was produced.
    #[error("network error: {0}")]
    Network(String),

    /// Response body was not the expected JSON.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<storefront_core::Error> for CatalogError {
    fn from(err: storefront_core::Error) -> Self {
        match err {
            storefront_core::Error::InvalidUrl(msg) | storefront_core::Error::InvalidInput(msg) => {
                CatalogError::InvalidRequest(msg)
            }
            other => CatalogError::Network(other.to_string()),
        }
    }
}

impl From<CatalogError> for storefront_core::Error {
    fn from(err: CatalogError) -> Self {
        storefront_core::Error::Catalog(err.to_string())
    }
}
