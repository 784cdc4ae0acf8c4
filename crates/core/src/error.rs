//! Unified error types for the storefront proxy.
//!
//! Errors that decide whether a response can be produced are surfaced to the
//! caller; housekeeping errors (stale-store cleanup, opportunistic cache
//! writes) are built only to be logged.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the storefront workspace.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., unknown HTTP method).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// A manifest asset could not be fetched or stored during install.
    #[error("INSTALLATION_FAILED: {asset}: {reason}")]
    Installation { asset: String, reason: String },

    /// Lifecycle operation called out of order.
    #[error("INVALID_STATE: {0}")]
    InvalidState(String),

    /// Network transport failure (no response was produced).
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// Opportunistic cache write failed.
    #[error("CACHE_WRITE_FAILED: {0}")]
    CacheWrite(String),

    /// A stale cache store could not be deleted during activation.
    #[error("ACTIVATION_CLEANUP_FAILED: {store}: {reason}")]
    ActivationCleanup { store: String, reason: String },

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Database file carries a schema this build doesn't understand.
    #[error("CACHE_ERROR: unsupported schema: {0}")]
    Schema(String),

    /// Catalog API request failed.
    #[error("CATALOG_ERROR: {0}")]
    Catalog(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::Installation { .. } => (-32020, err.to_string()),
            Error::InvalidState(msg) => (-32021, msg.clone()),
            Error::Network(msg) => (-32008, msg.clone()),
            Error::CacheWrite(msg) => (-32002, msg.clone()),
            Error::ActivationCleanup { .. } => (-32002, err.to_string()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::Schema(msg) => (-32002, msg.clone()),
            Error::Catalog(msg) => (-32030, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
