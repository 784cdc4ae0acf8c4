//! Cache-related MCP tools.
//!
//! Read-only inspection of the SQLite cache stores.

pub mod keys;

pub use keys::{CacheKeysParams, keys_impl};
