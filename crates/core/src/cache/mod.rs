//! SQLite-backed cache stores for static assets.
//!
//! This module provides persistent, named cache stores using SQLite with
//! async access via tokio-rusqlite. It supports:
//!
//! - Version-tagged stores, deleted wholesale on version change
//! - Entries keyed by request identity (method + URL), last write wins
//! - Transactional batch writes for all-or-nothing pre-caching
//! - Versioned schema setup and WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod hash;
pub mod storage;
pub mod stores;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::{CachedResponse, EntrySummary, RequestKey};
pub use storage::CacheStorage;
