//! Cache storage capability consumed by the asset-caching proxy.
//!
//! The proxy talks to its stores only through this trait so hosts can supply
//! their own backend; `CacheDb` is the SQLite implementation.

use async_trait::async_trait;

use super::connection::CacheDb;
use super::entries::{CachedResponse, RequestKey};
use crate::Error;

/// Registry of named cache stores and their entries.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a store, creating it if absent. Returns true if it was created.
    async fn open(&self, name: &str) -> Result<bool, Error>;

    /// Names of every existing store.
    async fn list_names(&self) -> Result<Vec<String>, Error>;

    /// Delete a store and its entries. Returns false if it didn't exist.
    async fn delete(&self, name: &str) -> Result<bool, Error>;

    /// Exact-match lookup by request identity.
    async fn get(&self, store: &str, key: &RequestKey) -> Result<Option<CachedResponse>, Error>;

    /// Insert or overwrite one entry.
    async fn put(&self, store: &str, key: &RequestKey, response: &CachedResponse) -> Result<(), Error>;

    /// Insert or overwrite several entries atomically.
    async fn put_all(&self, store: &str, entries: Vec<(RequestKey, CachedResponse)>) -> Result<(), Error>;
}

#[async_trait]
impl CacheStorage for CacheDb {
    async fn open(&self, name: &str) -> Result<bool, Error> {
        self.open_store(name).await
    }

    async fn list_names(&self) -> Result<Vec<String>, Error> {
        self.list_store_names().await
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        self.delete_store(name).await
    }

    async fn get(&self, store: &str, key: &RequestKey) -> Result<Option<CachedResponse>, Error> {
        self.get_entry(store, key).await
    }

    async fn put(&self, store: &str, key: &RequestKey, response: &CachedResponse) -> Result<(), Error> {
        self.put_entry(store, key, response).await
    }

    async fn put_all(&self, store: &str, entries: Vec<(RequestKey, CachedResponse)>) -> Result<(), Error> {
        self.put_entries(store, entries).await
    }
}
