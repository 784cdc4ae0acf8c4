//! Cache entry CRUD operations.
//!
//! Entries are stored responses keyed by request identity (method + URL)
//! within a named store. Writes are upserts; the last write for a key wins.

use super::connection::CacheDb;
use super::hash::compute_entry_key;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};

/// Request identity used as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub method: String,
    pub url: String,
}

impl RequestKey {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self { method: method.into().to_ascii_uppercase(), url: url.into() }
    }

    /// Shorthand for the only method the proxy ever stores.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Content-addressed hash of this identity.
    pub fn hash(&self) -> String {
        compute_entry_key(&self.method, &self.url)
    }
}

/// A stored response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub stored_at: String,
}

impl CachedResponse {
    /// Build a response stamped with the current time.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self { status, headers, body, stored_at: chrono::Utc::now().to_rfc3339() }
    }
}

/// Summary row for listing a store's contents.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct EntrySummary {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub body_bytes: usize,
    pub stored_at: String,
}

fn insert_entry(
    conn: &rusqlite::Connection, store: &str, key: &RequestKey, response: &CachedResponse,
) -> Result<(), Error> {
    let headers_json =
        serde_json::to_string(&response.headers).map_err(|e| Error::CacheWrite(format!("headers: {e}")))?;

    let exists = conn
        .query_row("SELECT 1 FROM cache_stores WHERE name = ?1", params![store], |_| Ok(()))
        .optional()?
        .is_some();
    if !exists {
        return Err(Error::CacheWrite(format!("store {store} does not exist")));
    }

    conn.execute(
        "INSERT INTO cache_entries (
            store_name, key_hash, method, url, status, headers_json, body, stored_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(store_name, key_hash) DO UPDATE SET
            status = excluded.status,
            headers_json = excluded.headers_json,
            body = excluded.body,
            stored_at = excluded.stored_at",
        params![
            store,
            key.hash(),
            &key.method,
            &key.url,
            response.status as i64,
            headers_json,
            &response.body,
            &response.stored_at,
        ],
    )?;
    Ok(())
}

impl CacheDb {
    /// Get a stored response by exact method + URL match.
    ///
    /// Returns None if the store or the entry doesn't exist.
    pub async fn get_entry(&self, store: &str, key: &RequestKey) -> Result<Option<CachedResponse>, Error> {
        let store = store.to_string();
        let hash = key.hash();
        self.conn
            .call(move |conn| -> Result<Option<CachedResponse>, Error> {
                let result = conn.query_row(
                    "SELECT status, headers_json, body, stored_at
                     FROM cache_entries WHERE store_name = ?1 AND key_hash = ?2",
                    params![store, hash],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, Vec<u8>>(2)?,
                            row.get::<_, String>(3)?,
                        ))
                    },
                );

                match result {
                    Ok((status, headers_json, body, stored_at)) => {
                        let headers = serde_json::from_str(&headers_json)
                            .map_err(|e| Error::InvalidInput(format!("stored headers in {store}: {e}")))?;
                        Ok(Some(CachedResponse { status: status as u16, headers, body, stored_at }))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite a single entry.
    ///
    /// Fails with `CacheWrite` if the store does not exist, so a write that
    /// loses a race with store deletion is dropped instead of reviving the store.
    pub async fn put_entry(&self, store: &str, key: &RequestKey, response: &CachedResponse) -> Result<(), Error> {
        let store = store.to_string();
        let key = key.clone();
        let response = response.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> { insert_entry(conn, &store, &key, &response) })
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite several entries in one transaction.
    ///
    /// Either every entry is written or none is. The store must exist.
    pub async fn put_entries(&self, store: &str, entries: Vec<(RequestKey, CachedResponse)>) -> Result<(), Error> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                for (key, response) in &entries {
                    insert_entry(&tx, &store, key, response)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries in a store (0 if the store doesn't exist).
    pub async fn entry_count(&self, store: &str) -> Result<u64, Error> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM cache_entries WHERE store_name = ?1",
                    params![store],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// List a store's entries ordered by URL.
    pub async fn list_entries(&self, store: &str) -> Result<Vec<EntrySummary>, Error> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<EntrySummary>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT method, url, status, length(body), stored_at
                     FROM cache_entries WHERE store_name = ?1 ORDER BY url ASC",
                )?;
                let rows = stmt.query_map(params![store], |row| {
                    Ok(EntrySummary {
                        method: row.get(0)?,
                        url: row.get(1)?,
                        status: row.get::<_, i64>(2)? as u16,
                        body_bytes: row.get::<_, i64>(3)? as usize,
                        stored_at: row.get(4)?,
                    })
                })?;
                let entries = rows.collect::<Result<Vec<_>, _>>()?;
                Ok(entries)
            })
            .await
            .map_err(Error::from)
    }
}
