//! Database connection management with pragma configuration.
//!
//! Opens the SQLite database holding every cache store, applies pragmas for
//! concurrent access (WAL mode, enforced foreign keys so deleting a store
//! cascades to its entries), and creates the schema on first open.
//!
//! The schema version lives in `PRAGMA user_version`. A fresh file is at 0
//! and gets `schema/cache_stores.sql`; a file written by a newer build is
//! refused rather than guessed at.

use crate::Error;
use std::path::Path;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

const SCHEMA: &str = include_str!("../../schema/cache_stores.sql");

/// Version written to `user_version` once `SCHEMA` is applied.
const SCHEMA_VERSION: i64 = 1;

/// Cache database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Cloning shares the same connection.
#[derive(Clone, Debug)]
pub struct CacheDb {
    pub(crate) conn: Connection,
}

impl CacheDb {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies pragmas, and sets up
    /// the schema. Stores persist across process restarts.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        ensure_schema(&conn).await?;

        Ok(Self { conn })
    }
}

/// Create the store tables unless the file is already at `SCHEMA_VERSION`.
async fn ensure_schema(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version > SCHEMA_VERSION {
            return Err(Error::Schema(format!(
                "database is at version {version}, this build supports up to {SCHEMA_VERSION}"
            )));
        }

        if version < SCHEMA_VERSION {
            let tx = conn.transaction()?;
            tx.execute_batch(SCHEMA)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;
            tracing::debug!(from = version, to = SCHEMA_VERSION, "cache schema created");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
