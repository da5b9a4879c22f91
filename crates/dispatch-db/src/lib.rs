//! # dispatch-db
//!
//! libSQL storage and the assignment engine for dispatch state.
//!
//! Handles all relational state: dispatches, vehicles, and the append-only
//! dispatch history. The [`engine::AssignmentEngine`] runs read-decide-write
//! against any [`store::AssignmentStore`]; [`store::LibsqlStore`] is the
//! production implementation, committing each assignment in one `IMMEDIATE`
//! transaction guarded by a compare-and-swap on the dispatch version.
//!
//! Uses the `libsql` crate (C `SQLite` fork) in local mode.

pub mod engine;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod store;
mod test_support;

use std::path::Path;
use std::time::Duration;

use dispatch_config::DatabaseConfig;
use error::DatabaseError;
use libsql::Builder;
use tokio::sync::{Mutex, MutexGuard};

const MEMORY_PATH: &str = ":memory:";
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Central database handle for all dispatch state operations.
///
/// File-backed databases hand out a fresh connection per unit of work so that
/// concurrent assignments each get their own transaction. An in-memory
/// database only exists on its one connection; units of work and reads on
/// it are serialized through an async gate instead, so a read never lands
/// inside another task's open transaction.
pub struct DispatchDb {
    db: libsql::Database,
    conn: libsql::Connection,
    in_memory: bool,
    busy_timeout: Duration,
    gate: Mutex<()>,
}

impl DispatchDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Creates the parent directory if needed and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_local_with(path, DEFAULT_BUSY_TIMEOUT).await
    }

    /// Open the database described by a [`DatabaseConfig`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Self::open_local_with(&config.path, Duration::from_millis(config.busy_timeout_ms)).await
    }

    async fn open_local_with(path: &str, busy_timeout: Duration) -> Result<Self, DatabaseError> {
        let in_memory = path == MEMORY_PATH;
        if !in_memory
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Other(e.into()))?;
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        configure_connection(&conn, busy_timeout).await?;

        if !in_memory {
            // WAL lets readers proceed while an assignment transaction is open.
            let mut rows = conn.query("PRAGMA journal_mode = WAL", ()).await?;
            while rows.next().await?.is_some() {}
        }

        let dispatch_db = Self {
            db,
            conn,
            in_memory,
            busy_timeout,
            gate: Mutex::new(()),
        };
        dispatch_db.run_migrations().await?;
        tracing::debug!(path, in_memory, "opened dispatch database");
        Ok(dispatch_db)
    }

    /// Access the long-lived libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub const fn is_in_memory(&self) -> bool {
        self.in_memory
    }

    /// A connection scoped to one unit of work.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a new connection cannot be opened.
    pub async fn connect_scoped(&self) -> Result<libsql::Connection, DatabaseError> {
        if self.in_memory {
            return Ok(self.conn.clone());
        }
        let conn = self.db.connect()?;
        configure_connection(&conn, self.busy_timeout).await?;
        Ok(conn)
    }

    /// Serialize writers that share the single in-memory connection.
    ///
    /// Returns `None` for file-backed databases, where `SQLite` locking does
    /// the job.
    pub async fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        self.gate().await
    }

    /// Keep a read on the shared in-memory connection out of any open
    /// transaction. The guard must not be held across another guarded call.
    ///
    /// Returns `None` for file-backed databases, where each reader sees only
    /// committed data.
    pub async fn read_guard(&self) -> Option<MutexGuard<'_, ()>> {
        self.gate().await
    }

    async fn gate(&self) -> Option<MutexGuard<'_, ()>> {
        if self.in_memory {
            Some(self.gate.lock().await)
        } else {
            None
        }
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"dsp-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        generate_id(&self.conn, prefix).await
    }
}

/// Generate a prefixed ID on a specific connection (or transaction).
///
/// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
pub(crate) async fn generate_id(
    conn: &libsql::Connection,
    prefix: &str,
) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}

async fn configure_connection(
    conn: &libsql::Connection,
    busy_timeout: Duration,
) -> Result<(), DatabaseError> {
    // Foreign keys must be enabled per-connection in SQLite.
    conn.execute("PRAGMA foreign_keys = ON", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
    let mut rows = conn
        .query(
            &format!("PRAGMA busy_timeout = {}", busy_timeout.as_millis()),
            (),
        )
        .await?;
    while rows.next().await?.is_some() {}
    Ok(())
}
