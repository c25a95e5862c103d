//! # quill-db
//!
//! libSQL storage for the Quill audit log.
//!
//! Holds the append-only `audit_log` table and its `audit_labels` rows, turns
//! an [`AuditLogFilterContext`](quill_core::AuditLogFilterContext) into
//! parameterized queries, and serializes every write through a single worker
//! task owned by [`AuditLogService`](service::AuditLogService).

pub mod error;
pub mod filters;
pub mod helpers;
mod migrations;
pub mod query;
pub mod repos;
pub mod service;
pub mod writer;

use error::DatabaseError;
use libsql::Builder;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

const IN_MEMORY: &str = ":memory:";

/// Database handle for the audit log tables.
///
/// Readers use `conn`; the writer task uses `writer`. On disk these are two
/// separate connections. A `":memory:"` database exists only inside the
/// connection that created it, so there both handles point at one connection.
/// In either case a write transaction holds `write_gate` exclusively, so no
/// read runs while a write is uncommitted.
pub struct QuillDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    writer: libsql::Connection,
    write_gate: RwLock<()>,
}

impl QuillDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = connect(&db).await?;
        let writer = if path == IN_MEMORY {
            conn.clone()
        } else {
            connect(&db).await?
        };

        let quill_db = Self {
            db,
            conn,
            writer,
            write_gate: RwLock::new(()),
        };
        quill_db.run_migrations().await?;
        Ok(quill_db)
    }

    /// Access the reader connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Shared access for a read; waits while a write transaction is open.
    pub(crate) async fn read_guard(&self) -> RwLockReadGuard<'_, ()> {
        self.write_gate.read().await
    }

    /// Exclusive access for a write transaction.
    pub(crate) async fn write_guard(&self) -> RwLockWriteGuard<'_, ()> {
        self.write_gate.write().await
    }
}

async fn connect(db: &libsql::Database) -> Result<libsql::Connection, DatabaseError> {
    let conn = db.connect()?;
    conn.execute("PRAGMA foreign_keys = ON", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
    Ok(conn)
}
