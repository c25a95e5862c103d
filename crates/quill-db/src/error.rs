//! Error types for quill-db.

use quill_core::AuthorizationError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors surfaced by the read side of the audit log service.
#[derive(Debug, Error)]
pub enum AuditLogError {
    /// The caller lacks the read permission.
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    /// The store could not answer a read.
    #[error("audit log unavailable: failed to {operation}")]
    Unavailable {
        operation: &'static str,
        #[source]
        source: DatabaseError,
    },
}

impl AuditLogError {
    pub(crate) const fn unavailable(operation: &'static str, source: DatabaseError) -> Self {
        Self::Unavailable { operation, source }
    }
}

/// Errors from the single-writer queue.
#[derive(Debug, Error)]
pub enum WriterError {
    /// The worker has stopped and no longer accepts tasks.
    #[error("audit log writer has shut down")]
    Closed,

    /// The worker task panicked or was cancelled.
    #[error("audit log writer failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
