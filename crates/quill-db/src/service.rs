//! The audit log service.
//!
//! `AuditLogService` owns the store and the single-writer queue. Entry creation
//! is asynchronous and best-effort; reads are permission-gated and run on the
//! caller's task, concurrently with the writer.

use std::collections::BTreeSet;
use std::sync::Arc;

use quill_config::QuillConfig;
use quill_core::{
    AuditLogFilterContext, EntryCreationContext, LogEntry, PermissionChecker, TypeRegistry,
};
use quill_render::EntryGenerator;
use tracing::error;

use crate::QuillDb;
use crate::error::{AuditLogError, DatabaseError, WriterError};
use crate::writer::EntryWriter;

pub struct AuditLogService {
    db: Arc<QuillDb>,
    writer: EntryWriter,
    permissions: Arc<dyn PermissionChecker>,
}

impl AuditLogService {
    /// Wrap an open database and start the writer.
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn new(
        db: QuillDb,
        registry: Arc<TypeRegistry>,
        permissions: Arc<dyn PermissionChecker>,
        queue_capacity: usize,
    ) -> Self {
        let db = Arc::new(db);
        let writer = EntryWriter::spawn(
            Arc::clone(&db),
            EntryGenerator::new(registry),
            queue_capacity,
        );
        Self {
            db,
            writer,
            permissions,
        }
    }

    /// Open a local database (or `":memory:"`) and start the writer.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn open_local(
        path: &str,
        registry: Arc<TypeRegistry>,
        permissions: Arc<dyn PermissionChecker>,
        queue_capacity: usize,
    ) -> Result<Self, DatabaseError> {
        let db = QuillDb::open_local(path).await?;
        Ok(Self::new(db, registry, permissions, queue_capacity))
    }

    /// Open the database and size the queue from configuration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn from_config(
        config: &QuillConfig,
        registry: Arc<TypeRegistry>,
        permissions: Arc<dyn PermissionChecker>,
    ) -> Result<Self, DatabaseError> {
        Self::open_local(
            &config.database.path,
            registry,
            permissions,
            config.writer.queue_capacity,
        )
        .await
    }

    #[must_use]
    pub fn db(&self) -> &QuillDb {
        &self.db
    }

    /// Queue an audit entry for the given principal.
    ///
    /// Returns once the task is queued. Rendering and persistence happen on the
    /// writer; their failures are logged there and never reach the caller.
    pub async fn create_entry(&self, username: Option<&str>, context: EntryCreationContext) {
        let action = context.action();
        if let Err(e) = self
            .writer
            .submit(username.map(str::to_string), context)
            .await
        {
            error!(%action, error = %e, "could not queue audit log entry");
        }
    }

    /// Wait until every entry queued so far has been processed.
    ///
    /// # Errors
    ///
    /// Returns `WriterError::Closed` if the writer has stopped.
    pub async fn flush(&self) -> Result<(), WriterError> {
        self.writer.flush().await
    }

    /// Stop accepting entries and wait for the queue to drain.
    ///
    /// # Errors
    ///
    /// Returns `WriterError` if the writer task failed.
    pub async fn shutdown(self) -> Result<(), WriterError> {
        self.writer.shutdown().await
    }

    /// Non-failing form of the read permission check.
    #[must_use]
    pub fn may_read(&self) -> bool {
        self.permissions.may_read()
    }

    /// # Errors
    ///
    /// `Unauthorized` without read permission, `Unavailable` if the query fails.
    pub async fn get_entries(
        &self,
        filter: &AuditLogFilterContext,
    ) -> Result<Vec<LogEntry>, AuditLogError> {
        self.permissions.check_read()?;
        self.db
            .query_entries(filter)
            .await
            .map_err(|e| AuditLogError::unavailable("read audit log", e))
    }

    /// # Errors
    ///
    /// `Unauthorized` without read permission, `Unavailable` if the query fails.
    pub async fn get_total_entries(
        &self,
        filter: &AuditLogFilterContext,
    ) -> Result<u64, AuditLogError> {
        self.permissions.check_read()?;
        self.db
            .count_entries(filter)
            .await
            .map_err(|e| AuditLogError::unavailable("count audit log entries", e))
    }

    /// # Errors
    ///
    /// `Unauthorized` without read permission, `Unavailable` if the query fails.
    pub async fn get_labels(&self) -> Result<BTreeSet<String>, AuditLogError> {
        self.permissions.check_read()?;
        self.db
            .list_labels()
            .await
            .map_err(|e| AuditLogError::unavailable("collect audit log labels", e))
    }
}
