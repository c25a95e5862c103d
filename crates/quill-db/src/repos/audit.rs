//! Audit log repository.
//!
//! Append-only: an entry row plus its label rows, written in one transaction.
//! Reads go through the filter resolver and query builder.

use std::collections::BTreeSet;

use quill_core::{AuditLogFilterContext, LogEntry};
use quill_render::RenderedEntry;
use tracing::warn;

use crate::QuillDb;
use crate::error::DatabaseError;
use crate::filters::{bind_values, resolve};
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, parse_enum};
use crate::query::{count_query, entries_query, labels_query};

impl QuillDb {
    /// Persist one rendered entry and its labels. Returns the new entry id.
    ///
    /// Entity, username, action and labels are lower-cased before writing.
    /// Reads are held off until the transaction has committed or rolled back.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any INSERT or the commit fails; nothing is
    /// written in that case.
    pub async fn append_entry(&self, entry: &RenderedEntry) -> Result<i64, DatabaseError> {
        let _gate = self.write_guard().await;
        let tx = self.writer.transaction().await?;
        match insert_entry(&tx, entry).await {
            Ok(id) => {
                tx.commit().await?;
                Ok(id)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "rollback of failed audit log write failed");
                }
                Err(e)
            }
        }
    }

    /// One page of entries matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be parsed.
    pub async fn query_entries(
        &self,
        filter: &AuditLogFilterContext,
    ) -> Result<Vec<LogEntry>, DatabaseError> {
        let predicates = resolve(filter);
        let sql = entries_query(filter, &predicates);
        let _gate = self.read_guard().await;
        let mut rows = self
            .conn
            .query(&sql, libsql::params_from_iter(bind_values(&predicates)))
            .await?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(LogEntry {
                id: row.get::<i64>(0)?,
                timestamp: parse_datetime(&row.get::<String>(1)?)?,
                entity: row.get::<String>(2)?,
                username: get_opt_string(&row, 3)?,
                action: parse_enum(&row.get::<String>(4)?)?,
                entry: row.get::<String>(5)?,
            });
        }
        Ok(entries)
    }

    /// Number of entries matching the filter, ignoring pagination.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_entries(&self, filter: &AuditLogFilterContext) -> Result<u64, DatabaseError> {
        let predicates = resolve(filter);
        let _gate = self.read_guard().await;
        let mut rows = self
            .conn
            .query(
                &count_query(&predicates),
                libsql::params_from_iter(bind_values(&predicates)),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let total = row.get::<i64>(0)?;
        u64::try_from(total)
            .map_err(|_| DatabaseError::InvalidState(format!("negative entry count {total}")))
    }

    /// Every distinct label ever attached to an entry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_labels(&self) -> Result<BTreeSet<String>, DatabaseError> {
        let _gate = self.read_guard().await;
        let mut rows = self.conn.query(labels_query(), ()).await?;
        let mut labels = BTreeSet::new();
        while let Some(row) = rows.next().await? {
            labels.insert(row.get::<String>(0)?);
        }
        Ok(labels)
    }
}

async fn insert_entry(tx: &libsql::Transaction, entry: &RenderedEntry) -> Result<i64, DatabaseError> {
    tx.execute(
        "INSERT INTO audit_log (timestamp, entity, username, action, entry)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            format_datetime(&entry.timestamp),
            entry.entity.to_lowercase(),
            entry.username.as_deref().map(str::to_lowercase),
            entry.action.as_str(),
            entry.text.as_str()
        ],
    )
    .await?;
    let id = tx.last_insert_rowid();

    for label in &entry.labels {
        tx.execute(
            "INSERT INTO audit_labels (audit_id, label) VALUES (?1, ?2)",
            libsql::params![id, label.to_lowercase()],
        )
        .await?;
    }
    Ok(id)
}
