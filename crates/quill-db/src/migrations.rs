//! Database migration runner.
//!
//! Embeds the SQL migration at compile time and executes it on open. All
//! statements use `IF NOT EXISTS`, so re-running is harmless.

use crate::QuillDb;
use crate::error::DatabaseError;

/// Initial schema: `audit_log`, `audit_labels` and their indexes.
const MIGRATION_001: &str = include_str!("../migrations/001_initial.sql");

impl QuillDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_initial: {e}")))?;
        Ok(())
    }
}
