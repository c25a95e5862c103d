use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::Action;

/// One persisted audit entry. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    /// UTC, second precision.
    pub timestamp: DateTime<Utc>,
    /// Lowercased entity name.
    pub entity: String,
    /// Lowercased principal; `None` for system operations.
    pub username: Option<String>,
    pub action: Action,
    /// Rendered header plus optional diff block.
    pub entry: String,
}
