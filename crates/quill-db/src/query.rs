//! SQL text for the three read shapes.
//!
//! Pure functions of the filter context and resolved predicates. Values are
//! always bound; only the typed `LIMIT`/`OFFSET` integers are inlined.

use quill_core::AuditLogFilterContext;

use crate::filters::Predicate;

const ENTRY_COLUMNS: &str = "id, timestamp, entity, username, action, entry";

/// `WHERE a AND b ...`, or empty when there are no predicates.
#[must_use]
pub fn where_clause(predicates: &[Predicate]) -> String {
    if predicates.is_empty() {
        return String::new();
    }
    let clauses: Vec<&str> = predicates.iter().map(|p| p.clause).collect();
    format!(" WHERE {}", clauses.join(" AND "))
}

/// Newest first, one page.
#[must_use]
pub fn entries_query(ctx: &AuditLogFilterContext, predicates: &[Predicate]) -> String {
    format!(
        "SELECT {ENTRY_COLUMNS} FROM audit_log{} ORDER BY id DESC LIMIT {} OFFSET {}",
        where_clause(predicates),
        ctx.limit(),
        ctx.offset()
    )
}

#[must_use]
pub fn count_query(predicates: &[Predicate]) -> String {
    format!("SELECT COUNT(*) FROM audit_log{}", where_clause(predicates))
}

/// Distinct labels across all entries, unfiltered.
#[must_use]
pub const fn labels_query() -> &'static str {
    "SELECT DISTINCT label FROM audit_labels ORDER BY label"
}
