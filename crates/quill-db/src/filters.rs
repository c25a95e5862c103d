//! Filter resolution.
//!
//! Turns the optional criteria of an [`AuditLogFilterContext`] into an ordered
//! list of predicates. Emission order is fixed (from, to, entity, username,
//! label, action) and bind order follows it, so query text is deterministic.

use quill_core::AuditLogFilterContext;

use crate::helpers::format_day_start;

/// One `WHERE` conjunct and the value bound to its single placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub clause: &'static str,
    pub value: String,
}

impl Predicate {
    const fn new(clause: &'static str, value: String) -> Self {
        Self { clause, value }
    }
}

pub const FROM_CLAUSE: &str = "timestamp >= ?";
pub const TO_CLAUSE: &str = "timestamp < ?";
pub const ENTITY_CLAUSE: &str = "entity LIKE ?";
pub const USERNAME_CLAUSE: &str = "username LIKE ?";
pub const LABEL_CLAUSE: &str = "id IN (SELECT audit_id FROM audit_labels WHERE label LIKE ?)";
pub const ACTION_CLAUSE: &str = "action LIKE ?";

/// Resolve the present filter dimensions into predicates.
///
/// `to` is used as-is: the filter context already moved it to the following day.
#[must_use]
pub fn resolve(ctx: &AuditLogFilterContext) -> Vec<Predicate> {
    let mut predicates = Vec::new();
    if !ctx.has_content_filter() {
        return predicates;
    }
    if let Some(from) = ctx.from() {
        predicates.push(Predicate::new(FROM_CLAUSE, format_day_start(from)));
    }
    if let Some(to) = ctx.to() {
        predicates.push(Predicate::new(TO_CLAUSE, format_day_start(to)));
    }
    let textual = [
        (ENTITY_CLAUSE, ctx.entity()),
        (USERNAME_CLAUSE, ctx.username()),
        (LABEL_CLAUSE, ctx.label()),
        (ACTION_CLAUSE, ctx.action()),
    ];
    for (clause, value) in textual {
        if let Some(value) = value {
            predicates.push(Predicate::new(clause, normalize_value(value)));
        }
    }
    predicates
}

/// Lower-case and translate the `*` wildcard to SQL `%`.
#[must_use]
pub fn normalize_value(value: &str) -> String {
    value.to_lowercase().replace('*', "%")
}

/// Bound values in placeholder order.
#[must_use]
pub fn bind_values(predicates: &[Predicate]) -> Vec<libsql::Value> {
    predicates
        .iter()
        .map(|predicate| libsql::Value::Text(predicate.value.clone()))
        .collect()
}
