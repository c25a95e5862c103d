//! Cross-cutting error types for Quill.
//!
//! Storage errors (`DatabaseError`) and the service-level `AuditLogError`
//! live in `quill-db`. This module holds the errors any crate may raise while
//! building domain values, plus the authorization error of the permission gate.

use thiserror::Error;

/// Errors raised while constructing or validating core values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (range, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A date filter was not a calendar date.
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// A tracked object could not be turned into a snapshot.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Serializing a tracked object failed.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// A read was attempted without the audit log read permission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("not authorized to read the audit log (missing '{permission}')")]
pub struct AuthorizationError {
    pub permission: &'static str,
}
