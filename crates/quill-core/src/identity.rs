use crate::errors::AuthorizationError;

/// Permission name guarding every audit log read.
pub const READ_PERMISSION: &str = "auditLog:read";

/// Boolean permission gate consulted on every read path.
///
/// Implementations answer for whoever the caller is acting as; the audit log
/// never inspects the subject itself.
pub trait PermissionChecker: Send + Sync {
    /// Whether the current subject may read the audit log.
    fn may_read(&self) -> bool;

    /// Erroring form of [`may_read`](Self::may_read).
    ///
    /// # Errors
    ///
    /// Returns `AuthorizationError` when the read permission is missing.
    fn check_read(&self) -> Result<(), AuthorizationError> {
        if self.may_read() {
            Ok(())
        } else {
            Err(AuthorizationError {
                permission: READ_PERMISSION,
            })
        }
    }
}

/// Fixed answer, for operator tooling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticPermission {
    granted: bool,
}

impl StaticPermission {
    #[must_use]
    pub const fn granted() -> Self {
        Self { granted: true }
    }

    #[must_use]
    pub const fn denied() -> Self {
        Self { granted: false }
    }
}

impl PermissionChecker for StaticPermission {
    fn may_read(&self) -> bool {
        self.granted
    }
}
