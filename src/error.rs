//! The closed set of error kinds surfaced to callers.
//!
//! Backend-level faults never leak: everything sqlx can produce collapses
//! into `BackendUnavailable`, which tells the caller "retry later" as
//! opposed to the terminal business outcomes.

use crate::auth::permissions::Capability;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A field failed its grammar; nothing was written.
    #[error("invalid {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    /// No product record with the given id.
    #[error("no product with id {0}")]
    NotFound(i64),

    /// The session lacks the capability required for the operation.
    #[error("operation requires the '{0}' capability")]
    Unauthorized(Capability),

    /// Unknown user or wrong password; deliberately non-distinguishing.
    #[error("invalid credentials")]
    AuthenticationDenied,

    /// Connectivity or backend fault; the caller may retry.
    #[error("backend unavailable")]
    BackendUnavailable,
}

impl CoreError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::ValidationFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "database error");
        CoreError::BackendUnavailable
    }
}
