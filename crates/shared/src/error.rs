//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Domain and store errors convert into this taxonomy at the service boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// No resolvable actor identity.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Permission level insufficient for the operation.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before any mutation.
    #[error("Validation error: {message}")]
    Validation {
        /// The offending field, when one can be named.
        field: Option<String>,
        /// Human readable message.
        message: String,
    },

    /// The event's state or status forbids the mutation.
    #[error("Locked: {0}")]
    Locked(String),

    /// Stale write (version mismatch).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Document store failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl AppError {
    /// Creates a validation error bound to a field.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Returns the HTTP-equivalent status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation { .. } => 400,
            Self::Locked(_) => 423,
            Self::Conflict(_) => 409,
            Self::Store(_) => 503,
        }
    }

    /// Returns the error code for caller-side rendering.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Locked(_) => "LOCKED",
            Self::Conflict(_) => "CONFLICT",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the offending field for validation errors.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}
