//! Store error types.

use caterbook_shared::AppError;
use thiserror::Error;

use crate::document::Collection;

/// Errors raised at the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be reached. Retry policy belongs to the caller.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// No document with that identifier.
    #[error("{collection}/{id} not found")]
    NotFound {
        /// Collection searched.
        collection: Collection,
        /// Document identifier.
        id: String,
    },

    /// A document with that identifier already exists.
    #[error("{collection}/{id} already exists")]
    AlreadyExists {
        /// Target collection.
        collection: Collection,
        /// Document identifier.
        id: String,
    },

    /// The document changed since the caller read it.
    #[error("{collection}/{id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        /// Target collection.
        collection: Collection,
        /// Document identifier.
        id: String,
        /// Version the caller read.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// Document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns the error code for caller-side rendering.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "STORE_UNAVAILABLE",
            Self::NotFound { .. } => "DOCUMENT_NOT_FOUND",
            Self::AlreadyExists { .. } => "DOCUMENT_EXISTS",
            Self::VersionConflict { .. } => "VERSION_CONFLICT",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::NotFound { .. } => Self::NotFound(message),
            StoreError::AlreadyExists { .. } | StoreError::VersionConflict { .. } => {
                Self::Conflict(message)
            }
            StoreError::Unavailable(_) | StoreError::Serialization(_) => Self::Store(message),
        }
    }
}
