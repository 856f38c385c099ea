//! Domain error types for event lifecycle and ledger operations.
//!
//! Every command in this crate fails fast with a `DomainError` before
//! touching the aggregate, so an error always means "nothing changed".

use caterbook_shared::AppError;
use caterbook_shared::types::{ChargeId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::event::{EventState, EventStatus};
use crate::permissions::{PermissionLevel, Scope};

/// Coarse classification of a `DomainError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected locally.
    Validation,
    /// Permission level insufficient.
    PermissionDenied,
    /// Event state or status forbids the mutation.
    Locked,
    /// Referenced entry missing or soft-deleted.
    NotFound,
    /// No resolvable actor identity.
    Authentication,
}

/// Errors that can occur while applying a command to an aggregate.
#[derive(Debug, Error)]
pub enum DomainError {
    // ========== Validation Errors ==========
    /// Amount must be strictly positive.
    #[error("{field} must be greater than zero, got {amount}")]
    NonPositiveAmount {
        /// The offending field.
        field: &'static str,
        /// The rejected amount.
        amount: Decimal,
    },

    /// A numeric input cannot be negative.
    #[error("{field} cannot be negative")]
    NegativeValue {
        /// The offending field.
        field: &'static str,
    },

    /// A required field was not supplied.
    #[error("{field} is required")]
    MissingField {
        /// The missing field.
        field: &'static str,
    },

    /// A field was supplied that does not belong to this entry kind.
    #[error("{field} is not allowed here")]
    UnexpectedField {
        /// The offending field.
        field: &'static str,
    },

    /// Edit and delete operations require a reason.
    #[error("A reason is required for this change")]
    ReasonRequired,

    /// The lifecycle does not allow this state change.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        /// The current state.
        from: EventState,
        /// The requested state.
        to: EventState,
    },

    /// The menu status does not allow this change.
    #[error("Menu is already {0}")]
    InvalidStatusChange(EventStatus),

    /// A lost transition needs a reason code from the configured list.
    #[error("Lost reason code is required")]
    LostReasonRequired,

    /// Reason code is not part of the configured list.
    #[error("Unknown lost reason: {0}")]
    UnknownLostReason(String),

    /// Reason code is competition-flagged and needs a competitor.
    #[error("Lost reason {0} requires a competitor")]
    CompetitorRequired(String),

    /// Menu selections for a sub-menu need a live charge of that type.
    #[error("No active {0} charge for this selection")]
    SubMenuUnavailable(String),

    // ========== Permission Errors ==========
    /// The caller's level on a scope is insufficient.
    #[error("{scope} requires {required} permission, caller has {actual}")]
    PermissionDenied {
        /// The scope being checked.
        scope: Scope,
        /// The level required.
        required: PermissionLevel,
        /// The caller's level.
        actual: PermissionLevel,
    },

    /// Cancelling events is a separate capability.
    #[error("Caller is not allowed to cancel events")]
    CancellationNotAllowed,

    // ========== Lock Errors ==========
    /// The event is lost or cancelled.
    #[error("Event is {0} and can no longer be modified")]
    EventLocked(EventState),

    /// The menu is finalized; menu-gating entries are read-only.
    #[error("Menu is finalized; menu charges are read-only")]
    MenuFinalized,

    // ========== Lookup Errors ==========
    /// Charge missing or already deleted.
    #[error("Charge {0} not found")]
    ChargeNotFound(ChargeId),

    /// Transaction missing or already deleted.
    #[error("Transaction {0} not found")]
    TransactionNotFound(TransactionId),

    // ========== Identity Errors ==========
    /// No actor identity could be resolved.
    #[error("No authenticated actor")]
    Unauthenticated,
}

impl DomainError {
    /// Returns the coarse error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NonPositiveAmount { .. }
            | Self::NegativeValue { .. }
            | Self::MissingField { .. }
            | Self::UnexpectedField { .. }
            | Self::ReasonRequired
            | Self::InvalidTransition { .. }
            | Self::InvalidStatusChange(_)
            | Self::LostReasonRequired
            | Self::UnknownLostReason(_)
            | Self::CompetitorRequired(_)
            | Self::SubMenuUnavailable(_) => ErrorKind::Validation,

            Self::PermissionDenied { .. } | Self::CancellationNotAllowed => {
                ErrorKind::PermissionDenied
            }

            Self::EventLocked(_) | Self::MenuFinalized => ErrorKind::Locked,

            Self::ChargeNotFound(_) | Self::TransactionNotFound(_) => ErrorKind::NotFound,

            Self::Unauthenticated => ErrorKind::Authentication,
        }
    }

    /// Returns the offending field, when one can be named.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::NonPositiveAmount { field, .. }
            | Self::NegativeValue { field }
            | Self::MissingField { field }
            | Self::UnexpectedField { field } => Some(*field),
            Self::ReasonRequired => Some("reason"),
            Self::LostReasonRequired | Self::UnknownLostReason(_) => Some("reasonCode"),
            Self::CompetitorRequired(_) => Some("competitor"),
            _ => None,
        }
    }

    /// Returns the error code for caller-side rendering.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount { .. } => "NON_POSITIVE_AMOUNT",
            Self::NegativeValue { .. } => "NEGATIVE_VALUE",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::UnexpectedField { .. } => "UNEXPECTED_FIELD",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InvalidStatusChange(_) => "INVALID_STATUS_CHANGE",
            Self::LostReasonRequired => "LOST_REASON_REQUIRED",
            Self::UnknownLostReason(_) => "UNKNOWN_LOST_REASON",
            Self::CompetitorRequired(_) => "COMPETITOR_REQUIRED",
            Self::SubMenuUnavailable(_) => "SUB_MENU_UNAVAILABLE",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::CancellationNotAllowed => "CANCELLATION_NOT_ALLOWED",
            Self::EventLocked(_) => "EVENT_LOCKED",
            Self::MenuFinalized => "MENU_FINALIZED",
            Self::ChargeNotFound(_) => "CHARGE_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation {
                field: err.field().map(str::to_string),
                message,
            },
            ErrorKind::PermissionDenied => Self::Forbidden(message),
            ErrorKind::Locked => Self::Locked(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Authentication => Self::Unauthorized(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_required_is_validation() {
        let err = DomainError::ReasonRequired;
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.field(), Some("reason"));
        assert_eq!(err.error_code(), "REASON_REQUIRED");
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = DomainError::InvalidTransition {
            from: EventState::Lost,
            to: EventState::Confirmed,
        };
        assert!(err.to_string().contains("lost"));
        assert!(err.to_string().contains("confirmed"));
    }

    #[test]
    fn test_permission_denied_maps_to_forbidden() {
        let err = DomainError::PermissionDenied {
            scope: Scope::FinancePayments,
            required: PermissionLevel::Modify,
            actual: PermissionLevel::View,
        };
        let app: AppError = err.into();
        assert_eq!(app.status_code(), 403);
        assert!(app.to_string().contains("financePayments"));
    }

    #[test]
    fn test_locked_maps_to_locked() {
        let app: AppError = DomainError::EventLocked(EventState::Cancelled).into();
        assert!(matches!(app, AppError::Locked(_)));
    }

    #[test]
    fn test_validation_keeps_field() {
        let app: AppError = DomainError::MissingField {
            field: "paymentMode",
        }
        .into();
        assert_eq!(app.field(), Some("paymentMode"));
    }

    #[test]
    fn test_not_found_and_auth_kinds() {
        assert_eq!(
            DomainError::ChargeNotFound(ChargeId::new()).kind(),
            ErrorKind::NotFound
        );
        let app: AppError = DomainError::Unauthenticated.into();
        assert_eq!(app.status_code(), 401);
    }
}
