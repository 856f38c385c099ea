//! Per-operation permission checks.

use super::types::{AppPermissions, PermissionLevel, Scope};
use crate::error::DomainError;
use crate::ledger::TransactionType;

/// Stateless checks against an `AppPermissions` snapshot.
pub struct PermissionGate;

impl PermissionGate {
    /// Require `modify` on `scope`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PermissionDenied` when the level is lower.
    pub fn require_modify(permissions: &AppPermissions, scope: Scope) -> Result<(), DomainError> {
        Self::require(permissions, scope, PermissionLevel::Modify)
    }

    /// Require at least `view` on `scope`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PermissionDenied` when the scope is hidden.
    pub fn require_view(permissions: &AppPermissions, scope: Scope) -> Result<(), DomainError> {
        Self::require(permissions, scope, PermissionLevel::View)
    }

    fn require(
        permissions: &AppPermissions,
        scope: Scope,
        required: PermissionLevel,
    ) -> Result<(), DomainError> {
        let actual = permissions.level(scope);
        if actual < required {
            return Err(DomainError::PermissionDenied {
                scope,
                required,
                actual,
            });
        }
        Ok(())
    }

    /// Require the cancellation capability on top of event modify rights.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `CancellationNotAllowed`.
    pub fn require_cancellation(permissions: &AppPermissions) -> Result<(), DomainError> {
        Self::require_modify(permissions, Scope::ClientsAndEvents)?;
        if !permissions.allow_event_cancellation {
            return Err(DomainError::CancellationNotAllowed);
        }
        Ok(())
    }

    /// Whether the scope is shown to the caller at all.
    #[must_use]
    pub fn is_visible(permissions: &AppPermissions, scope: Scope) -> bool {
        permissions.level(scope) >= PermissionLevel::View
    }

    /// Whether the caller may mutate the scope.
    #[must_use]
    pub fn can_modify(permissions: &AppPermissions, scope: Scope) -> bool {
        permissions.level(scope) == PermissionLevel::Modify
    }

    /// The scope governing a transaction type.
    #[must_use]
    pub fn transaction_scope(kind: TransactionType) -> Scope {
        match kind {
            TransactionType::Income => Scope::FinancePayments,
            TransactionType::Expense => Scope::FinanceExpenses,
        }
    }
}
