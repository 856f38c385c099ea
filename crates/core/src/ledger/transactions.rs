//! Transaction ledger operations shared by event and client ledgers.
//!
//! These helpers operate on the raw `Vec<Transaction>` of an aggregate the
//! caller has already cloned; the caller owns lock checks.

use caterbook_shared::types::TransactionId;

use super::types::{Transaction, TransactionInput, TransactionType};
use crate::audit::{AuditEntry, AuditTrail, ChangeSet, require_reason};
use crate::context::CommandContext;
use crate::error::DomainError;
use crate::permissions::PermissionGate;

/// Require `modify` on the scope governing `kind`.
///
/// # Errors
///
/// Returns `DomainError::PermissionDenied`.
pub fn authorize(ctx: &CommandContext, kind: TransactionType) -> Result<(), DomainError> {
    PermissionGate::require_modify(ctx.permissions(), PermissionGate::transaction_scope(kind))
}

fn created_reason(input: &TransactionInput) -> String {
    match input.kind {
        TransactionType::Income => match input.payment_mode {
            Some(mode) => format!("Payment Received: {mode}"),
            None => "Payment Received".to_string(),
        },
        TransactionType::Expense => format!(
            "Expense Added: {}",
            input.normalized_category().unwrap_or_default()
        ),
    }
}

fn position(entries: &[Transaction], id: TransactionId) -> Result<usize, DomainError> {
    entries
        .iter()
        .position(|t| t.id == id && t.is_active())
        .ok_or(DomainError::TransactionNotFound(id))
}

/// Validate and append a new transaction.
///
/// # Errors
///
/// Returns validation errors from `TransactionInput::validate`.
pub fn insert(
    entries: &mut Vec<Transaction>,
    ctx: &CommandContext,
    input: TransactionInput,
) -> Result<TransactionId, DomainError> {
    input.validate()?;

    let id = TransactionId::new();
    let history = AuditTrail::starting_with(AuditEntry::created(
        ctx.actor(),
        ctx.now(),
        created_reason(&input),
    ));
    let category = input.normalized_category();

    entries.push(Transaction {
        id,
        kind: input.kind,
        date: input.date,
        amount: input.amount,
        payment_mode: input.payment_mode,
        category,
        notes: input.notes,
        is_deleted: false,
        history,
    });
    Ok(id)
}

/// Replace a live transaction's values, recording only the changed fields.
///
/// # Errors
///
/// Returns `ReasonRequired`, `TransactionNotFound`, `PermissionDenied`
/// (for the existing entry's scope), or input validation errors.
pub fn amend(
    entries: &mut [Transaction],
    ctx: &CommandContext,
    id: TransactionId,
    input: TransactionInput,
    reason: &str,
) -> Result<(), DomainError> {
    let reason = require_reason(reason)?;
    let idx = position(entries, id)?;
    authorize(ctx, entries[idx].kind)?;
    input.validate()?;

    let category = input.normalized_category();
    let current = &entries[idx];

    let mut changes = ChangeSet::new();
    changes.track("type", &current.kind, &input.kind);
    changes.track("amount", &current.amount, &input.amount);
    changes.track("date", &current.date, &input.date);
    changes.track_opt(
        "paymentMode",
        current.payment_mode.as_ref(),
        input.payment_mode.as_ref(),
    );
    changes.track_opt("category", current.category.as_ref(), category.as_ref());
    changes.track_opt("notes", current.notes.as_ref(), input.notes.as_ref());

    let entry = &mut entries[idx];
    entry.kind = input.kind;
    entry.amount = input.amount;
    entry.date = input.date;
    entry.payment_mode = input.payment_mode;
    entry.category = category;
    entry.notes = input.notes;
    entry.history.append(AuditEntry::updated(
        ctx.actor(),
        ctx.now(),
        reason,
        changes.into_changes(),
    ));
    Ok(())
}

/// Soft-delete a live transaction.
///
/// # Errors
///
/// Returns `ReasonRequired`, `TransactionNotFound` or `PermissionDenied`.
pub fn retire(
    entries: &mut [Transaction],
    ctx: &CommandContext,
    id: TransactionId,
    reason: &str,
) -> Result<(), DomainError> {
    let reason = require_reason(reason)?;
    let idx = position(entries, id)?;
    authorize(ctx, entries[idx].kind)?;

    let entry = &mut entries[idx];
    entry.is_deleted = true;
    entry
        .history
        .append(AuditEntry::deleted(ctx.actor(), ctx.now(), reason));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditAction;
    use crate::context::Actor;
    use crate::ledger::PaymentMode;
    use crate::permissions::{AppPermissions, PermissionLevel, Scope};
    use caterbook_shared::types::UserId;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn ctx(permissions: AppPermissions) -> CommandContext {
        CommandContext::new(Some(Actor::new(UserId::new(), "Ravi")), permissions, Utc::now())
            .unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    #[test]
    fn test_insert_synthesizes_reason() {
        let mut entries = vec![];
        let ctx = ctx(AppPermissions::full());
        insert(
            &mut entries,
            &ctx,
            TransactionInput::income(day(), dec!(5000), PaymentMode::Cash),
        )
        .unwrap();
        let created = &entries[0].history.entries()[0];
        assert_eq!(created.action, AuditAction::Created);
        assert_eq!(created.reason, "Payment Received: Cash");
    }

    #[test]
    fn test_amend_records_only_changed_fields() {
        let mut entries = vec![];
        let ctx = ctx(AppPermissions::full());
        let id = insert(
            &mut entries,
            &ctx,
            TransactionInput::expense(day(), dec!(800), "Transport"),
        )
        .unwrap();

        amend(
            &mut entries,
            &ctx,
            id,
            TransactionInput::expense(day(), dec!(950), "Transport"),
            "fuel receipt corrected",
        )
        .unwrap();

        let last = entries[0].history.last().unwrap();
        let changes = last.changes.as_ref().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "amount");
        assert_eq!(changes[0].to.as_deref(), Some("950"));
        assert_eq!(last.reason, "fuel receipt corrected");
    }

    #[test]
    fn test_amend_checks_existing_scope() {
        let mut entries = vec![];
        let id = insert(
            &mut entries,
            &ctx(AppPermissions::full()),
            TransactionInput::expense(day(), dec!(800), "Staff"),
        )
        .unwrap();

        let limited = ctx(AppPermissions::full().with(Scope::FinanceExpenses, PermissionLevel::View));
        let result = amend(
            &mut entries,
            &limited,
            id,
            TransactionInput::income(day(), dec!(800), PaymentMode::Cash),
            "was actually a refund",
        );
        assert!(matches!(
            result,
            Err(DomainError::PermissionDenied {
                scope: Scope::FinanceExpenses,
                ..
            })
        ));
    }

    #[test]
    fn test_retire_twice_is_not_found() {
        let mut entries = vec![];
        let ctx = ctx(AppPermissions::full());
        let id = insert(
            &mut entries,
            &ctx,
            TransactionInput::income(day(), dec!(100), PaymentMode::Card),
        )
        .unwrap();
        retire(&mut entries, &ctx, id, "duplicate entry").unwrap();
        assert!(matches!(
            retire(&mut entries, &ctx, id, "again"),
            Err(DomainError::TransactionNotFound(_))
        ));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_deleted);
    }
}
