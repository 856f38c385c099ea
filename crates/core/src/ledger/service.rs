//! Ledger entry manager for the per-event ledger.
//!
//! Creates, edits and soft-deletes charges and transactions on an event.
//! Every operation works on a clone of the event and returns it inside an
//! `Outcome`; the input event is never touched.

use caterbook_shared::types::{ChargeId, TransactionId};
use rust_decimal::Decimal;

use super::lock::{ensure_charge_open, ensure_ledger_open};
use super::transactions;
use super::types::TransactionInput;
use crate::audit::{AuditAction, AuditEntry, AuditTrail, ChangeSet, require_reason};
use crate::charges::{Charge, ChargeCalculator, ChargeInput, ChargeType};
use crate::context::{CommandContext, LedgerEntryRef, LedgerOwner, Notification, Outcome};
use crate::error::DomainError;
use crate::event::Event;
use crate::permissions::{PermissionGate, Scope};

/// Ledger service for charges and transactions on one event.
pub struct LedgerService;

impl LedgerService {
    // ========== Charges ==========

    /// Add a charge. Special types get their amount from the calculator.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `EventLocked`, `MenuFinalized`, or a
    /// validation error when the amount is not positive or an input is missing.
    pub fn create_charge(
        event: &Event,
        ctx: &CommandContext,
        input: ChargeInput,
    ) -> Result<Outcome<Event>, DomainError> {
        PermissionGate::require_modify(ctx.permissions(), Scope::FinanceCharges)?;
        ensure_charge_open(event, &input.charge_type)?;
        let amount = ChargeCalculator::billable_amount(&input, event.pricing_context())?;

        let id = ChargeId::new();
        let history = AuditTrail::starting_with(AuditEntry::created(
            ctx.actor(),
            ctx.now(),
            format!("Charge Added: {}", input.charge_type),
        ));

        let mut next = event.clone();
        next.charges.push(Charge::from_input(id, input, amount, history));
        next.updated_at = ctx.now();

        Ok(charge_outcome(next, id, AuditAction::Created))
    }

    /// Replace a live charge's values, recording the changed fields.
    ///
    /// Changing a menu charge's counter or template (or its type) clears the
    /// selections that were tied to the old one.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `EventLocked`, `ReasonRequired`,
    /// `ChargeNotFound`, `MenuFinalized` or a validation error.
    pub fn update_charge(
        event: &Event,
        ctx: &CommandContext,
        id: ChargeId,
        input: ChargeInput,
        reason: &str,
    ) -> Result<Outcome<Event>, DomainError> {
        PermissionGate::require_modify(ctx.permissions(), Scope::FinanceCharges)?;
        ensure_ledger_open(event)?;
        let reason = require_reason(reason)?;
        let current = event
            .active_charge(id)
            .ok_or(DomainError::ChargeNotFound(id))?;
        ensure_charge_open(event, &current.charge_type)?;
        ensure_charge_open(event, &input.charge_type)?;
        let amount = ChargeCalculator::billable_amount(&input, event.pricing_context())?;

        let changes = diff_charge(current, &input, amount);
        let released = released_selection(current, &input);

        let mut history = current.history.clone();
        history.append(AuditEntry::updated(
            ctx.actor(),
            ctx.now(),
            reason,
            changes.into_changes(),
        ));

        let mut next = event.clone();
        if let Some(slot) = next.charges.iter_mut().find(|c| c.id == id) {
            *slot = Charge::from_input(id, input, amount, history);
        }
        if let Some(selection) = released {
            clear_selection(&mut next, &selection);
        }
        next.updated_at = ctx.now();

        Ok(charge_outcome(next, id, AuditAction::Updated))
    }

    /// Soft-delete a live charge and drop the menu selections it unlocked.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `EventLocked`, `ReasonRequired`,
    /// `ChargeNotFound` or `MenuFinalized`.
    pub fn delete_charge(
        event: &Event,
        ctx: &CommandContext,
        id: ChargeId,
        reason: &str,
    ) -> Result<Outcome<Event>, DomainError> {
        PermissionGate::require_modify(ctx.permissions(), Scope::FinanceCharges)?;
        ensure_ledger_open(event)?;
        let reason = require_reason(reason)?;
        let current = event
            .active_charge(id)
            .ok_or(DomainError::ChargeNotFound(id))?;
        ensure_charge_open(event, &current.charge_type)?;
        let released = Selection::owned_by(current);

        let mut next = event.clone();
        if let Some(charge) = next.charges.iter_mut().find(|c| c.id == id) {
            charge.is_deleted = true;
            charge
                .history
                .append(AuditEntry::deleted(ctx.actor(), ctx.now(), reason));
        }
        if let Some(selection) = released {
            clear_selection(&mut next, &selection);
        }
        next.updated_at = ctx.now();

        Ok(charge_outcome(next, id, AuditAction::Deleted))
    }

    // ========== Transactions ==========

    /// Record a payment or expense.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `EventLocked` or a validation error.
    pub fn create_transaction(
        event: &Event,
        ctx: &CommandContext,
        input: TransactionInput,
    ) -> Result<Outcome<Event>, DomainError> {
        transactions::authorize(ctx, input.kind)?;
        ensure_ledger_open(event)?;

        let mut next = event.clone();
        let id = transactions::insert(&mut next.transactions, ctx, input)?;
        next.updated_at = ctx.now();

        Ok(transaction_outcome(next, id, AuditAction::Created))
    }

    /// Replace a live transaction's values.
    ///
    /// Both the scope of the stored entry and of the new values must be
    /// modifiable.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `EventLocked`, `ReasonRequired`,
    /// `TransactionNotFound` or a validation error.
    pub fn update_transaction(
        event: &Event,
        ctx: &CommandContext,
        id: TransactionId,
        input: TransactionInput,
        reason: &str,
    ) -> Result<Outcome<Event>, DomainError> {
        transactions::authorize(ctx, input.kind)?;
        ensure_ledger_open(event)?;

        let mut next = event.clone();
        transactions::amend(&mut next.transactions, ctx, id, input, reason)?;
        next.updated_at = ctx.now();

        Ok(transaction_outcome(next, id, AuditAction::Updated))
    }

    /// Soft-delete a live transaction.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `EventLocked`, `ReasonRequired` or
    /// `TransactionNotFound`.
    pub fn delete_transaction(
        event: &Event,
        ctx: &CommandContext,
        id: TransactionId,
        reason: &str,
    ) -> Result<Outcome<Event>, DomainError> {
        // The stored kind decides the scope; a missing entry surfaces as not found.
        if let Some(stored) = event.transactions.iter().find(|t| t.id == id) {
            transactions::authorize(ctx, stored.kind)?;
        }
        ensure_ledger_open(event)?;

        let mut next = event.clone();
        transactions::retire(&mut next.transactions, ctx, id, reason)?;
        next.updated_at = ctx.now();

        Ok(transaction_outcome(next, id, AuditAction::Deleted))
    }
}

/// Menu selection that exists only while a particular charge is live.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    LiveCounter(String),
    Cocktail,
    HiTea,
}

impl Selection {
    fn owned_by(charge: &Charge) -> Option<Self> {
        match charge.charge_type {
            ChargeType::LiveCounter => charge.live_counter_id.clone().map(Self::LiveCounter),
            ChargeType::CocktailMenu => Some(Self::Cocktail),
            ChargeType::HiTeaMenu => Some(Self::HiTea),
            _ => None,
        }
    }
}

/// The selection that an edit leaves without its owning charge, if any.
fn released_selection(current: &Charge, input: &ChargeInput) -> Option<Selection> {
    let owned = Selection::owned_by(current)?;
    let kept = current.charge_type == input.charge_type
        && match owned {
            Selection::LiveCounter(_) => current.live_counter_id == input.live_counter_id,
            Selection::Cocktail | Selection::HiTea => {
                current.menu_template_id == input.menu_template_id
            }
        };
    (!kept).then_some(owned)
}

fn clear_selection(event: &mut Event, selection: &Selection) {
    match selection {
        Selection::LiveCounter(counter_id) => {
            event.live_counter_items.remove(counter_id);
        }
        Selection::Cocktail => event.cocktail_menu_items.clear(),
        Selection::HiTea => event.hi_tea_menu_items.clear(),
    }
}

fn diff_charge(current: &Charge, input: &ChargeInput, amount: Decimal) -> ChangeSet {
    let mut changes = ChangeSet::new();
    changes.track("type", &current.charge_type, &input.charge_type);
    changes.track("amount", &current.amount, &amount);
    changes.track_opt("notes", current.notes.as_ref(), input.notes.as_ref());
    changes.track_opt("price", current.price.as_ref(), input.price.as_ref());
    changes.track_opt(
        "discountAmount",
        current.discount_amount.as_ref(),
        input.discount_amount.as_ref(),
    );
    changes.track_opt(
        "liveCounterId",
        current.live_counter_id.as_ref(),
        input.live_counter_id.as_ref(),
    );
    changes.track_opt(
        "menuTemplateId",
        current.menu_template_id.as_ref(),
        input.menu_template_id.as_ref(),
    );
    changes.track_opt(
        "cocktailPax",
        current.cocktail_pax.as_ref(),
        input.cocktail_pax.as_ref(),
    );
    changes.track_opt(
        "corkageCharges",
        current.corkage_charges.as_ref(),
        input.corkage_charges.as_ref(),
    );
    changes.track_opt(
        "additionalPaxCount",
        current.additional_pax_count.as_ref(),
        input.additional_pax_count.as_ref(),
    );
    changes
}

fn charge_outcome(event: Event, id: ChargeId, action: AuditAction) -> Outcome<Event> {
    let notification = Notification::LedgerChanged {
        owner: LedgerOwner::Event(event.id),
        entry: LedgerEntryRef::Charge(id),
        action,
    };
    Outcome::event_saved(event, notification)
}

fn transaction_outcome(event: Event, id: TransactionId, action: AuditAction) -> Outcome<Event> {
    let notification = Notification::LedgerChanged {
        owner: LedgerOwner::Event(event.id),
        entry: LedgerEntryRef::Transaction(id),
        action,
    };
    Outcome::event_saved(event, notification)
}
