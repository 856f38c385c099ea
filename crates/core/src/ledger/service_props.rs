//! Property-based tests for LedgerService.
//!
//! - Audit trails only ever grow, and earlier entries never change.
//! - Edits and deletes without a reason fail and change nothing.

use caterbook_shared::types::UserId;
use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::LedgerService;
use super::types::{PaymentMode, TransactionInput};
use crate::charges::ChargeInput;
use crate::context::{Actor, CommandContext};
use crate::error::DomainError;
use crate::event::Event;
use crate::event::types::fixtures::lead_event;
use crate::permissions::AppPermissions;

/// Strategy to generate positive amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate whitespace-only reasons, including the empty one.
fn blank_reason() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\n')], 0..6)
        .prop_map(|chars| chars.into_iter().collect())
}

fn ctx() -> CommandContext {
    CommandContext::new(
        Some(Actor::new(UserId::new(), "Property Tester")),
        AppPermissions::full(),
        Utc::now(),
    )
    .unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 12, 1).unwrap()
}

fn event_with_payment(amount: Decimal) -> Event {
    LedgerService::create_transaction(
        &lead_event(),
        &ctx(),
        TransactionInput::income(day(), amount, PaymentMode::Cash),
    )
    .unwrap()
    .into_aggregate()
}

fn event_with_charge(amount: Decimal) -> Event {
    LedgerService::create_charge(&lead_event(), &ctx(), ChargeInput::custom("Decor", amount))
        .unwrap()
        .into_aggregate()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any sequence of edits followed by a delete strictly grows the trail
    /// and leaves every earlier entry as it was.
    #[test]
    fn prop_audit_trail_is_append_only(
        initial in positive_amount(),
        edits in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let ctx = ctx();
        let mut event = event_with_payment(initial);
        let id = event.transactions[0].id;

        for amount in edits {
            let before = event.transactions[0].history.clone();
            event = LedgerService::update_transaction(
                &event,
                &ctx,
                id,
                TransactionInput::income(day(), amount, PaymentMode::Cash),
                "corrected amount",
            )
            .unwrap()
            .into_aggregate();

            let after = &event.transactions[0].history;
            prop_assert_eq!(after.len(), before.len() + 1);
            prop_assert_eq!(&after.entries()[..before.len()], before.entries());
        }

        let before = event.transactions[0].history.clone();
        event = LedgerService::delete_transaction(&event, &ctx, id, "refunded")
            .unwrap()
            .into_aggregate();
        let after = &event.transactions[0].history;
        prop_assert_eq!(after.len(), before.len() + 1);
        prop_assert_eq!(&after.entries()[..before.len()], before.entries());
    }

    /// Blank reasons on transaction edits and deletes are rejected.
    #[test]
    fn prop_transaction_reason_required(
        amount in positive_amount(),
        new_amount in positive_amount(),
        reason in blank_reason(),
    ) {
        let event = event_with_payment(amount);
        let snapshot = event.clone();
        let id = event.transactions[0].id;

        let update = LedgerService::update_transaction(
            &event,
            &ctx(),
            id,
            TransactionInput::income(day(), new_amount, PaymentMode::Upi),
            &reason,
        );
        prop_assert!(matches!(update, Err(DomainError::ReasonRequired)));

        let delete = LedgerService::delete_transaction(&event, &ctx(), id, &reason);
        prop_assert!(matches!(delete, Err(DomainError::ReasonRequired)));

        prop_assert_eq!(event, snapshot);
    }

    /// Blank reasons on charge edits and deletes are rejected.
    #[test]
    fn prop_charge_reason_required(
        amount in positive_amount(),
        new_amount in positive_amount(),
        reason in blank_reason(),
    ) {
        let event = event_with_charge(amount);
        let snapshot = event.clone();
        let id = event.charges[0].id;

        let update = LedgerService::update_charge(
            &event,
            &ctx(),
            id,
            ChargeInput::custom("Decor", new_amount),
            &reason,
        );
        prop_assert!(matches!(update, Err(DomainError::ReasonRequired)));

        let delete = LedgerService::delete_charge(&event, &ctx(), id, &reason);
        prop_assert!(matches!(delete, Err(DomainError::ReasonRequired)));

        prop_assert_eq!(event, snapshot);
    }
}
