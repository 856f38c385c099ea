//! Property-based tests for the financial aggregator.
//!
//! - Summarizing twice gives the same answer.
//! - Soft-deleted entries never contribute, whatever their amount.

use caterbook_shared::types::{ChargeId, TransactionId};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregator::FinancialAggregator;
use crate::audit::AuditTrail;
use crate::charges::{Charge, ChargeInput};
use crate::event::Event;
use crate::event::types::fixtures::lead_event;
use crate::ledger::{PaymentMode, Transaction, TransactionType};

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A charge amount and whether it is soft-deleted.
fn charge_line() -> impl Strategy<Value = (Decimal, bool)> {
    (amount(), any::<bool>())
}

/// A transaction amount, whether it is income, and whether it is deleted.
fn transaction_line() -> impl Strategy<Value = (Decimal, bool, bool)> {
    (amount(), any::<bool>(), any::<bool>())
}

fn build_event(charges: &[(Decimal, bool)], transactions: &[(Decimal, bool, bool)]) -> Event {
    let mut event = lead_event();
    for &(amount, deleted) in charges {
        let mut charge = Charge::from_input(
            ChargeId::new(),
            ChargeInput::custom("Misc", amount),
            amount,
            AuditTrail::new(),
        );
        charge.is_deleted = deleted;
        event.charges.push(charge);
    }
    for &(amount, income, deleted) in transactions {
        event.transactions.push(Transaction {
            id: TransactionId::new(),
            kind: if income {
                TransactionType::Income
            } else {
                TransactionType::Expense
            },
            date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            amount,
            payment_mode: income.then_some(PaymentMode::Cash),
            category: (!income).then(|| "Misc".to_string()),
            notes: None,
            is_deleted: deleted,
            history: AuditTrail::new(),
        });
    }
    event
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Aggregation has no side effects and is deterministic.
    #[test]
    fn prop_aggregation_is_idempotent(
        charges in prop::collection::vec(charge_line(), 0..10),
        transactions in prop::collection::vec(transaction_line(), 0..10),
    ) {
        let event = build_event(&charges, &transactions);
        let snapshot = event.clone();

        let first = FinancialAggregator::summarize(&event);
        let second = FinancialAggregator::summarize(&event);

        prop_assert_eq!(first, second);
        prop_assert_eq!(event, snapshot);
    }

    /// Deleted lines can be removed outright without changing any total.
    #[test]
    fn prop_soft_deleted_entries_contribute_nothing(
        charges in prop::collection::vec(charge_line(), 0..10),
        transactions in prop::collection::vec(transaction_line(), 0..10),
    ) {
        let with_deleted = build_event(&charges, &transactions);

        let live_charges: Vec<_> = charges.iter().copied().filter(|&(_, d)| !d).collect();
        let live_transactions: Vec<_> =
            transactions.iter().copied().filter(|&(_, _, d)| !d).collect();
        let without_deleted = build_event(&live_charges, &live_transactions);

        prop_assert_eq!(
            FinancialAggregator::summarize(&with_deleted),
            FinancialAggregator::summarize(&without_deleted)
        );
    }

    /// The derived identities hold for any ledger.
    #[test]
    fn prop_derived_identities(
        charges in prop::collection::vec(charge_line(), 0..10),
        transactions in prop::collection::vec(transaction_line(), 0..10),
    ) {
        let totals = FinancialAggregator::summarize(&build_event(&charges, &transactions));
        prop_assert_eq!(totals.total_bill, totals.base_cost + totals.total_charges);
        prop_assert_eq!(totals.balance_due, totals.total_bill - totals.total_payments);
        prop_assert_eq!(totals.profit, totals.total_bill - totals.total_expenses);
    }
}
