//! Event totals and client balances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::event::{Event, PricingModel};

/// Derived totals for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFinancials {
    /// Cost from the pricing model.
    pub base_cost: Decimal,
    /// Sum of live charges.
    pub total_charges: Decimal,
    /// `base_cost + total_charges`
    pub total_bill: Decimal,
    /// Sum of live income.
    pub total_payments: Decimal,
    /// Sum of live expenses.
    pub total_expenses: Decimal,
    /// `total_bill - total_payments`
    pub balance_due: Decimal,
    /// `total_bill - total_expenses`
    pub profit: Decimal,
}

/// Where a client stands overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
    /// Client has paid more than billed.
    Credit,
    /// Client owes money.
    Due,
    /// Nothing owed either way.
    Settled,
}

/// Client-level billing aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBalance {
    /// Sum of `total_bill` over confirmed and cancelled events.
    pub total_billed: Decimal,
    /// Sum of the client's own live income.
    pub total_paid: Decimal,
    /// `total_billed - total_paid`; negative means credit.
    pub balance: Decimal,
    /// Sign of `balance`.
    pub standing: Standing,
}

/// Stateless financial aggregator.
pub struct FinancialAggregator;

impl FinancialAggregator {
    /// Base cost for the event's pricing model.
    #[must_use]
    pub fn base_cost(event: &Event) -> Decimal {
        let per_pax = Decimal::from(event.pax) * event.per_pax_price;
        match event.pricing_model {
            PricingModel::Variable => per_pax,
            PricingModel::Flat => event.rent,
            PricingModel::Mix => event.rent + per_pax,
        }
    }

    /// All derived totals. Soft-deleted entries contribute nothing.
    #[must_use]
    pub fn summarize(event: &Event) -> EventFinancials {
        let base_cost = Self::base_cost(event);
        let total_charges: Decimal = event.charges_view(false).map(|c| c.amount).sum();
        let total_payments: Decimal = event.transactions.iter().map(|t| t.income()).sum();
        let total_expenses: Decimal = event.transactions.iter().map(|t| t.expense()).sum();
        let total_bill = base_cost + total_charges;

        EventFinancials {
            base_cost,
            total_charges,
            total_bill,
            total_payments,
            total_expenses,
            balance_due: total_bill - total_payments,
            profit: total_bill - total_expenses,
        }
    }

    /// Client balance across the client's billable events.
    ///
    /// Events belonging to other clients are ignored, as are leads and lost
    /// events.
    #[must_use]
    pub fn client_balance(client: &Client, events: &[Event]) -> ClientBalance {
        let total_billed: Decimal = events
            .iter()
            .filter(|e| e.client_id == client.id && e.state.is_billable())
            .map(|e| Self::summarize(e).total_bill)
            .sum();
        let total_paid: Decimal = client.transactions.iter().map(|t| t.income()).sum();
        let balance = total_billed - total_paid;

        let standing = if balance > Decimal::ZERO {
            Standing::Due
        } else if balance < Decimal::ZERO {
            Standing::Credit
        } else {
            Standing::Settled
        };

        ClientBalance {
            total_billed,
            total_paid,
            balance,
            standing,
        }
    }
}
