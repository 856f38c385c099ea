//! Event totals and client balances as a particular caller is allowed to see them.

use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregator::{ClientBalance, EventFinancials, Standing};
use crate::permissions::{AppPermissions, PermissionGate, Scope};

/// Event totals with hidden sections removed.
///
/// A `None` field is not shown at all: a scope at `none` hides its figures
/// rather than showing them as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialView {
    /// Needs finance core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_cost: Option<Decimal>,
    /// Needs finance charges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_charges: Option<Decimal>,
    /// Needs finance core or finance charges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bill: Option<Decimal>,
    /// Needs finance payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_payments: Option<Decimal>,
    /// Needs finance payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_due: Option<Decimal>,
    /// Needs finance expenses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_expenses: Option<Decimal>,
    /// Needs finance expenses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<Decimal>,
}

impl FinancialView {
    /// Project `totals` through `permissions`.
    #[must_use]
    pub fn project(totals: &EventFinancials, permissions: &AppPermissions) -> Self {
        let visible = |scope| PermissionGate::is_visible(permissions, scope);
        let core = visible(Scope::FinanceCore);
        let charges = visible(Scope::FinanceCharges);
        let payments = visible(Scope::FinancePayments);
        let expenses = visible(Scope::FinanceExpenses);

        Self {
            base_cost: core.then_some(totals.base_cost),
            total_charges: charges.then_some(totals.total_charges),
            total_bill: (core || charges).then_some(totals.total_bill),
            total_payments: payments.then_some(totals.total_payments),
            balance_due: payments.then_some(totals.balance_due),
            total_expenses: expenses.then_some(totals.total_expenses),
            profit: expenses.then_some(totals.profit),
        }
    }
}

/// Client balance with hidden sections removed.
///
/// The balance and standing combine billed and paid amounts, so they need
/// both to be visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBalanceView {
    /// Needs finance core or finance charges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_billed: Option<Decimal>,
    /// Needs finance payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_paid: Option<Decimal>,
    /// Needs the billed and paid sections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    /// Needs the billed and paid sections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standing: Option<Standing>,
}

impl ClientBalanceView {
    /// Project `balance` through `permissions`.
    #[must_use]
    pub fn project(balance: &ClientBalance, permissions: &AppPermissions) -> Self {
        let visible = |scope| PermissionGate::is_visible(permissions, scope);
        let billed = visible(Scope::FinanceCore) || visible(Scope::FinanceCharges);
        let paid = visible(Scope::FinancePayments);

        Self {
            total_billed: billed.then_some(balance.total_billed),
            total_paid: paid.then_some(balance.total_paid),
            balance: (billed && paid).then_some(balance.balance),
            standing: (billed && paid).then_some(balance.standing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::PermissionLevel;
    use rust_decimal_macros::dec;

    fn totals() -> EventFinancials {
        EventFinancials {
            base_cost: dec!(50000),
            total_charges: dec!(9000),
            total_bill: dec!(59000),
            total_payments: dec!(20000),
            total_expenses: dec!(15000),
            balance_due: dec!(39000),
            profit: dec!(44000),
        }
    }

    #[test]
    fn test_full_permissions_show_everything() {
        let view = FinancialView::project(&totals(), &AppPermissions::full());
        assert_eq!(view.base_cost, Some(dec!(50000)));
        assert_eq!(view.profit, Some(dec!(44000)));
    }

    #[test]
    fn test_view_level_is_enough_to_see() {
        let view = FinancialView::project(&totals(), &AppPermissions::read_only());
        assert_eq!(view.balance_due, Some(dec!(39000)));
    }

    #[test]
    fn test_hidden_expenses_hide_profit() {
        let perms = AppPermissions::full().with(Scope::FinanceExpenses, PermissionLevel::None);
        let view = FinancialView::project(&totals(), &perms);
        assert_eq!(view.total_expenses, None);
        assert_eq!(view.profit, None);
        assert_eq!(view.total_payments, Some(dec!(20000)));

        let json = serde_json::to_value(view).unwrap();
        assert!(json.get("profit").is_none());
        assert_eq!(json["totalBill"], serde_json::json!("59000"));
    }

    fn client_balance() -> ClientBalance {
        ClientBalance {
            total_billed: dec!(50000),
            total_paid: dec!(1234),
            balance: dec!(48766),
            standing: Standing::Due,
        }
    }

    #[test]
    fn test_hidden_payments_hide_client_paid_and_balance() {
        let perms = AppPermissions::full().with(Scope::FinancePayments, PermissionLevel::None);
        let view = ClientBalanceView::project(&client_balance(), &perms);
        assert_eq!(view.total_billed, Some(dec!(50000)));
        assert_eq!(view.total_paid, None);
        assert_eq!(view.balance, None);
        assert_eq!(view.standing, None);

        let json = serde_json::to_value(view).unwrap();
        assert!(json.get("totalPaid").is_none());
        assert!(json.get("standing").is_none());
    }

    #[test]
    fn test_client_billed_needs_core_or_charges() {
        let perms = AppPermissions::full()
            .with(Scope::FinanceCore, PermissionLevel::None)
            .with(Scope::FinanceCharges, PermissionLevel::None);
        let view = ClientBalanceView::project(&client_balance(), &perms);
        assert_eq!(view.total_billed, None);
        assert_eq!(view.total_paid, Some(dec!(1234)));
        assert_eq!(view.balance, None);

        let full = ClientBalanceView::project(&client_balance(), &AppPermissions::full());
        assert_eq!(full.standing, Some(Standing::Due));
        assert_eq!(full.balance, Some(dec!(48766)));
    }

    #[test]
    fn test_total_bill_needs_core_or_charges() {
        let perms = AppPermissions::default()
            .with(Scope::FinanceCharges, PermissionLevel::View);
        assert_eq!(
            FinancialView::project(&totals(), &perms).total_bill,
            Some(dec!(59000))
        );
        assert_eq!(
            FinancialView::project(&totals(), &AppPermissions::default()),
            FinancialView::default()
        );
    }
}
