//! Permission levels and scopes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access level on a single scope.
///
/// Levels are ordered from lowest to highest privilege.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Capability is hidden from the caller.
    #[default]
    None = 0,
    /// Read and recompute only.
    View = 1,
    /// Full mutation rights.
    Modify = 2,
}

impl PermissionLevel {
    /// Parse a level from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Self::None),
            "view" => Some(Self::View),
            "modify" => Some(Self::Modify),
            _ => None,
        }
    }

    /// Returns the string representation of the level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::View => "view",
            Self::Modify => "modify",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Functional area a permission level applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scope {
    /// Pricing model and base figures.
    FinanceCore,
    /// Additional charges.
    FinanceCharges,
    /// Income transactions.
    FinancePayments,
    /// Expense transactions.
    FinanceExpenses,
    /// Event and client CRUD, state transitions.
    ClientsAndEvents,
}

impl Scope {
    /// Returns the string representation of the scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FinanceCore => "financeCore",
            Self::FinanceCharges => "financeCharges",
            Self::FinancePayments => "financePayments",
            Self::FinanceExpenses => "financeExpenses",
            Self::ClientsAndEvents => "clientsAndEvents",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The caller's resolved permission snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppPermissions {
    /// Pricing model and base figures.
    pub finance_core: PermissionLevel,
    /// Additional charges.
    pub finance_charges: PermissionLevel,
    /// Income transactions.
    pub finance_payments: PermissionLevel,
    /// Expense transactions.
    pub finance_expenses: PermissionLevel,
    /// Event and client CRUD, state transitions.
    pub clients_and_events: PermissionLevel,
    /// Separate capability required to cancel a confirmed event.
    pub allow_event_cancellation: bool,
}

impl AppPermissions {
    /// Every scope at `modify`, cancellation allowed.
    #[must_use]
    pub fn full() -> Self {
        Self::uniform(PermissionLevel::Modify, true)
    }

    /// Every scope at `view`, no cancellation.
    #[must_use]
    pub fn read_only() -> Self {
        Self::uniform(PermissionLevel::View, false)
    }

    fn uniform(level: PermissionLevel, allow_event_cancellation: bool) -> Self {
        Self {
            finance_core: level,
            finance_charges: level,
            finance_payments: level,
            finance_expenses: level,
            clients_and_events: level,
            allow_event_cancellation,
        }
    }

    /// Level held on `scope`.
    #[must_use]
    pub fn level(&self, scope: Scope) -> PermissionLevel {
        match scope {
            Scope::FinanceCore => self.finance_core,
            Scope::FinanceCharges => self.finance_charges,
            Scope::FinancePayments => self.finance_payments,
            Scope::FinanceExpenses => self.finance_expenses,
            Scope::ClientsAndEvents => self.clients_and_events,
        }
    }

    /// Returns a copy with `scope` set to `level`.
    #[must_use]
    pub fn with(mut self, scope: Scope, level: PermissionLevel) -> Self {
        match scope {
            Scope::FinanceCore => self.finance_core = level,
            Scope::FinanceCharges => self.finance_charges = level,
            Scope::FinancePayments => self.finance_payments = level,
            Scope::FinanceExpenses => self.finance_expenses = level,
            Scope::ClientsAndEvents => self.clients_and_events = level,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(PermissionLevel::None < PermissionLevel::View);
        assert!(PermissionLevel::View < PermissionLevel::Modify);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(PermissionLevel::parse("MODIFY"), Some(PermissionLevel::Modify));
        assert_eq!(PermissionLevel::parse("view"), Some(PermissionLevel::View));
        assert_eq!(PermissionLevel::parse("admin"), None);
    }

    #[test]
    fn test_default_is_nothing() {
        let perms = AppPermissions::default();
        assert_eq!(perms.level(Scope::FinanceCore), PermissionLevel::None);
        assert!(!perms.allow_event_cancellation);
    }

    #[test]
    fn test_with_overrides_one_scope() {
        let perms = AppPermissions::full().with(Scope::FinanceExpenses, PermissionLevel::View);
        assert_eq!(perms.level(Scope::FinanceExpenses), PermissionLevel::View);
        assert_eq!(perms.level(Scope::FinancePayments), PermissionLevel::Modify);
    }

    #[test]
    fn test_deserializes_partial_snapshot() {
        let perms: AppPermissions =
            serde_json::from_str(r#"{"financeCharges":"modify","allowEventCancellation":true}"#)
                .unwrap();
        assert_eq!(perms.finance_charges, PermissionLevel::Modify);
        assert_eq!(perms.finance_core, PermissionLevel::None);
        assert!(perms.allow_event_cancellation);
    }
}
