//! Transaction domain types.

use caterbook_shared::types::TransactionId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audit::AuditTrail;
use crate::error::DomainError;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received from the client.
    Income,
    /// Money spent on the event.
    Expense,
}

impl TransactionType {
    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an income transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    /// Cash.
    Cash,
    /// UPI transfer.
    #[serde(rename = "UPI")]
    Upi,
    /// Bank transfer.
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    /// Cheque.
    Cheque,
    /// Card.
    Card,
}

impl PaymentMode {
    /// Returns the display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Upi => "UPI",
            Self::BankTransfer => "Bank Transfer",
            Self::Cheque => "Cheque",
            Self::Card => "Card",
        }
    }

    /// Parses a display label, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "upi" => Some(Self::Upi),
            "bank transfer" => Some(Self::BankTransfer),
            "cheque" => Some(Self::Cheque),
            "card" => Some(Self::Card),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cash movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Value date.
    pub date: NaiveDate,
    /// Always positive.
    pub amount: Decimal,
    /// Set for income only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<PaymentMode>,
    /// Set for expense only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
    /// Audit trail for this line.
    #[serde(default)]
    pub history: AuditTrail,
}

impl Transaction {
    /// Returns true if the transaction still counts toward totals.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Active income amount, zero otherwise.
    #[must_use]
    pub fn income(&self) -> Decimal {
        self.counted(TransactionType::Income)
    }

    /// Active expense amount, zero otherwise.
    #[must_use]
    pub fn expense(&self) -> Decimal {
        self.counted(TransactionType::Expense)
    }

    fn counted(&self, kind: TransactionType) -> Decimal {
        if self.is_active() && self.kind == kind {
            self.amount
        } else {
            Decimal::ZERO
        }
    }
}

/// Caller-supplied transaction data for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
    /// Income or expense.
    pub kind: TransactionType,
    /// Value date.
    pub date: NaiveDate,
    /// Must be positive.
    pub amount: Decimal,
    /// Required for income, rejected for expense.
    pub payment_mode: Option<PaymentMode>,
    /// Required for expense, rejected for income.
    pub category: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl TransactionInput {
    /// A payment received.
    #[must_use]
    pub fn income(date: NaiveDate, amount: Decimal, mode: PaymentMode) -> Self {
        Self {
            kind: TransactionType::Income,
            date,
            amount,
            payment_mode: Some(mode),
            category: None,
            notes: None,
        }
    }

    /// An expense incurred.
    #[must_use]
    pub fn expense(date: NaiveDate, amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            kind: TransactionType::Expense,
            date,
            amount,
            payment_mode: None,
            category: Some(category.into()),
            notes: None,
        }
    }

    /// Sets notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks the amount and the payment-mode/category discriminator.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveAmount`, `MissingField` or `UnexpectedField`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.amount <= Decimal::ZERO {
            return Err(DomainError::NonPositiveAmount {
                field: "amount",
                amount: self.amount,
            });
        }

        let has_category = self
            .category
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());

        match self.kind {
            TransactionType::Income => {
                if self.payment_mode.is_none() {
                    return Err(DomainError::MissingField {
                        field: "paymentMode",
                    });
                }
                if has_category {
                    return Err(DomainError::UnexpectedField { field: "category" });
                }
            }
            TransactionType::Expense => {
                if !has_category {
                    return Err(DomainError::MissingField { field: "category" });
                }
                if self.payment_mode.is_some() {
                    return Err(DomainError::UnexpectedField {
                        field: "paymentMode",
                    });
                }
            }
        }
        Ok(())
    }

    /// Category with surrounding whitespace removed; blank becomes `None`.
    #[must_use]
    pub fn normalized_category(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}
