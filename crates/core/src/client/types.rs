//! Client domain types.

use caterbook_shared::types::ClientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::AuditTrail;
use crate::ledger::Transaction;

/// A customer who books events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Client ID.
    pub id: ClientId,
    /// Display name.
    pub name: String,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Profile edit history.
    #[serde(default)]
    pub history: AuditTrail,
    /// Advance payments and client-level expenses.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Store version this snapshot was read at.
    #[serde(default)]
    pub version: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Transactions, optionally including soft-deleted ones.
    pub fn transactions_view(&self, include_archived: bool) -> impl Iterator<Item = &Transaction> {
        self.transactions
            .iter()
            .filter(move |t| include_archived || t.is_active())
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientProfileInput {
    /// Display name; required.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl ClientProfileInput {
    /// Profile with just a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Trimmed copy with blank optionals dropped.
    pub(crate) fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        Self {
            name: self.name.trim().to_string(),
            phone: clean(self.phone),
            email: clean(self.email),
            notes: clean(self.notes),
        }
    }
}
