//! Audit domain types.

use caterbook_shared::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::Actor;

/// What happened to the audited item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// Item was created.
    Created,
    /// Item was edited.
    Updated,
    /// Item was soft-deleted.
    Deleted,
}

impl AuditAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One changed field, rendered as display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Field name as stored in the document.
    pub field: String,
    /// Previous value (`None` when the field was absent).
    pub from: Option<String>,
    /// New value (`None` when the field was cleared).
    pub to: Option<String>,
}

/// An immutable record of one mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// When the mutation happened.
    pub timestamp: DateTime<Utc>,
    /// Who performed it.
    pub actor_id: UserId,
    /// Display name of the actor at the time.
    pub actor_name: String,
    /// What happened.
    pub action: AuditAction,
    /// Why it happened.
    pub reason: String,
    /// Fields that actually changed (updates only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<FieldChange>>,
}

impl AuditEntry {
    fn new(
        actor: &Actor,
        at: DateTime<Utc>,
        action: AuditAction,
        reason: String,
        changes: Option<Vec<FieldChange>>,
    ) -> Self {
        Self {
            timestamp: at,
            actor_id: actor.id,
            actor_name: actor.name.clone(),
            action,
            reason,
            changes,
        }
    }

    /// Entry for a newly created item.
    #[must_use]
    pub fn created(actor: &Actor, at: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self::new(actor, at, AuditAction::Created, reason.into(), None)
    }

    /// Entry for an edit. An empty change list is stored as `None`.
    #[must_use]
    pub fn updated(
        actor: &Actor,
        at: DateTime<Utc>,
        reason: impl Into<String>,
        changes: Vec<FieldChange>,
    ) -> Self {
        let changes = (!changes.is_empty()).then_some(changes);
        Self::new(actor, at, AuditAction::Updated, reason.into(), changes)
    }

    /// Entry for a soft delete.
    #[must_use]
    pub fn deleted(actor: &Actor, at: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self::new(actor, at, AuditAction::Deleted, reason.into(), None)
    }
}

/// Append-only list of audit entries.
///
/// There is no way to remove or edit an entry once appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTrail(Vec<AuditEntry>);

impl AuditTrail {
    /// Creates an empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a trail holding a single entry.
    #[must_use]
    pub fn starting_with(entry: AuditEntry) -> Self {
        Self(vec![entry])
    }

    /// Appends an entry.
    pub fn append(&mut self, entry: AuditEntry) {
        self.0.push(entry);
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.0
    }

    /// The most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<&AuditEntry> {
        self.0.last()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
