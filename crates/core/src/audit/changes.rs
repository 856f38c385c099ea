//! Field-level diffing and reason enforcement.

use std::fmt::Display;

use super::types::FieldChange;
use crate::error::DomainError;

/// Returns the trimmed reason, or `ReasonRequired` when it is blank.
///
/// # Errors
///
/// Returns `DomainError::ReasonRequired` for empty or whitespace-only input.
pub fn require_reason(reason: &str) -> Result<String, DomainError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ReasonRequired);
    }
    Ok(trimmed.to_string())
}

/// Collects the fields that differ between two versions of an item.
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: Vec<FieldChange>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `field` if `from != to`.
    pub fn track<T: PartialEq + Display>(&mut self, field: &str, from: &T, to: &T) {
        if from != to {
            self.changes.push(FieldChange {
                field: field.to_string(),
                from: Some(from.to_string()),
                to: Some(to.to_string()),
            });
        }
    }

    /// Records an optional `field` if `from != to`.
    pub fn track_opt<T: PartialEq + Display>(
        &mut self,
        field: &str,
        from: Option<&T>,
        to: Option<&T>,
    ) {
        if from != to {
            self.changes.push(FieldChange {
                field: field.to_string(),
                from: from.map(ToString::to_string),
                to: to.map(ToString::to_string),
            });
        }
    }

    /// Returns true if no field changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Consumes the set, returning the recorded changes.
    #[must_use]
    pub fn into_changes(self) -> Vec<FieldChange> {
        self.changes
    }
}
