//! Append-only audit trail attached to entities and ledger lines.
//!
//! - `types` - Audit entries, field changes, and the `AuditTrail` container
//! - `changes` - Field-level diffing and reason enforcement

pub mod changes;
pub mod types;

pub use changes::{ChangeSet, require_reason};
pub use types::{AuditAction, AuditEntry, AuditTrail, FieldChange};
