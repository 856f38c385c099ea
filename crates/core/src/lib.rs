//! Core business logic for Caterbook.
//!
//! This crate contains pure business logic with ZERO storage or runtime dependencies.
//! Commands take an aggregate by reference and return a new aggregate plus the
//! effects the caller must apply.
//!
//! # Modules
//!
//! - `audit` - Append-only audit trail and field-level diffs
//! - `charges` - Charge types and the special charge calculator
//! - `ledger` - Create, update and soft-delete for charges and transactions
//! - `finance` - Derived totals and client balances
//! - `lifecycle` - Event state machine
//! - `event` - Event aggregate, pricing and menu commands
//! - `client` - Client aggregate and client-level ledger
//! - `permissions` - Scoped permission checks

pub mod audit;
pub mod charges;
pub mod client;
pub mod context;
pub mod error;
pub mod event;
pub mod finance;
pub mod ledger;
pub mod lifecycle;
pub mod permissions;

pub use context::{Actor, CommandContext, Effect, Notification, Outcome};
pub use error::{DomainError, ErrorKind};
