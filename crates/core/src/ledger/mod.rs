//! Ledger entry manager.
//!
//! This module implements create, update and soft-delete for the two kinds
//! of ledger lines attached to an event:
//! - Charges (billable lines beyond the base cost)
//! - Transactions (payments received and expenses incurred)
//!
//! Every mutation appends to the line's audit trail; nothing is ever removed.

pub mod lock;
pub mod service;
pub mod transactions;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::LedgerService;
pub use types::{PaymentMode, Transaction, TransactionInput, TransactionType};
