//! Financial aggregator.
//!
//! Derived totals are recomputed from the event snapshot on every call and
//! never stored on the document.
//!
//! - `aggregator` - Event totals and client balances
//! - `view` - Totals filtered by the caller's permissions

pub mod aggregator;
pub mod view;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::{ClientBalance, EventFinancials, FinancialAggregator, Standing};
pub use view::{ClientBalanceView, FinancialView};
