//! Additional charges and the special-charge calculator.
//!
//! - `types` - Charge types, stored charges, and charge inputs
//! - `calculator` - Pure formulas deriving special charge amounts

pub mod calculator;
pub mod types;

#[cfg(test)]
mod calculator_props;

pub use calculator::{ChargeCalculator, PricingContext};
pub use types::{Charge, ChargeInput, ChargeType};
