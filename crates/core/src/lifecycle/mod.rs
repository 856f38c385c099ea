//! Event state machine.
//!
//! Governs the commercial `state` of an event:
//! - `lead -> confirmed`, `lead -> lost`
//! - `confirmed -> lost`, `confirmed -> cancelled`
//!
//! `lost` and `cancelled` are terminal and force the menu to `finalized`.

pub mod reasons;
pub mod service;

#[cfg(test)]
mod service_props;

pub use reasons::{LostReason, LostReasonCatalog};
pub use service::{LifecycleService, TransitionRequest};
