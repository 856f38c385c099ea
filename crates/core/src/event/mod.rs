//! Event aggregate: one catering engagement.
//!
//! - `types` - The `Event` document and its state, status and pricing enums
//! - `service` - Event creation, pricing, and menu commands

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::{CreateEventInput, EventService, MenuUpdate, PricingInput};
pub use types::{
    Event, EventState, EventStatus, LostDetails, MenuSelection, PricingModel, StateChangeEntry,
};
