//! Client aggregate and its direct-billing ledger.
//!
//! - `types` - The `Client` document and profile input
//! - `service` - Profile and advance-payment commands

pub mod service;
pub mod types;

pub use service::ClientService;
pub use types::{Client, ClientProfileInput};
