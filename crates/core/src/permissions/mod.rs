//! Permission gate for scoped finance and event operations.
//!
//! Permissions are resolved elsewhere and consumed here as a read-only
//! snapshot with one level per functional scope.

pub mod gate;
pub mod types;

pub use gate::PermissionGate;
pub use types::{AppPermissions, PermissionLevel, Scope};
