//! Document store integration for Caterbook.
//!
//! This crate provides:
//! - The `DocumentStore` interface the core persists through
//! - `InMemoryStore`, a reference implementation backed by `DashMap`
//! - Typed repositories with optimistic version checks
//! - `BookingService`, which runs load, command, persist for each operation

pub mod document;
pub mod error;
pub mod memory;
pub mod repository;
pub mod service;
pub mod store;

pub use document::{Collection, clean_document, normalize_reference};
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use repository::{Aggregate, Repository};
pub use service::BookingService;
pub use store::{DocumentStore, Snapshot, SnapshotCallback, StoredDocument, Subscription};
