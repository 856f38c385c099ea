//! The external document store interface.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::document::Collection;
use crate::error::StoreError;

/// A stored document together with its version.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Document identifier.
    pub id: String,
    /// Incremented on every successful write, starting at 1.
    pub version: u64,
    /// Document body.
    pub document: Value,
}

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Collection the document belongs to.
    pub collection: Collection,
    /// Document identifier.
    pub id: String,
    /// Version after the write.
    pub version: u64,
    /// Document body after the write.
    pub document: Value,
}

/// Callback invoked with every snapshot of a subscribed collection.
pub type SnapshotCallback = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Handle for an active subscription.
///
/// The callback is removed when `unsubscribe` is called or the handle is
/// dropped.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Wraps the function that removes the callback.
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stops delivery.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Whole-document store with versioned writes.
///
/// Ledger soft-deletes are ordinary document updates; the store itself has
/// no delete operation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document, returning its first version.
    async fn create(
        &self,
        collection: Collection,
        id: &str,
        document: Value,
    ) -> Result<u64, StoreError>;

    /// Fetch a document.
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError>;

    /// Replace a document if it is still at `expected_version`, returning
    /// the new version.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        expected_version: u64,
        document: Value,
    ) -> Result<u64, StoreError>;

    /// Every document in a collection.
    async fn list(&self, collection: Collection) -> Result<Vec<StoredDocument>, StoreError>;

    /// Register a callback for every successful write to `collection`.
    fn subscribe(&self, collection: Collection, callback: SnapshotCallback) -> Subscription;
}
