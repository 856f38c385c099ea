//! Typed repositories over the document store.
//!
//! Aggregates are serialized with serde_json. The stored version is the
//! source of truth: it is stripped from the body on write and stamped back
//! onto the aggregate on read.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use caterbook_core::client::Client;
use caterbook_core::event::Event;

use crate::document::{Collection, normalize_fields, normalize_nested};
use crate::error::StoreError;
use crate::store::{DocumentStore, StoredDocument};

const VERSION_FIELD: &str = "version";

/// A document root that can be persisted.
pub trait Aggregate: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the aggregate lives in.
    const COLLECTION: Collection;

    /// Top-level fields that may arrive as foreign-document handles.
    const REFERENCE_FIELDS: &'static [&'static str] = &[];

    /// Fields of array elements that may arrive as handles, keyed by the
    /// top-level array holding them.
    const NESTED_REFERENCE_FIELDS: &'static [(&'static str, &'static [&'static str])] = &[];

    /// Document identifier.
    fn document_id(&self) -> String;

    /// Stored version this snapshot was read at.
    fn version(&self) -> u64;

    /// Stamps the stored version.
    fn set_version(&mut self, version: u64);
}

impl Aggregate for Event {
    const COLLECTION: Collection = Collection::Events;
    const REFERENCE_FIELDS: &'static [&'static str] = &["clientId"];
    const NESTED_REFERENCE_FIELDS: &'static [(&'static str, &'static [&'static str])] =
        &[("charges", &["liveCounterId", "menuTemplateId"])];

    fn document_id(&self) -> String {
        self.id.to_string()
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl Aggregate for Client {
    const COLLECTION: Collection = Collection::Clients;

    fn document_id(&self) -> String {
        self.id.to_string()
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

/// Typed access to the document store.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    /// Create a new repository.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Load an aggregate by identifier.
    pub async fn load<T: Aggregate>(&self, id: &str) -> Result<T, StoreError> {
        let stored = self
            .store
            .get(T::COLLECTION, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            })?;
        decode(stored)
    }

    /// Every aggregate in the collection.
    pub async fn list<T: Aggregate>(&self) -> Result<Vec<T>, StoreError> {
        self.store
            .list(T::COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Insert a new aggregate, returning its first version.
    pub async fn insert<T: Aggregate>(&self, aggregate: &T) -> Result<u64, StoreError> {
        let body = encode(aggregate)?;
        self.store
            .create(T::COLLECTION, &aggregate.document_id(), body)
            .await
    }

    /// Replace an aggregate if it is still at `expected_version`.
    pub async fn replace<T: Aggregate>(
        &self,
        aggregate: &T,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        let body = encode(aggregate)?;
        self.store
            .update(
                T::COLLECTION,
                &aggregate.document_id(),
                expected_version,
                body,
            )
            .await
    }
}

fn encode<T: Aggregate>(aggregate: &T) -> Result<Value, StoreError> {
    let mut body = serde_json::to_value(aggregate)?;
    if let Some(map) = body.as_object_mut() {
        map.remove(VERSION_FIELD);
    }
    Ok(body)
}

fn decode<T: Aggregate>(stored: StoredDocument) -> Result<T, StoreError> {
    let mut body = stored.document;
    normalize_fields(&mut body, T::REFERENCE_FIELDS);
    normalize_nested(&mut body, T::NESTED_REFERENCE_FIELDS);
    let mut aggregate: T = serde_json::from_value(body)?;
    aggregate.set_version(stored.version);
    Ok(aggregate)
}
