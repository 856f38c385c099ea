//! In-memory document store backed by `DashMap`.
//!
//! Used by tests and the development seeder. Writes are atomic per document;
//! subscribers are called after the write lock is released.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use caterbook_shared::StoreConfig;

use crate::document::{Collection, clean_document};
use crate::error::StoreError;
use crate::store::{DocumentStore, Snapshot, SnapshotCallback, StoredDocument, Subscription};

type Key = (Collection, String);

/// Registered callbacks, keyed by subscription number.
type Subscribers = DashMap<u64, (Collection, SnapshotCallback)>;

/// In-memory `DocumentStore`.
#[derive(Clone)]
pub struct InMemoryStore {
    documents: Arc<DashMap<Key, StoredDocument>>,
    subscribers: Arc<Subscribers>,
    next_subscription: Arc<AtomicU64>,
    online: Arc<AtomicBool>,
    notify_subscribers: bool,
}

impl InMemoryStore {
    /// Creates an empty store that notifies subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Creates an empty store from configuration.
    #[must_use]
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            documents: Arc::new(DashMap::new()),
            subscribers: Arc::new(DashMap::new()),
            next_subscription: Arc::new(AtomicU64::new(1)),
            online: Arc::new(AtomicBool::new(true)),
            notify_subscribers: config.notify_subscribers,
        }
    }

    /// Simulates losing or regaining the backend.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is offline".into()))
        }
    }

    fn publish(&self, collection: Collection, stored: &StoredDocument) {
        if !self.notify_subscribers {
            return;
        }
        // Collect first so callbacks may unsubscribe without deadlocking.
        let callbacks: Vec<SnapshotCallback> = self
            .subscribers
            .iter()
            .filter(|entry| entry.value().0 == collection)
            .map(|entry| Arc::clone(&entry.value().1))
            .collect();
        if callbacks.is_empty() {
            return;
        }

        let snapshot = Snapshot {
            collection,
            id: stored.id.clone(),
            version: stored.version,
            document: stored.document.clone(),
        };
        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create(
        &self,
        collection: Collection,
        id: &str,
        document: Value,
    ) -> Result<u64, StoreError> {
        self.ensure_online()?;
        let stored = match self.documents.entry((collection, id.to_string())) {
            Entry::Occupied(_) => {
                return Err(StoreError::AlreadyExists {
                    collection,
                    id: id.to_string(),
                });
            }
            Entry::Vacant(slot) => slot
                .insert(StoredDocument {
                    id: id.to_string(),
                    version: 1,
                    document: clean_document(document),
                })
                .clone(),
        };
        self.publish(collection, &stored);
        Ok(stored.version)
    }

    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .documents
            .get(&(collection, id.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        expected_version: u64,
        document: Value,
    ) -> Result<u64, StoreError> {
        self.ensure_online()?;
        let stored = {
            let mut entry = self
                .documents
                .get_mut(&(collection, id.to_string()))
                .ok_or_else(|| StoreError::NotFound {
                    collection,
                    id: id.to_string(),
                })?;
            let current = entry.value_mut();
            if current.version != expected_version {
                return Err(StoreError::VersionConflict {
                    collection,
                    id: id.to_string(),
                    expected: expected_version,
                    actual: current.version,
                });
            }
            current.version += 1;
            current.document = clean_document(document);
            current.clone()
        };
        self.publish(collection, &stored);
        Ok(stored.version)
    }

    async fn list(&self, collection: Collection) -> Result<Vec<StoredDocument>, StoreError> {
        self.ensure_online()?;
        let mut documents: Vec<StoredDocument> = self
            .documents
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .map(|entry| entry.value().clone())
            .collect();
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(documents)
    }

    fn subscribe(&self, collection: Collection, callback: SnapshotCallback) -> Subscription {
        let key = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        self.subscribers.insert(key, (collection, callback));

        let subscribers = Arc::downgrade(&self.subscribers);
        Subscription::new(move || {
            if let Some(subscribers) = subscribers.upgrade() {
                subscribers.remove(&key);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_create_then_get() {
        let store = InMemoryStore::new();
        let version = store
            .create(Collection::Events, "e-1", json!({ "name": "Gala", "notes": null }))
            .await
            .unwrap();
        assert_eq!(version, 1);

        let stored = store.get(Collection::Events, "e-1").await.unwrap().unwrap();
        assert_eq!(stored.document, json!({ "name": "Gala" }));
        assert!(store.get(Collection::Clients, "e-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let store = InMemoryStore::new();
        store.create(Collection::Clients, "c-1", json!({})).await.unwrap();
        let result = store.create(Collection::Clients, "c-1", json!({})).await;
        assert!(matches!(result, Err(StoreError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_stale_update_is_rejected() {
        let store = InMemoryStore::new();
        store.create(Collection::Events, "e-1", json!({ "pax": 10 })).await.unwrap();
        assert_eq!(
            store
                .update(Collection::Events, "e-1", 1, json!({ "pax": 20 }))
                .await
                .unwrap(),
            2
        );

        let result = store
            .update(Collection::Events, "e-1", 1, json!({ "pax": 30 }))
            .await;
        assert!(matches!(
            result,
            Err(StoreError::VersionConflict {
                expected: 1,
                actual: 2,
                ..
            })
        ));
        let stored = store.get(Collection::Events, "e-1").await.unwrap().unwrap();
        assert_eq!(stored.document, json!({ "pax": 20 }));
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = InMemoryStore::new();
        let result = store.update(Collection::Events, "nope", 1, json!({})).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = InMemoryStore::new();
        store.set_online(false);
        assert!(matches!(
            store.list(Collection::Events).await,
            Err(StoreError::Unavailable(_))
        ));
        store.set_online(true);
        assert!(store.list(Collection::Events).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_their_collection_only() {
        let store = InMemoryStore::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let sub = store.subscribe(
            Collection::Events,
            Arc::new(move |snapshot: &Snapshot| {
                assert_eq!(snapshot.collection, Collection::Events);
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        store.create(Collection::Events, "e-1", json!({})).await.unwrap();
        store.create(Collection::Clients, "c-1", json!({})).await.unwrap();
        store.update(Collection::Events, "e-1", 1, json!({ "pax": 1 })).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        sub.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);
        store.update(Collection::Events, "e-1", 2, json!({ "pax": 2 })).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_notifications_can_be_disabled() {
        let store = InMemoryStore::with_config(&StoreConfig {
            notify_subscribers: false,
        });
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let _sub = store.subscribe(
            Collection::Clients,
            Arc::new(move |_: &Snapshot| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        store.create(Collection::Clients, "c-1", json!({})).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }
}
