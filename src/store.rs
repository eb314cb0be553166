//! Typed record store - the main entry point for record persistence.
//!
//! `RecordStore` layers typed, per-record operations on top of a raw
//! `StoreBackend`. Each mutation touches exactly one record key, so the
//! "no partial writes visible" guarantee comes from the backend's
//! single-key atomicity instead of whole-collection rewrites.
//!
//! Records are wrapped in a [`StoredRecord`] carrying an insertion
//! sequence number before being enveloped by the serialization layer.
//! The sequence is drawn from an atomic per-collection counter and is
//! what gives `all()` its storage-insertion order, since backends make
//! no ordering promise of their own.

use crate::backend::StoreBackend;
use crate::entity::StoreEntity;
use crate::error::{Error, Result};
use crate::key::KeyBuilder;
use crate::observability::{NoOpMetrics, StoreMetrics};
use crate::serialization;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A sequence-stamped record as persisted by the store.
///
/// The sequence number is assigned once, at insert, and survives every
/// subsequent `replace`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredRecord<T> {
    /// Position in the collection's insertion order (1-based)
    pub seq: u64,
    /// The domain entity
    pub entity: T,
}

/// Typed record store over a storage backend.
///
/// # Example
///
/// ```ignore
/// use track_kit::{RecordStore, backend::InMemoryBackend};
///
/// let store = RecordStore::new(InMemoryBackend::new());
/// store.insert(&customer).await?;
/// let loaded = store.get::<Customer>(&customer.id).await?;
/// ```
pub struct RecordStore<B: StoreBackend> {
    backend: B,
    metrics: Box<dyn StoreMetrics>,
}

impl<B: StoreBackend> RecordStore<B> {
    /// Create a new record store with the given backend.
    pub fn new(backend: B) -> Self {
        RecordStore {
            backend,
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn StoreMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Insert a new record.
    ///
    /// Assigns the next insertion sequence from the collection counter
    /// and persists the record under `"{prefix}:{key}"`.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidRecord`: a record already exists under this key
    /// - `Error::SerializationError` / `Error::BackendError`: persistence
    ///   failed; nothing was written
    pub async fn insert<T: StoreEntity>(&self, entity: &T) -> Result<()> {
        let key = KeyBuilder::record::<T>(&entity.store_key());
        let start = Instant::now();

        if self.backend.exists(&key).await? {
            self.metrics.record_error(&key, "duplicate insert");
            return Err(Error::InvalidRecord(format!(
                "a record already exists under key {}",
                key
            )));
        }

        let seq = self
            .backend
            .increment(&KeyBuilder::collection_series::<T>())
            .await?;
        let stored = StoredRecord {
            seq,
            entity: entity.clone(),
        };
        let bytes = serialization::serialize_for_store(&stored)?;
        self.backend.set(&key, bytes).await?;

        self.metrics.record_write(&key, start.elapsed());
        Ok(())
    }

    /// Replace an existing record, preserving its insertion sequence.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound`: no record exists under this key
    pub async fn replace<T: StoreEntity>(&self, entity: &T) -> Result<()> {
        let id = entity.store_key();
        let key = KeyBuilder::record::<T>(&id);
        let start = Instant::now();

        let existing = self.load_stored::<T>(&key).await?.ok_or(Error::NotFound {
            kind: T::store_prefix(),
            id: id.to_string(),
        })?;

        let stored = StoredRecord {
            seq: existing.seq,
            entity: entity.clone(),
        };
        let bytes = serialization::serialize_for_store(&stored)?;
        self.backend.set(&key, bytes).await?;

        self.metrics.record_write(&key, start.elapsed());
        Ok(())
    }

    /// Fetch a record by id.
    ///
    /// Absence is not an error: unknown ids return `Ok(None)`.
    /// Loaded entities are passed through `StoreEntity::validate`.
    pub async fn get<T: StoreEntity>(&self, id: &T::Key) -> Result<Option<T>> {
        let key = KeyBuilder::record::<T>(id);
        let start = Instant::now();

        let stored = self.load_stored::<T>(&key).await?;
        self.metrics.record_read(&key, start.elapsed());

        match stored {
            Some(record) => {
                record.entity.validate()?;
                Ok(Some(record.entity))
            }
            None => Ok(None),
        }
    }

    /// Check whether a record exists.
    pub async fn contains<T: StoreEntity>(&self, id: &T::Key) -> Result<bool> {
        self.backend.exists(&KeyBuilder::record::<T>(id)).await
    }

    /// Remove a record. Removing an absent record is a no-op.
    pub async fn remove<T: StoreEntity>(&self, id: &T::Key) -> Result<()> {
        let key = KeyBuilder::record::<T>(id);
        let start = Instant::now();

        self.backend.delete(&key).await?;

        self.metrics.record_delete(&key, start.elapsed());
        Ok(())
    }

    /// Fetch every record of an entity type in storage insertion order.
    pub async fn all<T: StoreEntity>(&self) -> Result<Vec<T>> {
        let prefix = KeyBuilder::scan_prefix::<T>();
        let start = Instant::now();

        let raw = self.backend.scan_prefix(&prefix).await?;
        let mut records = Vec::with_capacity(raw.len());
        for (key, bytes) in &raw {
            let stored: StoredRecord<T> =
                serialization::deserialize_from_store(bytes).map_err(|e| {
                    self.metrics.record_error(key, &e.to_string());
                    e
                })?;
            stored.entity.validate()?;
            records.push(stored);
        }
        records.sort_by_key(|r| r.seq);

        self.metrics
            .record_scan(&prefix, records.len(), start.elapsed());
        Ok(records.into_iter().map(|r| r.entity).collect())
    }

    /// Count records of an entity type.
    pub async fn count<T: StoreEntity>(&self) -> Result<u64> {
        let prefix = KeyBuilder::scan_prefix::<T>();
        Ok(self.backend.scan_prefix(&prefix).await?.len() as u64)
    }

    /// Reserve the next number in a named series.
    ///
    /// Thin passthrough to the backend's atomic counter; used for the
    /// per-day order-number sequence.
    pub async fn next_in_series(&self, series_key: &str) -> Result<u64> {
        self.backend.increment(series_key).await
    }

    async fn load_stored<T: StoreEntity>(&self, key: &str) -> Result<Option<StoredRecord<T>>> {
        match self.backend.get(key).await? {
            Some(bytes) => {
                let stored = serialization::deserialize_from_store(&bytes).map_err(|e| {
                    self.metrics.record_error(key, &e.to_string());
                    e
                })?;
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
    struct TestEntity {
        id: String,
        value: String,
    }

    impl StoreEntity for TestEntity {
        type Key = String;

        fn store_key(&self) -> Self::Key {
            self.id.clone()
        }

        fn store_prefix() -> &'static str {
            "test"
        }

        fn validate(&self) -> Result<()> {
            if self.value.is_empty() {
                return Err(Error::ValidationError("value must not be empty".into()));
            }
            Ok(())
        }
    }

    fn entity(id: &str, value: &str) -> TestEntity {
        TestEntity {
            id: id.to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_get_roundtrip() {
        let store = RecordStore::new(InMemoryBackend::new());

        let record = entity("1", "data");
        store.insert(&record).await.expect("Failed to insert");

        let loaded = store
            .get::<TestEntity>(&"1".to_string())
            .await
            .expect("Failed to get");
        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn test_get_absent_is_none() {
        let store = RecordStore::new(InMemoryBackend::new());

        let loaded = store
            .get::<TestEntity>(&"nope".to_string())
            .await
            .expect("Failed to get");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = RecordStore::new(InMemoryBackend::new());

        store
            .insert(&entity("1", "a"))
            .await
            .expect("Failed to insert");
        let result = store.insert(&entity("1", "b")).await;
        assert!(matches!(result, Err(Error::InvalidRecord(_))));
    }

    #[tokio::test]
    async fn test_all_preserves_insertion_order() {
        let store = RecordStore::new(InMemoryBackend::new());

        for id in ["c", "a", "b"] {
            store
                .insert(&entity(id, "data"))
                .await
                .expect("Failed to insert");
        }

        let all = store.all::<TestEntity>().await.expect("Failed to scan");
        let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_replace_keeps_insertion_order() {
        let store = RecordStore::new(InMemoryBackend::new());

        store
            .insert(&entity("first", "1"))
            .await
            .expect("Failed to insert");
        store
            .insert(&entity("second", "2"))
            .await
            .expect("Failed to insert");

        store
            .replace(&entity("first", "updated"))
            .await
            .expect("Failed to replace");

        let all = store.all::<TestEntity>().await.expect("Failed to scan");
        assert_eq!(all[0].id, "first");
        assert_eq!(all[0].value, "updated");
        assert_eq!(all[1].id, "second");
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let store = RecordStore::new(InMemoryBackend::new());

        let result = store.replace(&entity("ghost", "x")).await;
        match result {
            Err(Error::NotFound { kind, id }) => {
                assert_eq!(kind, "test");
                assert_eq!(id, "ghost");
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remove() {
        let store = RecordStore::new(InMemoryBackend::new());

        store
            .insert(&entity("1", "data"))
            .await
            .expect("Failed to insert");
        store
            .remove::<TestEntity>(&"1".to_string())
            .await
            .expect("Failed to remove");

        assert!(!store
            .contains::<TestEntity>(&"1".to_string())
            .await
            .expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_count() {
        let store = RecordStore::new(InMemoryBackend::new());

        store
            .insert(&entity("1", "a"))
            .await
            .expect("Failed to insert");
        store
            .insert(&entity("2", "b"))
            .await
            .expect("Failed to insert");

        assert_eq!(store.count::<TestEntity>().await.expect("Failed to count"), 2);
    }

    #[tokio::test]
    async fn test_validate_enforced_on_load() {
        let store = RecordStore::new(InMemoryBackend::new());

        // Bypass insert-time checks by writing an invalid record directly.
        let stored = StoredRecord {
            seq: 1,
            entity: entity("1", ""),
        };
        let bytes = serialization::serialize_for_store(&stored).expect("Failed to serialize");
        store
            .backend()
            .set("test:1", bytes)
            .await
            .expect("Failed to set");

        let result = store.get::<TestEntity>(&"1".to_string()).await;
        assert!(matches!(result, Err(Error::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_foreign_bytes_rejected() {
        let store = RecordStore::new(InMemoryBackend::new());

        store
            .backend()
            .set("test:1", b"garbage".to_vec())
            .await
            .expect("Failed to set");

        let result = store.get::<TestEntity>(&"1".to_string()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_next_in_series() {
        let store = RecordStore::new(InMemoryBackend::new());

        assert_eq!(
            store
                .next_in_series("seq:order-day:250309")
                .await
                .expect("Failed to reserve"),
            1
        );
        assert_eq!(
            store
                .next_in_series("seq:order-day:250309")
                .await
                .expect("Failed to reserve"),
            2
        );
    }
}
