//! In-memory storage backend (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Counters share the record keyspace and are updated under the entry
//! guard, which is what makes `increment` atomic.

use super::StoreBackend;
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe async in-memory storage backend.
///
/// Uses DashMap for lock-free concurrent access with fine-grained per-key
/// sharding. No async locks required - operations are non-blocking.
/// `Clone` is cheap and shares the underlying map.
///
/// # Example
///
/// ```no_run
/// use track_kit::backend::{InMemoryBackend, StoreBackend};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     // Store data
///     backend.set("key1", b"value".to_vec()).await?;
///
///     // Retrieve data
///     let value = backend.get("key1").await?;
///     assert!(value.is_some());
///
///     // Reserve a sequence number
///     let n = backend.increment("seq:order-day:250309").await?;
///     assert_eq!(n, 1);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Create a new in-memory storage backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Get the current number of entries in the store.
    pub async fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get memory statistics.
    pub async fn stats(&self) -> StoreStats {
        let total_bytes: usize = self.store.iter().map(|entry| entry.value().len()).sum();

        StoreStats {
            total_entries: self.store.len(),
            total_bytes,
        }
    }

    /// Print store statistics to debug log.
    pub async fn log_stats(&self) {
        let stats = self.stats().await;
        debug!(
            "Store Stats: {} entries, {} bytes",
            stats.total_entries, stats.total_bytes
        );
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.store.get(key) {
            debug!("✓ InMemory GET {} -> FOUND", key);
            return Ok(Some(entry.value().clone()));
        }

        debug!("✓ InMemory GET {} -> ABSENT", key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.store.insert(key.to_string(), value);
        debug!("✓ InMemory SET {}", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        debug!("✓ InMemory DELETE {}", key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.store.contains_key(key))
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let results: Vec<(String, Vec<u8>)> = self
            .store
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        debug!("✓ InMemory SCAN {} -> {} entries", prefix, results.len());
        Ok(results)
    }

    async fn increment(&self, key: &str) -> Result<u64> {
        // The entry guard holds the shard lock, so read-bump-write is atomic.
        let mut entry = self
            .store
            .entry(key.to_string())
            .or_insert_with(|| 0u64.to_le_bytes().to_vec());

        let bytes: [u8; 8] = entry.value().as_slice().try_into().map_err(|_| {
            Error::BackendError(format!("key {} does not hold a counter", key))
        })?;
        let next = u64::from_le_bytes(bytes) + 1;
        *entry.value_mut() = next.to_le_bytes().to_vec();

        debug!("✓ InMemory INCR {} -> {}", key, next);
        Ok(next)
    }

    async fn health_check(&self) -> Result<bool> {
        // In-memory backend is always healthy
        Ok(true)
    }

    async fn clear_all(&self) -> Result<()> {
        self.store.clear();
        warn!("⚠ InMemory CLEAR_ALL executed - all records cleared!");
        Ok(())
    }
}

/// Store statistics.
#[derive(Clone, Debug)]
pub struct StoreStats {
    pub total_entries: usize,
    pub total_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inmemory_backend_set_get() {
        let backend = InMemoryBackend::new();

        backend
            .set("key1", b"value1".to_vec())
            .await
            .expect("Failed to set");

        let result = backend.get("key1").await.expect("Failed to get");
        assert_eq!(result, Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_inmemory_backend_miss() {
        let backend = InMemoryBackend::new();

        let result = backend.get("nonexistent").await.expect("Failed to get");
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_inmemory_backend_delete() {
        let backend = InMemoryBackend::new();

        backend
            .set("key1", b"value1".to_vec())
            .await
            .expect("Failed to set");
        assert!(backend
            .exists("key1")
            .await
            .expect("Failed to check exists"));

        backend.delete("key1").await.expect("Failed to delete");
        assert!(!backend
            .exists("key1")
            .await
            .expect("Failed to check exists"));
    }

    #[tokio::test]
    async fn test_inmemory_backend_scan_prefix() {
        let backend = InMemoryBackend::new();

        backend
            .set("customer:1", b"a".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("customer:2", b"b".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("order:1", b"c".to_vec())
            .await
            .expect("Failed to set");

        let mut results = backend
            .scan_prefix("customer:")
            .await
            .expect("Failed to scan");
        results.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "customer:1");
        assert_eq!(results[1].0, "customer:2");
    }

    #[tokio::test]
    async fn test_inmemory_backend_scan_prefix_empty() {
        let backend = InMemoryBackend::new();

        let results = backend
            .scan_prefix("customer:")
            .await
            .expect("Failed to scan");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_inmemory_backend_increment_sequence() {
        let backend = InMemoryBackend::new();

        for expected in 1..=5u64 {
            let n = backend
                .increment("seq:order-day:250309")
                .await
                .expect("Failed to incr");
            assert_eq!(n, expected);
        }
    }

    #[tokio::test]
    async fn test_inmemory_backend_increment_rejects_record_key() {
        let backend = InMemoryBackend::new();

        backend
            .set("key1", b"not a counter".to_vec())
            .await
            .expect("Failed to set");

        let result = backend.increment("key1").await;
        assert!(matches!(result, Err(Error::BackendError(_))));
    }

    #[tokio::test]
    async fn test_inmemory_backend_clear_all() {
        let backend = InMemoryBackend::new();

        backend
            .set("key1", b"value1".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("key2", b"value2".to_vec())
            .await
            .expect("Failed to set");

        assert_eq!(backend.len().await, 2);

        backend.clear_all().await.expect("Failed to clear");

        assert_eq!(backend.len().await, 0);
    }

    #[tokio::test]
    async fn test_inmemory_backend_stats() {
        let backend = InMemoryBackend::new();

        backend
            .set("key1", b"value_with_data".to_vec())
            .await
            .expect("Failed to set");
        backend
            .set("key2", b"data".to_vec())
            .await
            .expect("Failed to set");

        let stats = backend.stats().await;
        assert_eq!(stats.total_entries, 2);
        assert!(stats.total_bytes > 0);
    }

    #[tokio::test]
    async fn test_inmemory_backend_clone_shares_store() {
        let backend1 = InMemoryBackend::new();
        backend1
            .set("key", b"value".to_vec())
            .await
            .expect("Failed to set");

        let backend2 = backend1.clone();

        let value = backend2.get("key").await.expect("Failed to get");
        assert_eq!(value, Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn test_inmemory_backend_concurrent_increment() {
        use std::sync::Arc;

        let backend = Arc::new(InMemoryBackend::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let backend_clone = Arc::clone(&backend);
            let handle = tokio::spawn(async move {
                let b = (*backend_clone).clone();
                b.increment("seq:orders").await.expect("Failed to incr")
            });
            handles.push(handle);
        }

        let mut seen = vec![];
        for handle in handles {
            seen.push(handle.await.expect("Task failed"));
        }

        // Ten concurrent reservations yield ten distinct numbers.
        seen.sort_unstable();
        assert_eq!(seen, (1..=10).collect::<Vec<u64>>());
    }
}
