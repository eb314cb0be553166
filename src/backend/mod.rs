//! Storage backend implementations.

use crate::error::Result;

pub mod inmemory;

pub use inmemory::InMemoryBackend;

/// Trait for storage backend implementations.
///
/// Abstracts key-value storage operations, allowing swappable backends.
/// Implementations: InMemory (default), or any embedded/remote store a
/// deployment plugs in.
///
/// Records never expire: the store is a system of record, not a cache,
/// so there is no TTL anywhere in this trait.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow
/// concurrent access. Backend implementations should use interior
/// mutability (DashMap, RwLock, or external storage).
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait StoreBackend: Send + Sync + Clone {
    /// Retrieve value from the store by key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found
    /// - `Ok(None)` - Key not present
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store value under a key, replacing any previous value.
    ///
    /// A single `set` is the atomicity unit: callers never observe a
    /// partially written record.
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove value from the store.
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if key exists in the store (optional optimization).
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Return every `(key, value)` pair whose key starts with `prefix`.
    ///
    /// No ordering guarantee - callers that need a stable order sort on
    /// data carried inside the records themselves.
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;

    /// Atomically increment the counter stored under `key` and return the
    /// new value. A missing counter starts at zero, so the first call
    /// returns 1.
    ///
    /// Counters are stored as 8-byte little-endian integers in the same
    /// keyspace as records. This is the reserve-and-increment primitive
    /// behind order-number and insertion-sequence assignment.
    ///
    /// # Errors
    /// Returns `Err` if the key holds non-counter data or a backend error
    /// occurs
    async fn increment(&self, key: &str) -> Result<u64>;

    /// Health check - verify backend is accessible.
    ///
    /// # Errors
    /// Returns `Err` if backend is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Optional: Clear the entire store (use with caution).
    ///
    /// # Errors
    /// Returns `Err` if the operation is not implemented or fails
    async fn clear_all(&self) -> Result<()> {
        Err(crate::error::Error::NotImplemented(
            "clear_all not implemented for this backend".to_string(),
        ))
    }
}
