//! Observability and metrics collection for store operations.
//!
//! Implement the `StoreMetrics` trait to feed store activity into your
//! monitoring system:
//!
//! ```ignore
//! use track_kit::observability::StoreMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl StoreMetrics for PrometheusMetrics {
//!     fn record_read(&self, _key: &str, _duration: Duration) {
//!         // counter!("store_reads").inc();
//!         // histogram!("store_latency").record(duration);
//!     }
//!     // ... implement other methods
//! }
//!
//! // let store = RecordStore::new(backend)
//! //     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! Default behavior (if not overridden) logs via the `log` crate.

use std::time::Duration;

/// Trait for store metrics collection.
pub trait StoreMetrics: Send + Sync {
    /// Record a record read.
    fn record_read(&self, key: &str, duration: Duration) {
        debug!("Store READ: {} took {:?}", key, duration);
    }

    /// Record a record write.
    fn record_write(&self, key: &str, duration: Duration) {
        debug!("Store WRITE: {} took {:?}", key, duration);
    }

    /// Record a record delete.
    fn record_delete(&self, key: &str, duration: Duration) {
        debug!("Store DELETE: {} took {:?}", key, duration);
    }

    /// Record a collection scan.
    fn record_scan(&self, prefix: &str, records: usize, duration: Duration) {
        debug!(
            "Store SCAN: {} -> {} records took {:?}",
            prefix, records, duration
        );
    }

    /// Record an error.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Store ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl StoreMetrics for NoOpMetrics {
    fn record_read(&self, _key: &str, _duration: Duration) {}
    fn record_write(&self, _key: &str, _duration: Duration) {}
    fn record_delete(&self, _key: &str, _duration: Duration) {}
    fn record_scan(&self, _prefix: &str, _records: usize, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}
