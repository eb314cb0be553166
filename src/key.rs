//! Record key management utilities.

use crate::entity::StoreEntity;
use chrono::NaiveDate;

/// Builder for record and counter keys.
pub struct KeyBuilder;

impl KeyBuilder {
    /// Build full record key from entity type and ID.
    pub fn record<T: StoreEntity>(id: &T::Key) -> String {
        format!("{}:{}", T::store_prefix(), id)
    }

    /// Build record key with custom prefix.
    pub fn with_prefix(prefix: &str, id: &dyn std::fmt::Display) -> String {
        format!("{}:{}", prefix, id)
    }

    /// Scan prefix covering every record of an entity type.
    pub fn scan_prefix<T: StoreEntity>() -> String {
        format!("{}:", T::store_prefix())
    }

    /// Counter key for an entity type's insertion sequence.
    ///
    /// Incremented once per insert; the resulting sequence number is
    /// what gives `all()` its storage-insertion order.
    pub fn collection_series<T: StoreEntity>() -> String {
        format!("seq:{}", T::store_prefix())
    }

    /// Counter key for the per-day order-number sequence.
    ///
    /// One counter per calendar day, keyed `seq:order-day:YYMMDD`.
    /// Reserving a number is a single atomic increment, so two in-flight
    /// order creations can never read the same count.
    pub fn order_day_series(day: NaiveDate) -> String {
        format!("seq:order-day:{}", day.format("%y%m%d"))
    }

    /// Build composite key from multiple parts.
    pub fn composite(parts: &[&str]) -> String {
        parts.join(":")
    }

    /// Parse a composite key into parts.
    pub fn parse(key: &str) -> Vec<&str> {
        key.split(':').collect()
    }
}
