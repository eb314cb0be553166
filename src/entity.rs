//! Core entity trait that all stored records must implement.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::hash::Hash;

/// Trait that all entities kept in the record store must implement.
///
/// The store is the only reader and writer of record bytes: every entity
/// is wrapped in a sequence-stamped record and a versioned envelope by
/// `RecordStore`, so implementors only describe how the entity is keyed
/// and what a valid instance looks like.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use track_kit::StoreEntity;
///
/// #[derive(Clone, Serialize, Deserialize)]
/// pub struct Technician {
///     pub id: String,
///     pub name: String,
/// }
///
/// impl StoreEntity for Technician {
///     type Key = String;
///
///     fn store_key(&self) -> Self::Key {
///         self.id.clone()
///     }
///
///     fn store_prefix() -> &'static str {
///         "technician"
///     }
/// }
/// ```
pub trait StoreEntity: Send + Sync + Serialize + for<'de> Deserialize<'de> + Clone {
    /// Type of the entity's key/ID (typically String)
    type Key: Display + Clone + Send + Sync + Eq + Hash + 'static;

    /// Return the entity's unique store key.
    ///
    /// Called to extract the key from the entity itself.
    /// Example: `Customer.id` → `"CUST-M2X4K1-A9Q3ZT"`
    fn store_key(&self) -> Self::Key;

    /// Return the store prefix for this entity type.
    ///
    /// Used to namespace record keys and to name the record kind in
    /// not-found errors. Example: "customer", "order"
    /// Final record key format: `"{prefix}:{key}"`
    fn store_prefix() -> &'static str;

    /// Optional: Validate entity after deserialization.
    ///
    /// Called by the store after loading a record. Use to enforce
    /// invariants that must hold for every persisted instance - e.g. an
    /// order's status history being non-empty and in sync with its
    /// current status.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Serialize, Deserialize)]
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

    #[test]
    fn test_store_key_extraction() {
        let entity = TestEntity {
            id: "entity_123".to_string(),
            value: "test".to_string(),
        };

        assert_eq!(entity.store_key(), "entity_123");
        assert_eq!(TestEntity::store_prefix(), "test");
    }

    #[test]
    fn test_validate_hook() {
        let ok = TestEntity {
            id: "1".to_string(),
            value: "data".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = TestEntity {
            id: "1".to_string(),
            value: String::new(),
        };
        assert!(matches!(bad.validate(), Err(Error::ValidationError(_))));
    }
}
