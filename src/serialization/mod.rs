//! Postcard-based record serialization with versioned envelopes.
//!
//! This module provides the canonical serialization format for all record
//! storage in track-kit. It uses Postcard for compactness and wraps every
//! stored record in a versioned envelope for schema evolution safety.
//!
//! # Architecture
//!
//! Every stored record follows this format:
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (4 bytes)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "TRAK"              u32 (LE)           postcard::to_allocvec(T)
//! ```
//!
//! # Safety Guarantees
//!
//! - **Deterministic:** Same value always produces identical bytes
//! - **Validated:** Magic and version checked on every deserialization
//! - **Versioned:** Schema changes surface as explicit errors, never as
//!   silently misread records
//! - **Type-safe:** Postcard preserves exact Rust types
//!
//! # Example
//!
//! ```rust
//! use track_kit::serialization::{serialize_for_store, deserialize_from_store};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Contact {
//!     id: u64,
//!     name: String,
//! }
//!
//! # fn main() -> track_kit::Result<()> {
//! let contact = Contact { id: 1, name: "Alice".to_string() };
//!
//! // Serialize with envelope
//! let bytes = serialize_for_store(&contact)?;
//!
//! // Deserialize with validation
//! let deserialized: Contact = deserialize_from_store(&bytes)?;
//! assert_eq!(contact, deserialized);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for track-kit records: b"TRAK"
///
/// This 4-byte signature identifies valid track-kit records.
/// Any record without this magic is rejected during deserialization.
pub const RECORD_MAGIC: [u8; 4] = *b"TRAK";

/// Current schema version.
///
/// **CRITICAL:** Increment this constant when making breaking changes to
/// stored types:
/// - Adding/removing struct fields
/// - Changing field types
/// - Reordering fields
/// - Changing enum variants
///
/// Records written under an older version are rejected with
/// `Error::VersionMismatch` instead of being silently misread.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope for stored records.
///
/// Every record is wrapped in this envelope to enable:
/// - **Corruption detection:** Invalid magic → reject record
/// - **Schema evolution:** Version mismatch → explicit migration error
///
/// # Example
///
/// ```rust
/// use track_kit::serialization::RecordEnvelope;
///
/// let envelope = RecordEnvelope::new("data");
/// assert_eq!(envelope.magic, *b"TRAK");
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecordEnvelope<T> {
    /// Magic header: must be b"TRAK"
    pub magic: [u8; 4],
    /// Schema version: must match CURRENT_SCHEMA_VERSION
    pub version: u32,
    /// The actual record data
    pub payload: T,
}

impl<T> RecordEnvelope<T> {
    /// Create a new envelope with current magic and version.
    ///
    /// # Example
    ///
    /// ```rust
    /// use track_kit::serialization::RecordEnvelope;
    ///
    /// let envelope = RecordEnvelope::new(42);
    /// assert_eq!(envelope.payload, 42);
    /// ```
    pub fn new(payload: T) -> Self {
        Self {
            magic: RECORD_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Serialize a value with envelope for record storage.
///
/// This is the canonical way to serialize data for storage in track-kit.
/// All storage backends use this function.
///
/// # Format
///
/// ```text
/// [MAGIC: 4 bytes] [VERSION: 4 bytes] [POSTCARD PAYLOAD: N bytes]
/// ```
///
/// # Errors
///
/// Returns `Error::SerializationError` if Postcard serialization fails.
pub fn serialize_for_store<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = RecordEnvelope::new(value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        log::error!("Record serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a value from record storage with validation.
///
/// This function performs strict validation:
/// 1. Checks magic header matches b"TRAK"
/// 2. Checks version matches CURRENT_SCHEMA_VERSION
/// 3. Deserializes Postcard payload
///
/// # Errors
///
/// - `Error::InvalidRecord`: Invalid magic header
/// - `Error::VersionMismatch`: Schema version mismatch
/// - `Error::DeserializationError`: Corrupted Postcard payload
pub fn deserialize_from_store<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    // Attempt to deserialize envelope
    let envelope: RecordEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        log::error!("Record deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })?;

    // Validate magic header
    if envelope.magic != RECORD_MAGIC {
        log::warn!(
            "Invalid record: expected magic {:?}, got {:?}",
            RECORD_MAGIC,
            envelope.magic
        );
        return Err(Error::InvalidRecord(format!(
            "Invalid magic: expected {:?}, got {:?}",
            RECORD_MAGIC, envelope.magic
        )));
    }

    // Validate schema version
    if envelope.version != CURRENT_SCHEMA_VERSION {
        log::warn!(
            "Record version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION,
            envelope.version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: envelope.version,
        });
    }

    Ok(envelope.payload)
}
