//! Error types for the tracking framework.

use std::fmt;

/// Result type for tracking operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the tracking framework.
///
/// All commands and queries return `Result<T>` where `Result` is defined as
/// `std::result::Result<T, Error>`. Different error variants represent
/// different failure modes:
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Serialization failed when converting a record to storage bytes.
    ///
    /// This occurs when the record's `Serde` implementation fails.
    /// Common causes:
    /// - Record contains non-serializable values
    /// - Postcard codec error
    SerializationError(String),

    /// Deserialization failed when converting storage bytes to a record.
    ///
    /// This indicates corrupted or malformed data in the store.
    /// Common causes:
    /// - Store was corrupted during transport or storage
    /// - Invalid Postcard encoding
    /// - Incomplete data read from the backend
    DeserializationError(String),

    /// A command's input failed validation before reaching the store.
    ///
    /// This is raised when:
    /// - A required field is missing or empty (customer name, phone, ...)
    /// - A field value is out of range (tire quantity of zero)
    /// - `StoreEntity::validate()` rejects a record after deserialization
    ValidationError(String),

    /// Customer creation was rejected because the phone number is taken.
    ///
    /// At most one customer may exist per phone number. The match is an
    /// exact string comparison on whatever the caller supplied; no
    /// normalization is applied.
    DuplicatePhone(String),

    /// A command referenced a record id that does not exist.
    ///
    /// Raised by updates and status changes against unknown ids, and by
    /// order creation when the referenced customer is missing. Read
    /// queries never raise this - an absent record is `Ok(None)`.
    NotFound {
        /// Record kind, e.g. "customer" or "order"
        kind: &'static str,
        /// The id that failed to resolve
        id: String,
    },

    /// Backend storage error.
    ///
    /// This indicates the storage backend is unavailable or returned an
    /// error. Common causes:
    /// - Backend storage full
    /// - I/O failure in a persistent backend
    ///
    /// **Recovery:** Retry the operation; no partial write was made.
    BackendError(String),

    /// Configuration error during crate initialization.
    ///
    /// This occurs when creating backends or services with invalid config.
    ///
    /// **Recovery:** Fix configuration and restart.
    ConfigError(String),

    /// Feature not implemented for this backend.
    ///
    /// **Recovery:** Use a backend that supports the operation.
    NotImplemented(String),

    /// Invalid stored record: corrupted envelope or bad magic.
    ///
    /// This indicates the record header is invalid. Returned when:
    /// - Magic header is not `b"TRAK"`
    /// - Envelope deserialization fails
    /// - Foreign data was written under a track-kit key
    InvalidRecord(String),

    /// Schema version mismatch between code and stored data.
    ///
    /// This indicates the record was written with a different schema
    /// version. Raised when:
    /// - `CURRENT_SCHEMA_VERSION` changed
    /// - Struct fields were added/removed/reordered
    /// - Enum variants changed
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from the stored record)
        found: u32,
    },

    /// Generic error with custom message.
    ///
    /// Used for errors that don't fit into other variants.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::DuplicatePhone(phone) => {
                write!(f, "A customer with phone number {} already exists", phone)
            }
            Error::NotFound { kind, id } => write!(f, "No {} found with id {}", kind, id),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            Error::InvalidRecord(msg) => write!(f, "Invalid record: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Record version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else if e.is_syntax() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
