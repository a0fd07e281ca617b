//! Domain error types
//!
//! This module defines the error hierarchy for Concord. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Concord error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ConcordError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Inbound event payload could not be decoded
    #[error("Event decode error: {0}")]
    Decode(String),

    /// Malformed input that aborts the whole parse (tabular fail-fast policy)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Object storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// FHIR store errors
    #[error("FHIR store error: {0}")]
    FhirStore(#[from] FhirStoreError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ConcordError {
    /// HTTP status class this error maps to when the dispatcher is invoked
    /// by a request/response platform.
    ///
    /// An unrecognized event shape is the caller's fault (400); everything
    /// else is a processing failure (500). Skipped files are not errors and
    /// never reach this path.
    pub fn http_status(&self) -> u16 {
        match self {
            ConcordError::Decode(_) => 400,
            _ => 500,
        }
    }
}

/// Object storage errors
///
/// Errors that occur when fetching or moving objects. These don't expose
/// the underlying HTTP client or filesystem types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to connect to the storage backend
    #[error("Failed to connect to storage: {0}")]
    ConnectionFailed(String),

    /// Object not found
    #[error("Object not found: {bucket}/{name}")]
    ObjectNotFound { bucket: String, name: String },

    /// Failed to read object content
    #[error("Failed to read object: {0}")]
    ReadFailed(String),

    /// Failed to move an object
    #[error("Failed to move object: {0}")]
    MoveFailed(String),

    /// Object content was not valid UTF-8 text
    #[error("Object is not valid UTF-8: {0}")]
    InvalidEncoding(String),
}

/// FHIR store errors
///
/// Errors that occur when submitting bundles to the remote FHIR store.
#[derive(Debug, Error)]
pub enum FhirStoreError {
    /// Failed to connect to the FHIR store
    #[error("Failed to connect to FHIR store: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Response could not be parsed as a bundle
    #[error("Invalid response from FHIR store: {0}")]
    InvalidResponse(String),

    /// The store rejected the whole transaction
    #[error("Transaction rejected: {status} - {message}")]
    TransactionRejected { status: u16, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ConcordError {
    fn from(err: std::io::Error) -> Self {
        ConcordError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ConcordError {
    fn from(err: serde_json::Error) -> Self {
        ConcordError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ConcordError {
    fn from(err: toml::de::Error) -> Self {
        ConcordError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Ragged rows and unterminated quotes abort the whole tabular parse
impl From<csv::Error> for ConcordError {
    fn from(err: csv::Error) -> Self {
        ConcordError::Parse(err.to_string())
    }
}
