//! Domain models and types for Concord.
//!
//! This module contains the core domain models, types, and business rules
//! shared by the parsers, the mapper, and the dispatcher.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Intermediate records** ([`PatientRecord`], [`ObservationRecord`]) — the
//!   common model both parsers produce
//! - **Terminology table** ([`terminology`]) — compiled-in LOINC lookup
//! - **Error types** ([`ConcordError`], [`StorageError`], [`FhirStoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`]:
//!
//! ```rust
//! use concord::domain::{ConcordError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = concord::config::load_config("concord.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod records;
pub mod result;
pub mod terminology;

// Re-export commonly used types for convenience
pub use errors::{ConcordError, FhirStoreError, StorageError};
pub use records::{
    ObservationRecord, ObservationValue, ParseOutput, PatientRecord, PostalAddress, Sex,
};
pub use result::Result;
