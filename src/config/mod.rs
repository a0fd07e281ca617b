//! Configuration management
//!
//! TOML configuration with `${VAR}` environment substitution, `CONCORD_*`
//! environment overrides, and validation at load time.

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ConcordConfig, FhirConfig, IngestionConfig, LoggingConfig, RetryConfig,
    StorageBackend, StorageConfig,
};
