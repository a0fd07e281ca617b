//! Object store factory
//!
//! This module provides a factory function to create the object store client
//! selected by configuration.

use super::http::HttpObjectStore;
use super::local::LocalObjectStore;
use super::traits::ObjectStore;
use crate::config::{StorageBackend, StorageConfig};
use crate::domain::Result;
use std::sync::Arc;

/// Create an object store based on the configuration
///
/// Examines `storage.backend` and creates the matching implementation.
///
/// # Errors
///
/// Returns an error if the selected backend is missing its required
/// configuration (base URL for `http`, root path for `local`).
pub fn create_object_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StorageBackend::Http => {
            tracing::info!("Creating HTTP object store");
            Ok(Arc::new(HttpObjectStore::new(config)?) as Arc<dyn ObjectStore>)
        }
        StorageBackend::Local => {
            tracing::info!("Creating local filesystem object store");
            Ok(Arc::new(LocalObjectStore::new(config)?) as Arc<dyn ObjectStore>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConcordError;

    #[test]
    fn test_create_http_store() {
        let config = StorageConfig {
            backend: StorageBackend::Http,
            base_url: Some("https://storage.example.com".to_string()),
            ..Default::default()
        };
        assert!(create_object_store(&config).is_ok());
    }

    #[test]
    fn test_create_local_store() {
        let config = StorageConfig {
            backend: StorageBackend::Local,
            root_path: Some("./data".to_string()),
            ..Default::default()
        };
        assert!(create_object_store(&config).is_ok());
    }

    #[test]
    fn test_missing_backend_config_fails() {
        let config = StorageConfig {
            backend: StorageBackend::Local,
            ..Default::default()
        };
        assert!(matches!(
            create_object_store(&config),
            Err(ConcordError::Configuration(_))
        ));
    }
}
