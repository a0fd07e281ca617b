//! Local filesystem object store
//!
//! Maps a bucket to a subdirectory of a configured root and an object name
//! to a relative path under it. Used for development and integration tests;
//! the semantics mirror the HTTP backend so the dispatcher cannot tell them
//! apart.

use super::traits::ObjectStore;
use crate::config::StorageConfig;
use crate::domain::{ConcordError, Result, StorageError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Filesystem-backed object store
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    /// Create a local store rooted at the configured directory
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no root path is set.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let root = config.root_path.clone().ok_or_else(|| {
            ConcordError::Configuration("storage.root_path is required".to_string())
        })?;
        Ok(Self::with_root(root))
    }

    /// Create a local store rooted at an explicit directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `{root}/{bucket}/{name}`, rejecting traversal components
    fn object_path(&self, bucket: &str, name: &str) -> Result<PathBuf> {
        let relative = Path::new(bucket).join(name);
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
        {
            return Err(StorageError::ReadFailed(format!(
                "refusing path outside store root: {bucket}/{name}"
            ))
            .into());
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn fetch_text(&self, bucket: &str, name: &str) -> Result<String> {
        let path = self.object_path(bucket, name)?;
        tracing::debug!(path = %path.display(), "Reading object");

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::ObjectNotFound {
                    bucket: bucket.to_string(),
                    name: name.to_string(),
                }
                .into());
            }
            Err(e) => return Err(StorageError::ReadFailed(e.to_string()).into()),
        };

        String::from_utf8(bytes)
            .map_err(|e| StorageError::InvalidEncoding(e.to_string()).into())
    }

    async fn move_object(&self, bucket: &str, from: &str, to: &str) -> Result<()> {
        let source = self.object_path(bucket, from)?;
        let destination = self.object_path(bucket, to)?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::MoveFailed(e.to_string()))?;
        }
        fs::rename(&source, &destination)
            .await
            .map_err(|e| StorageError::MoveFailed(e.to_string()))?;

        tracing::info!(bucket = bucket, from = from, to = to, "Moved object");
        Ok(())
    }
}
