//! HTTP object store adapter
//!
//! Talks to an object store exposing a plain REST surface: objects are
//! addressed as `{base_url}/{bucket}/{name}`, fetched with GET, written
//! with PUT, and removed with DELETE. A move is a copy followed by a
//! delete of the source.

use super::traits::ObjectStore;
use crate::config::StorageConfig;
use crate::domain::{ConcordError, Result, StorageError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;

/// HTTP object store client
pub struct HttpObjectStore {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl HttpObjectStore {
    /// Create a new HTTP object store from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no base URL is set or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| {
                ConcordError::Configuration("storage.base_url is required".to_string())
            })?
            .trim_end_matches('/')
            .to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ConcordError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            token: config.token.clone(),
        })
    }

    fn object_url(&self, bucket: &str, name: &str) -> String {
        format!("{}/{bucket}/{name}", self.base_url)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn fetch_text(&self, bucket: &str, name: &str) -> Result<String> {
        let url = self.object_url(bucket, name);
        tracing::debug!(url = %url, "Fetching object");

        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::ObjectNotFound {
                bucket: bucket.to_string(),
                name: name.to_string(),
            }
            .into());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::ReadFailed(format!(
                "GET {url} returned {status}: {body}"
            ))
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        String::from_utf8(bytes.to_vec())
            .map_err(|e| StorageError::InvalidEncoding(e.to_string()).into())
    }

    async fn move_object(&self, bucket: &str, from: &str, to: &str) -> Result<()> {
        let content = self.fetch_text(bucket, from).await.map_err(|e| {
            StorageError::MoveFailed(format!("failed to read source {bucket}/{from}: {e}"))
        })?;

        let put_url = self.object_url(bucket, to);
        let response = self
            .request(self.client.put(&put_url).body(content))
            .send()
            .await
            .map_err(|e| StorageError::MoveFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StorageError::MoveFailed(format!(
                "PUT {put_url} returned {}",
                response.status()
            ))
            .into());
        }

        let delete_url = self.object_url(bucket, from);
        let response = self
            .request(self.client.delete(&delete_url))
            .send()
            .await
            .map_err(|e| StorageError::MoveFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StorageError::MoveFailed(format!(
                "DELETE {delete_url} returned {}",
                response.status()
            ))
            .into());
        }

        tracing::info!(bucket = bucket, from = from, to = to, "Moved object");
        Ok(())
    }
}
