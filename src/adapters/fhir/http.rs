//! HTTP FHIR store client
//!
//! POSTs transaction bundles to the store's base URL with `application/fhir+json`
//! content. Supports no auth, basic auth, and bearer tokens. Transient
//! transport failures (connection errors, timeouts, 5xx rejections) are
//! retried with exponential backoff; a 4xx rejection is terminal because
//! resubmitting the same bundle cannot succeed.

use super::traits::FhirStore;
use crate::config::FhirConfig;
use crate::core::map::Bundle;
use crate::domain::{ConcordError, FhirStoreError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;

const FHIR_JSON: &str = "application/fhir+json";

/// REST FHIR store client
pub struct HttpFhirStore {
    base_url: String,
    client: Client,
    config: FhirConfig,
}

impl HttpFhirStore {
    /// Create a new FHIR store client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: FhirConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ConcordError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Build the authorization header value for the configured auth type
    fn auth_header_value(&self) -> Option<String> {
        match self.config.auth_type.as_str() {
            "bearer" => self
                .config
                .token
                .as_ref()
                .map(|token| format!("Bearer {token}")),
            "basic" => {
                if let (Some(username), Some(password)) =
                    (&self.config.username, &self.config.password)
                {
                    let credentials = format!("{username}:{password}");
                    let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                    Some(format!("Basic {encoded}"))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Retry an operation with exponential backoff
    ///
    /// Only transient errors are retried; everything else returns
    /// immediately.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.retry.max_retries;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_retries || !is_transient(&e) {
                        return Err(e);
                    }

                    let delay_ms = self.config.retry.initial_delay_ms
                        * (self
                            .config
                            .retry
                            .backoff_multiplier
                            .powf((attempt - 1) as f64) as u64);
                    let delay_ms = delay_ms.min(self.config.retry.max_delay_ms);

                    tracing::warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying bundle submission after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    async fn submit_once(&self, bundle: &Bundle) -> Result<Bundle> {
        let mut request = self
            .client
            .post(&self.base_url)
            .header("Content-Type", FHIR_JSON)
            .header("Accept", FHIR_JSON)
            .json(bundle);
        if let Some(auth) = self.auth_header_value() {
            request = request.header("Authorization", auth);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FhirStoreError::Timeout(e.to_string())
            } else {
                FhirStoreError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FhirStoreError::AuthenticationFailed(format!(
                "store returned {status}"
            ))
            .into());
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FhirStoreError::TransactionRejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        response
            .json::<Bundle>()
            .await
            .map_err(|e| FhirStoreError::InvalidResponse(e.to_string()).into())
    }
}

#[async_trait]
impl FhirStore for HttpFhirStore {
    async fn submit_bundle(&self, bundle: &Bundle) -> Result<Bundle> {
        tracing::debug!(entries = bundle.entry.len(), "Submitting transaction bundle");
        self.retry_request(|| self.submit_once(bundle)).await
    }
}

/// Whether an error is worth retrying at the transport layer
fn is_transient(error: &ConcordError) -> bool {
    match error {
        ConcordError::FhirStore(FhirStoreError::ConnectionFailed(_)) => true,
        ConcordError::FhirStore(FhirStoreError::Timeout(_)) => true,
        ConcordError::FhirStore(FhirStoreError::TransactionRejected { status, .. }) => {
            *status >= 500
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use serde_json::json;

    fn config(base_url: &str) -> FhirConfig {
        FhirConfig {
            base_url: base_url.to_string(),
            auth_type: "none".to_string(),
            username: None,
            password: None,
            token: None,
            timeout_seconds: 5,
            retry: RetryConfig {
                max_retries: 3,
                initial_delay_ms: 1,
                max_delay_ms: 10,
                backoff_multiplier: 2.0,
            },
        }
    }

    fn response_body() -> String {
        json!({
            "resourceType": "Bundle",
            "type": "transaction-response",
            "entry": [{"response": {"status": "201 Created"}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_submit_bundle_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", FHIR_JSON)
            .with_status(200)
            .with_body(response_body())
            .create_async()
            .await;

        let store = HttpFhirStore::new(config(&server.url())).unwrap();
        let response = store.submit_bundle(&Bundle::transaction()).await.unwrap();

        assert_eq!(response.count_outcomes(), (1, 0));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_transaction_is_terminal() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(422)
            .with_body("bundle failed validation")
            .expect(1)
            .create_async()
            .await;

        let store = HttpFhirStore::new(config(&server.url())).unwrap();
        let result = store.submit_bundle(&Bundle::transaction()).await;

        assert!(matches!(
            result,
            Err(ConcordError::FhirStore(FhirStoreError::TransactionRejected {
                status: 422,
                ..
            }))
        ));
        // A 4xx rejection must not be retried
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let failing = server
            .mock("POST", "/")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let store = HttpFhirStore::new(config(&server.url())).unwrap();
        let result = store.submit_bundle(&Bundle::transaction()).await;

        assert!(matches!(
            result,
            Err(ConcordError::FhirStore(FhirStoreError::TransactionRejected {
                status: 503,
                ..
            }))
        ));
        failing.assert_async().await;
    }

    #[tokio::test]
    async fn test_basic_auth_header() {
        let mut server = mockito::Server::new_async().await;
        // "svc:secret" base64-encoded
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Basic c3ZjOnNlY3JldA==")
            .with_status(200)
            .with_body(response_body())
            .create_async()
            .await;

        let mut cfg = config(&server.url());
        cfg.auth_type = "basic".to_string();
        cfg.username = Some("svc".to_string());
        cfg.password = Some("secret".to_string());

        let store = HttpFhirStore::new(cfg).unwrap();
        store.submit_bundle(&Bundle::transaction()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bearer_auth_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer sekrit")
            .with_status(200)
            .with_body(response_body())
            .create_async()
            .await;

        let mut cfg = config(&server.url());
        cfg.auth_type = "bearer".to_string();
        cfg.token = Some("sekrit".to_string());

        let store = HttpFhirStore::new(cfg).unwrap();
        store.submit_bundle(&Bundle::transaction()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(401)
            .create_async()
            .await;

        let store = HttpFhirStore::new(config(&server.url())).unwrap();
        let result = store.submit_bundle(&Bundle::transaction()).await;

        assert!(matches!(
            result,
            Err(ConcordError::FhirStore(FhirStoreError::AuthenticationFailed(_)))
        ));
    }

    #[tokio::test]
    async fn test_non_bundle_response_is_invalid() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let store = HttpFhirStore::new(config(&server.url())).unwrap();
        let result = store.submit_bundle(&Bundle::transaction()).await;

        assert!(matches!(
            result,
            Err(ConcordError::FhirStore(FhirStoreError::InvalidResponse(_)))
        ));
    }
}
