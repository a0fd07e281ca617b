//! Configuration schema types
//!
//! This module defines the configuration structure for Concord.

use serde::{Deserialize, Serialize};
use url::Url;

/// Object storage backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// HTTP object store (bucket and object path appended to a base URL)
    #[default]
    Http,
    /// Local filesystem store (bucket maps to a subdirectory of a root path)
    Local,
}

/// Main Concord configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcordConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Object storage configuration
    pub storage: StorageConfig,

    /// FHIR store configuration
    pub fhir: FhirConfig,

    /// Ingestion behavior
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConcordConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.storage.validate()?;
        self.fhir.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (parse and map but don't submit to the FHIR store)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend implementation
    #[serde(default)]
    pub backend: StorageBackend,

    /// Base URL of the HTTP object store (required for the http backend)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Root directory of the local store (required for the local backend)
    #[serde(default)]
    pub root_path: Option<String>,

    /// Bearer token for the HTTP backend (optional)
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        match self.backend {
            StorageBackend::Http => {
                let base_url = self
                    .base_url
                    .as_deref()
                    .ok_or("storage.base_url is required when storage.backend = 'http'")?;
                Url::parse(base_url)
                    .map_err(|e| format!("Invalid storage.base_url '{base_url}': {e}"))?;
            }
            StorageBackend::Local => {
                if self.root_path.as_deref().unwrap_or_default().is_empty() {
                    return Err(
                        "storage.root_path is required when storage.backend = 'local'".to_string()
                    );
                }
            }
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Http,
            base_url: None,
            root_path: None,
            token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// FHIR store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FhirConfig {
    /// Base URL of the FHIR store (transactions are POSTed here)
    pub base_url: String,

    /// Authentication type: none, basic, or bearer
    #[serde(default = "default_auth_type")]
    pub auth_type: String,

    /// Username for basic authentication
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[serde(default)]
    pub password: Option<String>,

    /// Token for bearer authentication
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Transport-level retry policy
    #[serde(default)]
    pub retry: RetryConfig,
}

impl FhirConfig {
    fn validate(&self) -> Result<(), String> {
        Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid fhir.base_url '{}': {e}", self.base_url))?;

        match self.auth_type.as_str() {
            "none" => {}
            "basic" => {
                if self.username.is_none() || self.password.is_none() {
                    return Err(
                        "fhir.username and fhir.password are required when fhir.auth_type = 'basic'"
                            .to_string(),
                    );
                }
            }
            "bearer" => {
                if self.token.is_none() {
                    return Err(
                        "fhir.token is required when fhir.auth_type = 'bearer'".to_string()
                    );
                }
            }
            other => {
                return Err(format!(
                    "Invalid fhir.auth_type '{other}'. Must be one of: none, basic, bearer"
                ));
            }
        }
        Ok(())
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Ingestion behavior configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Move successfully submitted objects under the processed prefix
    #[serde(default)]
    pub archive_processed: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging with rotation
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_auth_type() -> String {
    "none".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
