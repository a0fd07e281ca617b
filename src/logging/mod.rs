//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted logs
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use concord::logging::init_logging;
//! use concord::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of an ingestion run
///
/// # Example
///
/// ```no_run
/// use concord::log_ingest_start;
///
/// log_ingest_start!("landing", "csv/batch-01.csv");
/// ```
#[macro_export]
macro_rules! log_ingest_start {
    ($bucket:expr, $name:expr) => {
        tracing::info!(
            bucket = %$bucket,
            name = %$name,
            "Starting ingestion"
        );
    };
}

/// Log the completion of an ingestion run
///
/// # Example
///
/// ```no_run
/// use concord::log_ingest_complete;
/// use std::time::Duration;
///
/// let entries = 42;
/// let duration = Duration::from_secs(3);
/// log_ingest_complete!(entries, duration);
/// ```
#[macro_export]
macro_rules! log_ingest_complete {
    ($entries:expr, $duration:expr) => {
        tracing::info!(
            entries = $entries,
            duration_ms = $duration.as_millis(),
            "Ingestion completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use concord::log_error_with_context;
/// use concord::domain::ConcordError;
///
/// let error = ConcordError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
