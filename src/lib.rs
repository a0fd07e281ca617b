// Concord - Clinical Record Harmonization Engine
// Copyright (c) 2025 Concord Contributors
// Licensed under the MIT License

//! # Concord - Clinical Record Harmonization Engine
//!
//! Concord ingests heterogeneous clinical record files landed in object
//! storage, harmonizes them into FHIR resources, and submits them to a FHIR
//! store as atomic, idempotent transaction bundles.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Classifying** landed files by path convention (CSV extracts, HL7v2-style
//!   segmented messages, pre-built FHIR bundles)
//! - **Parsing** delimited tabular records and pipe-delimited segmented
//!   messages into a common intermediate model
//! - **Mapping** intermediate records into FHIR Patient and Observation
//!   resources with conditional-create idempotency directives
//! - **Submitting** one transaction bundle per file and aggregating
//!   per-entry success/failure counts
//!
//! ## Architecture
//!
//! Concord follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Harmonization logic (classify, parse, map, dispatch)
//! - [`adapters`] - External integrations (object storage, FHIR store)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use concord::config::load_config;
//! use concord::core::dispatch::Dispatcher;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = load_config("concord.toml")?;
//!
//!     // Create the dispatcher
//!     let dispatcher = Dispatcher::from_config(&config)?;
//!
//!     // Handle a file-landed event
//!     let event = json!({"bucket": "landing", "name": "csv/batch-01.csv"});
//!     let report = dispatcher.handle(&event).await?;
//!
//!     println!("Submitted {} entries, {} succeeded", report.entries, report.succeeded);
//!     Ok(())
//! }
//! ```
//!
//! ## Idempotency
//!
//! Every bundle entry carries a conditional-create directive keyed on a
//! namespaced identifier, so redelivering the same file never duplicates
//! resources:
//!
//! ```rust
//! use concord::core::map::build_bundle;
//! use concord::domain::PatientRecord;
//!
//! # fn example() -> concord::domain::Result<()> {
//! let patients = vec![PatientRecord::new("P001")];
//! let bundle = build_bundle(&patients, &[])?;
//!
//! let request = bundle.entry[0].request.as_ref().unwrap();
//! assert_eq!(
//!     request.if_none_exist.as_deref(),
//!     Some("identifier=urn:concord:identifier:patient|P001")
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Concord uses the [`domain::ConcordError`] type for all errors, following
//! Rust best practices:
//!
//! ```rust,no_run
//! use concord::domain::ConcordError;
//!
//! fn example() -> Result<(), ConcordError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = concord::config::load_config("concord.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Concord uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting ingestion");
//! warn!(name = "hl7/feed.hl7", "Segmented input had unusable result segments");
//! error!(error = "connection refused", "Submission failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
