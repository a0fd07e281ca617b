//! Core harmonization logic for Concord.
//!
//! This module contains the harmonization pipeline and its orchestration.
//!
//! # Modules
//!
//! - [`classify`] - Path-based source-format classification and eligibility
//! - [`parse`] - Tabular and segmented-message parsers
//! - [`map`] - FHIR resource mapping and transaction bundle assembly
//! - [`dispatch`] - Event decoding, routing, submission, and reporting
//!
//! # Ingestion Workflow
//!
//! One file-landed event flows through the pipeline:
//!
//! 1. **Decode**: Extract bucket and object path from the event payload
//! 2. **Classify**: Map the path to a source format; skip ineligible paths
//! 3. **Fetch**: Read the file content from object storage
//! 4. **Parse**: Produce intermediate patient/observation records
//! 5. **Map**: Build one transaction bundle with conditional creates
//! 6. **Submit**: POST the bundle to the FHIR store as an atomic unit
//! 7. **Report**: Aggregate per-entry statuses into the ingest report
//!
//! # Example
//!
//! ```rust,no_run
//! use concord::config::load_config;
//! use concord::core::dispatch::Dispatcher;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("concord.toml")?;
//! let dispatcher = Dispatcher::from_config(&config)?;
//!
//! let event = json!({"bucket": "landing", "name": "csv/batch-01.csv"});
//! let report = dispatcher.handle(&event).await?;
//!
//! println!("{} entries, {} succeeded", report.entries, report.succeeded);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod dispatch;
pub mod map;
pub mod parse;
