//! Harmonization dispatcher
//!
//! One invocation handles one file-landed event: decode, classify, fetch,
//! parse, map, submit, report. Every step before submission can abort the
//! invocation with no partial effect; after submission the per-entry reply
//! statuses are aggregated into the report. Nothing is retried here —
//! redelivery of the same event is safe because every create in the bundle
//! is conditional on its namespaced identifier.

use super::event::StorageEvent;
use super::report::IngestReport;
use crate::adapters::fhir::{FhirStore, HttpFhirStore};
use crate::adapters::storage::{create_object_store, ObjectStore};
use crate::config::ConcordConfig;
use crate::core::classify::{self, SourceFormat};
use crate::core::map::{build_bundle, Bundle};
use crate::core::parse::{segment, TabularParser};
use crate::domain::{ConcordError, Result};
use serde_json::Value;
use std::sync::Arc;

/// Dispatcher behavior toggles
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    /// Parse and map but skip submission and archiving
    pub dry_run: bool,
    /// Move successfully submitted objects under the processed prefix
    pub archive_processed: bool,
}

/// Harmonization dispatcher
///
/// Owns the two external collaborators behind their traits; one instance
/// handles any number of events, each as an independent sequential unit of
/// work with no shared mutable state.
pub struct Dispatcher {
    storage: Arc<dyn ObjectStore>,
    fhir: Arc<dyn FhirStore>,
    options: DispatchOptions,
}

impl Dispatcher {
    /// Create a dispatcher from explicit collaborators
    pub fn new(
        storage: Arc<dyn ObjectStore>,
        fhir: Arc<dyn FhirStore>,
        options: DispatchOptions,
    ) -> Self {
        Self {
            storage,
            fhir,
            options,
        }
    }

    /// Create a dispatcher wired from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if either adapter cannot be constructed from its
    /// configuration section.
    pub fn from_config(config: &ConcordConfig) -> Result<Self> {
        let storage = create_object_store(&config.storage)?;
        let fhir = Arc::new(HttpFhirStore::new(config.fhir.clone())?) as Arc<dyn FhirStore>;
        Ok(Self::new(
            storage,
            fhir,
            DispatchOptions {
                dry_run: config.application.dry_run,
                archive_processed: config.ingestion.archive_processed,
            },
        ))
    }

    /// Handle one inbound event end to end
    ///
    /// # Errors
    ///
    /// Returns `ConcordError::Decode` for an unrecognized payload shape and
    /// a processing error for anything that fails between fetch and
    /// submission. An ineligible path is not an error; it yields a skip
    /// report.
    pub async fn handle(&self, payload: &Value) -> Result<IngestReport> {
        let event = StorageEvent::decode(payload)?;
        let format = SourceFormat::from_path(&event.name);
        tracing::info!(
            bucket = %event.bucket,
            name = %event.name,
            format = format.as_str(),
            "Received file event"
        );

        if !classify::is_eligible(&event.name) {
            let reason = skip_reason(&event.name);
            tracing::info!(name = %event.name, reason = reason, "Skipping ineligible path");
            return Ok(IngestReport::skipped(&event.name, reason));
        }

        let content = self.storage.fetch_text(&event.bucket, &event.name).await?;

        let (bundle, patients, observations) = match format {
            SourceFormat::Passthrough => (parse_passthrough(&content)?, 0, 0),
            SourceFormat::Tabular => {
                let output = TabularParser::new().parse(&content)?;
                let bundle = build_bundle(&output.patients, &output.observations)?;
                (bundle, output.patients.len(), output.observations.len())
            }
            SourceFormat::Segmented => {
                let output = segment::parse(&content);
                if !output.skipped.is_empty() {
                    tracing::warn!(
                        skipped = output.skipped.len(),
                        "Segmented input had unusable result segments"
                    );
                }
                let records = output.records;
                let bundle = build_bundle(&records.patients, &records.observations)?;
                (bundle, records.patients.len(), records.observations.len())
            }
            // is_eligible already rejected unrecognized paths
            SourceFormat::Unrecognized => {
                return Ok(IngestReport::skipped(&event.name, "unrecognized format"));
            }
        };

        let entries = bundle.entry.len();

        if self.options.dry_run {
            tracing::info!(entries = entries, "Dry run, bundle not submitted");
            return Ok(IngestReport::dry_run(&event.name, patients, observations, entries));
        }

        let response = self.fhir.submit_bundle(&bundle).await?;
        let (succeeded, failed) = response.count_outcomes();

        if self.options.archive_processed {
            let destination = classify::archive_path(&event.name);
            // Archive failure is not fatal: redelivery of an already
            // submitted file is a no-op at the store.
            if let Err(e) = self
                .storage
                .move_object(&event.bucket, &event.name, &destination)
                .await
            {
                tracing::error!(error = %e, name = %event.name, "Failed to archive processed object");
            }
        }

        tracing::info!(
            name = %event.name,
            patients = patients,
            observations = observations,
            entries = entries,
            succeeded = succeeded,
            failed = failed,
            "Bundle submitted"
        );

        Ok(IngestReport::submitted(
            &event.name,
            patients,
            observations,
            entries,
            succeeded,
            failed,
        ))
    }
}

/// Parse passthrough content as a pre-built transaction bundle
///
/// Validate-and-forward only: the bundle is submitted unchanged, with no
/// mapping step.
fn parse_passthrough(content: &str) -> Result<Bundle> {
    let bundle: Bundle = serde_json::from_str(content)
        .map_err(|e| ConcordError::Parse(format!("passthrough content is not a bundle: {e}")))?;

    if bundle.resource_type != "Bundle" {
        return Err(ConcordError::Parse(format!(
            "passthrough resourceType must be Bundle, got '{}'",
            bundle.resource_type
        )));
    }
    if bundle.bundle_type != "transaction" {
        return Err(ConcordError::Parse(format!(
            "passthrough bundle type must be transaction, got '{}'",
            bundle.bundle_type
        )));
    }

    Ok(bundle)
}

/// Why an ineligible path was skipped
fn skip_reason(name: &str) -> &'static str {
    if name.ends_with(".keep") {
        "placeholder marker file"
    } else if name.starts_with(classify::PROCESSED_PREFIX) {
        "already processed"
    } else {
        "unrecognized format"
    }
}
