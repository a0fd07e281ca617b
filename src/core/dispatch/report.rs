//! Ingestion outcome report
//!
//! The report is the sole contract surface visible to operators and log
//! consumers; its field names are stable and must not change.

use serde::{Deserialize, Serialize};

/// Outcome of one dispatcher invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Human-readable outcome message
    pub message: String,
    /// Originating file path
    pub file: String,
    /// Distinct patients parsed
    pub patients: usize,
    /// Observations parsed (orphans included)
    pub observations: usize,
    /// Bundle entries submitted
    pub entries: usize,
    /// Entries the store accepted (2xx reply status)
    pub succeeded: usize,
    /// Entries the store did not accept
    pub failed: usize,
}

impl IngestReport {
    /// Report for an ineligible path: a successful no-op, not an error
    pub fn skipped(file: &str, reason: &str) -> Self {
        Self {
            message: format!("Skipped: {reason}"),
            file: file.to_string(),
            patients: 0,
            observations: 0,
            entries: 0,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Report for a completed submission
    pub fn submitted(
        file: &str,
        patients: usize,
        observations: usize,
        entries: usize,
        succeeded: usize,
        failed: usize,
    ) -> Self {
        Self {
            message: "Processed".to_string(),
            file: file.to_string(),
            patients,
            observations,
            entries,
            succeeded,
            failed,
        }
    }

    /// Report for a dry run: parsed and mapped, nothing submitted
    pub fn dry_run(file: &str, patients: usize, observations: usize, entries: usize) -> Self {
        Self {
            message: "Dry run: bundle not submitted".to_string(),
            file: file.to_string(),
            patients,
            observations,
            entries,
            succeeded: 0,
            failed: 0,
        }
    }
}
