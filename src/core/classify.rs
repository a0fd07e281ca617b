//! Source format classification
//!
//! Maps a storage path to a source format by path-prefix convention and
//! decides whether a path is eligible for processing at all. Both checks are
//! pure; the eligibility predicate runs before any content is fetched.

/// Path prefix for delimited tabular records
const TABULAR_PREFIX: &str = "csv/";

/// Path prefix for pipe-delimited segmented messages
const SEGMENTED_PREFIX: &str = "hl7/";

/// Path prefix for pre-built FHIR bundles (validate-and-forward)
const PASSTHROUGH_PREFIX: &str = "fhir/";

/// Prefix for objects that have already been processed and archived
pub const PROCESSED_PREFIX: &str = "processed/";

/// Suffix for zero-byte placeholder objects that keep empty prefixes visible
const PLACEHOLDER_SUFFIX: &str = ".keep";

/// Source format of an inbound file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Delimited tabular records with a header row
    Tabular,
    /// Pipe-delimited segmented messages
    Segmented,
    /// Pre-built FHIR bundle, submitted unchanged
    Passthrough,
    /// No known prefix matched
    Unrecognized,
}

impl SourceFormat {
    /// Classify a storage path by its prefix
    ///
    /// The match is case-sensitive and anchored at the start of the path;
    /// `CSV/export.csv` or `data/csv/export.csv` are both `Unrecognized`.
    pub fn from_path(path: &str) -> Self {
        if path.starts_with(TABULAR_PREFIX) {
            SourceFormat::Tabular
        } else if path.starts_with(SEGMENTED_PREFIX) {
            SourceFormat::Segmented
        } else if path.starts_with(PASSTHROUGH_PREFIX) {
            SourceFormat::Passthrough
        } else {
            SourceFormat::Unrecognized
        }
    }

    /// Short name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Tabular => "tabular",
            SourceFormat::Segmented => "segmented",
            SourceFormat::Passthrough => "passthrough",
            SourceFormat::Unrecognized => "unrecognized",
        }
    }
}

/// Whether a path should be processed
///
/// Placeholder markers, anything already under the processed prefix, and
/// paths with no recognized format are skipped. A skip is a successful
/// no-op outcome, not an error.
pub fn is_eligible(path: &str) -> bool {
    if path.ends_with(PLACEHOLDER_SUFFIX) {
        return false;
    }
    if path.starts_with(PROCESSED_PREFIX) {
        return false;
    }
    SourceFormat::from_path(path) != SourceFormat::Unrecognized
}

/// Destination path for archiving a processed object
pub fn archive_path(path: &str) -> String {
    format!("{PROCESSED_PREFIX}{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("csv/batch-01.csv", SourceFormat::Tabular; "tabular prefix")]
    #[test_case("hl7/adt.hl7", SourceFormat::Segmented; "segmented prefix")]
    #[test_case("fhir/bundle.json", SourceFormat::Passthrough; "passthrough prefix")]
    #[test_case("unknown/file.txt", SourceFormat::Unrecognized; "unknown prefix")]
    #[test_case("CSV/batch-01.csv", SourceFormat::Unrecognized; "prefix match is case sensitive")]
    #[test_case("data/csv/batch.csv", SourceFormat::Unrecognized; "prefix must be anchored")]
    #[test_case("csvfile.csv", SourceFormat::Unrecognized; "prefix requires separator")]
    fn test_classify(path: &str, expected: SourceFormat) {
        assert_eq!(SourceFormat::from_path(path), expected);
    }

    #[test]
    fn test_eligible_paths() {
        assert!(is_eligible("csv/batch-01.csv"));
        assert!(is_eligible("hl7/adt.hl7"));
        assert!(is_eligible("fhir/bundle.json"));
    }

    #[test]
    fn test_placeholder_markers_are_skipped() {
        assert!(!is_eligible("csv/.keep"));
        assert!(!is_eligible("hl7/inbox/.keep"));
    }

    #[test]
    fn test_processed_prefix_is_skipped() {
        assert!(!is_eligible("processed/csv/batch-01.csv"));
    }

    #[test]
    fn test_unrecognized_is_skipped() {
        assert!(!is_eligible("tmp/batch-01.csv"));
    }

    #[test]
    fn test_archive_path() {
        assert_eq!(archive_path("csv/batch-01.csv"), "processed/csv/batch-01.csv");
    }
}
