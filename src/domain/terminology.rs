//! Compiled-in terminology table
//!
//! Maps the small set of LOINC codes Concord recognizes to internal type
//! tags and display text. The table is immutable and compiled in; unknown
//! codes fall back to a derived free-form tag and a text-only coding at
//! mapping time.

/// Coding system URI for LOINC
pub const LOINC_SYSTEM: &str = "http://loinc.org";

/// One row of the terminology table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminologyEntry {
    /// LOINC code
    pub code: &'static str,
    /// Internal observation type tag
    pub tag: &'static str,
    /// Human-readable display text
    pub display: &'static str,
}

/// Known vital-sign and lab codes
///
/// Small enough that a linear scan beats a hash map; the table is consulted
/// once per result segment.
const TERMINOLOGY: &[TerminologyEntry] = &[
    TerminologyEntry {
        code: "8867-4",
        tag: "heart_rate",
        display: "Heart rate",
    },
    TerminologyEntry {
        code: "8480-6",
        tag: "systolic_blood_pressure",
        display: "Systolic blood pressure",
    },
    TerminologyEntry {
        code: "8462-4",
        tag: "diastolic_blood_pressure",
        display: "Diastolic blood pressure",
    },
    TerminologyEntry {
        code: "8310-5",
        tag: "body_temperature",
        display: "Body temperature",
    },
    TerminologyEntry {
        code: "9279-1",
        tag: "respiratory_rate",
        display: "Respiratory rate",
    },
    TerminologyEntry {
        code: "2708-6",
        tag: "oxygen_saturation",
        display: "Oxygen saturation",
    },
    TerminologyEntry {
        code: "29463-7",
        tag: "body_weight",
        display: "Body weight",
    },
    TerminologyEntry {
        code: "8302-2",
        tag: "body_height",
        display: "Body height",
    },
    TerminologyEntry {
        code: "2339-0",
        tag: "glucose",
        display: "Glucose",
    },
];

/// Look up a terminology entry by LOINC code
pub fn lookup_code(code: &str) -> Option<&'static TerminologyEntry> {
    TERMINOLOGY.iter().find(|entry| entry.code == code)
}

/// Look up a terminology entry by internal type tag
pub fn lookup_tag(tag: &str) -> Option<&'static TerminologyEntry> {
    TERMINOLOGY.iter().find(|entry| entry.tag == tag)
}

/// Derive a type tag from an unknown code
///
/// Non-alphanumeric characters become underscores so the tag is safe to use
/// in identifiers and field names.
pub fn derive_tag(code: &str) -> String {
    code.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Resolve a code to a type tag: known codes map through the table, unknown
/// codes derive a tag from the code itself
pub fn tag_for_code(code: &str) -> String {
    match lookup_code(code) {
        Some(entry) => entry.tag.to_string(),
        None => derive_tag(code),
    }
}
