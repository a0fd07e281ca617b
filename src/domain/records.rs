//! Intermediate record model
//!
//! Both parsers produce the same intermediate representation: a deduplicated
//! list of patient records and a flat list of observation records. These
//! types exist only for the duration of a single parse-and-map pass; nothing
//! is persisted locally.

use serde::{Deserialize, Serialize};

/// Normalized administrative sex category
///
/// Every input string maps to exactly one variant; anything that isn't a
/// recognized word or single-letter code becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

impl Sex {
    /// Normalize a raw sex value, case-insensitively
    ///
    /// Accepts full words and single-letter codes: `m`/`male`, `f`/`female`,
    /// `o`/`other`. Everything else, including empty input, normalizes to
    /// `Unknown`.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "m" | "male" => Sex::Male,
            "f" | "female" => Sex::Female,
            "o" | "other" => Sex::Other,
            _ => Sex::Unknown,
        }
    }

    /// FHIR administrative-gender code for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
            Sex::Unknown => "unknown",
        }
    }
}

/// Postal address parts carried through from the source record
///
/// Partial addresses are preserved as-is; a record with only a city still
/// yields an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

impl PostalAddress {
    /// True when no part is present
    pub fn is_empty(&self) -> bool {
        self.line.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.postal_code.is_none()
    }
}

/// Intermediate patient record
///
/// The external identifier is the dedup key: within one parse run the first
/// occurrence of an identifier wins and later duplicates update nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// External patient identifier from the source system
    pub external_id: String,

    pub given_name: Option<String>,
    pub family_name: Option<String>,

    /// Birth date in ISO `YYYY-MM-DD` format
    pub birth_date: Option<String>,

    pub sex: Sex,

    pub address: Option<PostalAddress>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl PatientRecord {
    /// Create a minimal record carrying only the external identifier
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            given_name: None,
            family_name: None,
            birth_date: None,
            sex: Sex::Unknown,
            address: None,
            phone: None,
            email: None,
        }
    }
}

/// Observation value, either numeric or a short string
///
/// Numeric-looking source values are coerced to numbers at parse time so the
/// mapper can emit `valueQuantity` for numbers and `valueString` for
/// everything else, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationValue {
    Numeric(f64),
    Text(String),
}

impl ObservationValue {
    /// Coerce a raw field into a numeric or text value
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if trimmed.chars().any(|c| c.is_ascii_digit()) => ObservationValue::Numeric(n),
            _ => ObservationValue::Text(trimmed.to_string()),
        }
    }

    /// Canonical string form used in the composite identifier
    ///
    /// Integral numbers render without a trailing `.0` so the identifier is
    /// stable regardless of how the source formatted the value.
    pub fn key_form(&self) -> String {
        match self {
            ObservationValue::Numeric(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            ObservationValue::Numeric(n) => format!("{n}"),
            ObservationValue::Text(s) => s.clone(),
        }
    }
}

/// Intermediate observation record
///
/// Has no identity of its own at parse time; duplicates survive into the
/// output list. The composite key exists only to build the idempotent
/// submission directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Owning patient's external identifier; not required to resolve within
    /// the same parse run
    pub patient_id: String,

    /// Type tag: a mapped terminology tag or a derived free-form tag
    pub kind: String,

    pub value: ObservationValue,

    /// Unit of measure, empty for string-valued observations
    pub unit: String,

    /// Effective date in ISO `YYYY-MM-DD` format
    pub effective_date: Option<String>,
}

impl ObservationRecord {
    /// Composite key used for the idempotent-create directive
    pub fn composite_key(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.patient_id,
            self.kind,
            self.effective_date.as_deref().unwrap_or_default(),
            self.value.key_form()
        )
    }
}

/// Output of one parse invocation
///
/// Patients are deduplicated in first-seen order; observations keep full
/// input order including duplicates.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub patients: Vec<PatientRecord>,
    pub observations: Vec<ObservationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("m", Sex::Male; "single letter m")]
    #[test_case("M", Sex::Male; "uppercase m")]
    #[test_case("male", Sex::Male; "word male")]
    #[test_case("MALE", Sex::Male; "uppercase word")]
    #[test_case("f", Sex::Female; "single letter f")]
    #[test_case("Female", Sex::Female; "mixed case female")]
    #[test_case("o", Sex::Other; "single letter o")]
    #[test_case("other", Sex::Other; "word other")]
    #[test_case("", Sex::Unknown; "empty")]
    #[test_case("x", Sex::Unknown; "unrecognized letter")]
    #[test_case("nonbinary", Sex::Unknown; "unrecognized word")]
    fn test_sex_normalize(input: &str, expected: Sex) {
        assert_eq!(Sex::normalize(input), expected);
    }

    #[test]
    fn test_sex_as_str_roundtrip() {
        for sex in [Sex::Male, Sex::Female, Sex::Other, Sex::Unknown] {
            assert_eq!(Sex::normalize(sex.as_str()), sex);
        }
    }

    #[test]
    fn test_value_coercion_numeric() {
        assert_eq!(ObservationValue::coerce("72"), ObservationValue::Numeric(72.0));
        assert_eq!(
            ObservationValue::coerce(" 98.6 "),
            ObservationValue::Numeric(98.6)
        );
        assert_eq!(
            ObservationValue::coerce("-3.5"),
            ObservationValue::Numeric(-3.5)
        );
    }

    #[test]
    fn test_value_coercion_text() {
        assert_eq!(
            ObservationValue::coerce("positive"),
            ObservationValue::Text("positive".to_string())
        );
        assert_eq!(
            ObservationValue::coerce("12/8"),
            ObservationValue::Text("12/8".to_string())
        );
        assert_eq!(
            ObservationValue::coerce(""),
            ObservationValue::Text(String::new())
        );
    }

    #[test]
    fn test_value_key_form() {
        assert_eq!(ObservationValue::Numeric(72.0).key_form(), "72");
        assert_eq!(ObservationValue::Numeric(98.6).key_form(), "98.6");
        assert_eq!(
            ObservationValue::Text("positive".to_string()).key_form(),
            "positive"
        );
    }

    #[test]
    fn test_composite_key() {
        let record = ObservationRecord {
            patient_id: "P001".to_string(),
            kind: "heart_rate".to_string(),
            value: ObservationValue::Numeric(72.0),
            unit: "bpm".to_string(),
            effective_date: Some("2024-03-01".to_string()),
        };
        assert_eq!(record.composite_key(), "P001-heart_rate-2024-03-01-72");
    }

    #[test]
    fn test_composite_key_without_date() {
        let record = ObservationRecord {
            patient_id: "P001".to_string(),
            kind: "status".to_string(),
            value: ObservationValue::Text("stable".to_string()),
            unit: String::new(),
            effective_date: None,
        };
        assert_eq!(record.composite_key(), "P001-status--stable");
    }

    #[test]
    fn test_postal_address_is_empty() {
        assert!(PostalAddress::default().is_empty());
        let partial = PostalAddress {
            city: Some("Springfield".to_string()),
            ..Default::default()
        };
        assert!(!partial.is_empty());
    }
}
