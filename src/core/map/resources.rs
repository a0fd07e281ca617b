//! FHIR resource models
//!
//! Serde models for the subset of FHIR R4 Concord emits: Patient,
//! Observation, and transaction Bundles. Optional fields are omitted from
//! the wire format entirely when absent rather than serialized as null.
//! Bundle entries hold resources as raw JSON values so passthrough bundles
//! survive unchanged.

use serde::{Deserialize, Serialize};

/// Identifier system for patient external identifiers
pub const PATIENT_IDENTIFIER_SYSTEM: &str = "urn:concord:identifier:patient";

/// Identifier system for observation composite identifiers
pub const OBSERVATION_IDENTIFIER_SYSTEM: &str = "urn:concord:identifier:observation";

/// Unit-of-measure coding system for numeric quantities
pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

/// Namespaced identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub system: String,
    pub value: String,
}

impl Identifier {
    pub fn new(system: &str, value: impl Into<String>) -> Self {
        Self {
            system: system.to_string(),
            value: value.into(),
        }
    }
}

/// Structured human name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

/// Contact point (phone or email)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub system: String,
    pub value: String,
}

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Patient resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub resource_type: String,
    pub identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Omitted entirely when the source record has neither phone nor email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telecom: Option<Vec<ContactPoint>>,
    /// Omitted entirely when the source record has no address parts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Vec<Address>>,
}

/// Terminology coding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
    pub display: String,
}

/// Codeable concept: a coding list for known codes, free text otherwise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding: Option<Vec<Coding>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Measured quantity with a fixed unit system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
    pub system: String,
}

/// Reference to another resource, by intra-bundle identity during submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
}

/// Observation resource
///
/// Carries exactly one of `valueQuantity` or `valueString`, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub resource_type: String,
    pub identifier: Vec<Identifier>,
    pub status: String,
    pub code: CodeableConcept,
    pub subject: Reference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
}

/// Conditional-create request directive for one bundle entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleRequest {
    pub method: String,
    pub url: String,
    /// Create only if no existing resource matches this identifier query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_none_exist: Option<String>,
}

/// Per-entry reply from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntryResponse {
    pub status: String,
}

impl BundleEntryResponse {
    /// A status string beginning with `2` indicates success
    pub fn is_success(&self) -> bool {
        self.status.starts_with('2')
    }
}

/// One entry of a bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<BundleRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<BundleEntryResponse>,
}

impl BundleEntry {
    /// Build a conditional-create entry
    pub fn create(
        full_url: String,
        resource: serde_json::Value,
        resource_type: &str,
        if_none_exist: String,
    ) -> Self {
        Self {
            full_url: Some(full_url),
            resource: Some(resource),
            request: Some(BundleRequest {
                method: "POST".to_string(),
                url: resource_type.to_string(),
                if_none_exist: Some(if_none_exist),
            }),
            response: None,
        }
    }
}

/// Bundle of resources submitted (or returned) as one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,
    #[serde(rename = "type")]
    pub bundle_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// Create an empty transaction bundle
    pub fn transaction() -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            bundle_type: "transaction".to_string(),
            entry: Vec::new(),
        }
    }

    /// Count reply entries whose status indicates success
    pub fn count_outcomes(&self) -> (usize, usize) {
        let succeeded = self
            .entry
            .iter()
            .filter(|e| e.response.as_ref().is_some_and(BundleEntryResponse::is_success))
            .count();
        (succeeded, self.entry.len() - succeeded)
    }
}
