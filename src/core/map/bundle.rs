//! Transaction bundle assembly
//!
//! Builds one atomic submission from a parse result. Each patient gets a
//! fresh bundle-scoped `urn:uuid` identity; observations link to their
//! owner through that identity, never through the external identifier.
//! Conditional-create directives keyed on namespaced identifiers make
//! resubmission of the same file a no-op at the store.

use super::mapper::{map_observation, map_patient};
use super::resources::{
    Bundle, BundleEntry, OBSERVATION_IDENTIFIER_SYSTEM, PATIENT_IDENTIFIER_SYSTEM,
};
use crate::domain::records::{ObservationRecord, PatientRecord};
use crate::domain::Result;
use std::collections::HashMap;
use uuid::Uuid;

/// Build a transaction bundle from parsed records
///
/// Every patient entry precedes every observation entry, and relative order
/// within each group matches input order. An observation whose owning
/// patient identifier is not among the patients of this same call is
/// dropped with a warning; it is never emitted as an orphan.
pub fn build_bundle(
    patients: &[PatientRecord],
    observations: &[ObservationRecord],
) -> Result<Bundle> {
    let mut bundle = Bundle::transaction();

    // External identifier → bundle-scoped identity, local to this call so
    // identities never leak across submissions.
    let mut identities: HashMap<&str, String> = HashMap::with_capacity(patients.len());

    for record in patients {
        let identity = format!("urn:uuid:{}", Uuid::new_v4());
        let resource = serde_json::to_value(map_patient(record))?;
        bundle.entry.push(BundleEntry::create(
            identity.clone(),
            resource,
            "Patient",
            conditional_identifier(PATIENT_IDENTIFIER_SYSTEM, &record.external_id),
        ));
        identities.insert(record.external_id.as_str(), identity);
    }

    for record in observations {
        let Some(subject) = identities.get(record.patient_id.as_str()) else {
            tracing::warn!(
                patient_id = %record.patient_id,
                kind = %record.kind,
                "Dropping observation with unresolvable patient"
            );
            continue;
        };
        let identity = format!("urn:uuid:{}", Uuid::new_v4());
        let resource = serde_json::to_value(map_observation(record, subject))?;
        bundle.entry.push(BundleEntry::create(
            identity,
            resource,
            "Observation",
            conditional_identifier(OBSERVATION_IDENTIFIER_SYSTEM, &record.composite_key()),
        ));
    }

    Ok(bundle)
}

/// Conditional-create query matching a namespaced identifier
fn conditional_identifier(system: &str, value: &str) -> String {
    format!("identifier={system}|{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::{ObservationValue, Sex};

    fn patient(id: &str) -> PatientRecord {
        PatientRecord {
            sex: Sex::Female,
            ..PatientRecord::new(id)
        }
    }

    fn observation(patient_id: &str, kind: &str, value: f64) -> ObservationRecord {
        ObservationRecord {
            patient_id: patient_id.to_string(),
            kind: kind.to_string(),
            value: ObservationValue::Numeric(value),
            unit: "bpm".to_string(),
            effective_date: Some("2024-03-01".to_string()),
        }
    }

    #[test]
    fn test_orphan_observation_is_dropped() {
        let patients = vec![patient("P001"), patient("P002")];
        let observations = vec![
            observation("P001", "heart_rate", 72.0),
            observation("P404", "heart_rate", 90.0),
            observation("P002", "heart_rate", 65.0),
        ];

        let bundle = build_bundle(&patients, &observations).unwrap();

        // 2 patients + 2 resolvable observations
        assert_eq!(bundle.entry.len(), 4);
        let urls: Vec<&str> = bundle
            .entry
            .iter()
            .map(|e| e.request.as_ref().unwrap().url.as_str())
            .collect();
        assert_eq!(urls, vec!["Patient", "Patient", "Observation", "Observation"]);
    }

    #[test]
    fn test_observations_reference_bundle_identity_not_external_id() {
        let patients = vec![patient("P001")];
        let observations = vec![
            observation("P001", "heart_rate", 72.0),
            observation("P001", "heart_rate", 81.0),
        ];

        let bundle = build_bundle(&patients, &observations).unwrap();
        let patient_identity = bundle.entry[0].full_url.clone().unwrap();
        assert!(patient_identity.starts_with("urn:uuid:"));

        for entry in &bundle.entry[1..] {
            let resource = entry.resource.as_ref().unwrap();
            assert_eq!(
                resource["subject"]["reference"].as_str().unwrap(),
                patient_identity
            );
        }
    }

    #[test]
    fn test_idempotency_directives_are_stable_across_calls() {
        let patients = vec![patient("P001"), patient("P002")];
        let observations = vec![observation("P001", "heart_rate", 72.0)];

        let first = build_bundle(&patients, &observations).unwrap();
        let second = build_bundle(&patients, &observations).unwrap();

        let directives = |bundle: &Bundle| -> Vec<String> {
            bundle
                .entry
                .iter()
                .filter_map(|e| e.request.as_ref()?.if_none_exist.clone())
                .collect()
        };
        assert_eq!(directives(&first), directives(&second));

        // Bundle-scoped identities are fresh per call
        assert_ne!(first.entry[0].full_url, second.entry[0].full_url);
    }

    #[test]
    fn test_patient_directive_keyed_on_external_identifier() {
        let bundle = build_bundle(&[patient("P001")], &[]).unwrap();
        assert_eq!(
            bundle.entry[0].request.as_ref().unwrap().if_none_exist.as_deref(),
            Some("identifier=urn:concord:identifier:patient|P001")
        );
    }

    #[test]
    fn test_observation_directive_keyed_on_composite_key() {
        let patients = vec![patient("P001")];
        let observations = vec![observation("P001", "heart_rate", 72.0)];
        let bundle = build_bundle(&patients, &observations).unwrap();

        assert_eq!(
            bundle.entry[1].request.as_ref().unwrap().if_none_exist.as_deref(),
            Some("identifier=urn:concord:identifier:observation|P001-heart_rate-2024-03-01-72")
        );
    }

    #[test]
    fn test_duplicate_observations_all_survive() {
        let patients = vec![patient("P001")];
        let observations = vec![
            observation("P001", "heart_rate", 72.0),
            observation("P001", "heart_rate", 72.0),
        ];
        let bundle = build_bundle(&patients, &observations).unwrap();

        // Parse-time duplicates both reach the bundle; the store's
        // conditional create collapses them.
        assert_eq!(bundle.entry.len(), 3);
    }

    #[test]
    fn test_empty_input_builds_empty_bundle() {
        let bundle = build_bundle(&[], &[]).unwrap();
        assert_eq!(bundle.resource_type, "Bundle");
        assert_eq!(bundle.bundle_type, "transaction");
        assert!(bundle.entry.is_empty());
    }
}
