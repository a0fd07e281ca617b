//! Intermediate record → FHIR resource mapping

use super::resources::{
    Address, CodeableConcept, Coding, ContactPoint, HumanName, Identifier, Observation, Patient,
    Quantity, Reference, OBSERVATION_IDENTIFIER_SYSTEM, PATIENT_IDENTIFIER_SYSTEM, UCUM_SYSTEM,
};
use crate::domain::records::{ObservationRecord, ObservationValue, PatientRecord};
use crate::domain::terminology::{self, LOINC_SYSTEM};

/// Map an intermediate patient record to a Patient resource
///
/// The external identifier is namespaced under the fixed patient identifier
/// system. Telecom and address lists are omitted entirely when the record
/// carries nothing for them; partial addresses are carried through as-is.
pub fn map_patient(record: &PatientRecord) -> Patient {
    let name = if record.given_name.is_some() || record.family_name.is_some() {
        vec![HumanName {
            family: record.family_name.clone(),
            given: record.given_name.clone().into_iter().collect(),
        }]
    } else {
        Vec::new()
    };

    let mut telecom = Vec::new();
    if let Some(phone) = &record.phone {
        telecom.push(ContactPoint {
            system: "phone".to_string(),
            value: phone.clone(),
        });
    }
    if let Some(email) = &record.email {
        telecom.push(ContactPoint {
            system: "email".to_string(),
            value: email.clone(),
        });
    }

    let address = record.address.as_ref().map(|a| {
        vec![Address {
            line: a.line.clone().into_iter().collect(),
            city: a.city.clone(),
            state: a.state.clone(),
            postal_code: a.postal_code.clone(),
        }]
    });

    Patient {
        resource_type: "Patient".to_string(),
        identifier: vec![Identifier::new(PATIENT_IDENTIFIER_SYSTEM, &record.external_id)],
        name,
        gender: record.sex.as_str().to_string(),
        birth_date: record.birth_date.clone(),
        telecom: if telecom.is_empty() { None } else { Some(telecom) },
        address,
    }
}

/// Map an intermediate observation record to an Observation resource
///
/// `subject_reference` is the owning patient's intra-bundle identity. The
/// coding list is present only when the type tag resolves through the
/// terminology table; otherwise the code falls back to free text with
/// underscores replaced by spaces. Numeric values become `valueQuantity`,
/// everything else `valueString`.
pub fn map_observation(record: &ObservationRecord, subject_reference: &str) -> Observation {
    let code = match terminology::lookup_tag(&record.kind) {
        Some(entry) => CodeableConcept {
            coding: Some(vec![Coding {
                system: LOINC_SYSTEM.to_string(),
                code: entry.code.to_string(),
                display: entry.display.to_string(),
            }]),
            text: Some(entry.display.to_string()),
        },
        None => CodeableConcept {
            coding: None,
            text: Some(record.kind.replace('_', " ")),
        },
    };

    let (value_quantity, value_string) = match &record.value {
        ObservationValue::Numeric(n) => (
            Some(Quantity {
                value: *n,
                unit: record.unit.clone(),
                system: UCUM_SYSTEM.to_string(),
            }),
            None,
        ),
        ObservationValue::Text(s) => (None, Some(s.clone())),
    };

    Observation {
        resource_type: "Observation".to_string(),
        identifier: vec![Identifier::new(
            OBSERVATION_IDENTIFIER_SYSTEM,
            record.composite_key(),
        )],
        status: "final".to_string(),
        code,
        subject: Reference {
            reference: subject_reference.to_string(),
        },
        effective_date_time: record.effective_date.clone(),
        value_quantity,
        value_string,
    }
}
