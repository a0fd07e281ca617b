//! Tabular (CSV) parser
//!
//! Parses delimited tabular text with a header row into intermediate
//! patient and observation records. Column access is header-driven, fields
//! are trimmed, and patients are deduplicated by external identifier with
//! first-seen field values winning.
//!
//! This parser is deliberately fail-fast: a ragged row or unterminated
//! quote aborts the whole parse. Tabular extracts arrive from controlled
//! batch exports, unlike segmented feeds, so structural damage means the
//! export itself is broken.

use crate::domain::records::{
    ObservationRecord, ObservationValue, ParseOutput, PatientRecord, PostalAddress, Sex,
};
use crate::domain::{ConcordError, Result};
use chrono::{NaiveDate, Utc};
use csv::StringRecord;
use indexmap::IndexMap;
use std::collections::HashMap;

const COL_PATIENT_ID: &str = "patient_id";
const COL_FIRST_NAME: &str = "first_name";
const COL_LAST_NAME: &str = "last_name";
const COL_BIRTH_DATE: &str = "birth_date";
const COL_GENDER: &str = "gender";
const COL_ADDRESS_LINE: &str = "address_line";
const COL_CITY: &str = "city";
const COL_STATE: &str = "state";
const COL_POSTAL_CODE: &str = "postal_code";
const COL_PHONE: &str = "phone";
const COL_EMAIL: &str = "email";
const COL_OBS_TYPE: &str = "observation_type";
const COL_OBS_VALUE: &str = "observation_value";
const COL_OBS_UNIT: &str = "observation_unit";
const COL_OBS_DATE: &str = "observation_date";

const REQUIRED_COLUMNS: &[&str] = &[
    COL_PATIENT_ID,
    COL_FIRST_NAME,
    COL_LAST_NAME,
    COL_BIRTH_DATE,
    COL_GENDER,
];

/// Tabular parser
///
/// Holds the processing date used when a row carries an observation without
/// an explicit date. Injectable for deterministic tests.
#[derive(Debug, Clone)]
pub struct TabularParser {
    processing_date: NaiveDate,
}

impl TabularParser {
    /// Create a parser using today's UTC date as the processing date
    pub fn new() -> Self {
        Self {
            processing_date: Utc::now().date_naive(),
        }
    }

    /// Create a parser with an explicit processing date
    pub fn with_processing_date(processing_date: NaiveDate) -> Self {
        Self { processing_date }
    }

    /// Parse delimited text into intermediate records
    ///
    /// Returns the deduplicated patient list in first-seen order and the
    /// full observation list in row order.
    ///
    /// # Errors
    ///
    /// Returns `ConcordError::Parse` on structurally malformed input
    /// (ragged rows, unterminated quoting, missing required columns).
    /// There is no row-level recovery.
    pub fn parse(&self, input: &str) -> Result<ParseOutput> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(input.as_bytes());

        let columns = column_index(reader.headers()?)?;

        let mut patients: IndexMap<String, PatientRecord> = IndexMap::new();
        let mut observations = Vec::new();

        for (row_number, row) in reader.records().enumerate() {
            let row = row?;

            let Some(patient_id) = get(&row, &columns, COL_PATIENT_ID) else {
                tracing::warn!(row = row_number + 1, "Row without patient identifier, skipping");
                continue;
            };
            let patient_id = patient_id.to_string();

            // First occurrence wins; later rows with the same identifier
            // still contribute their observation columns below.
            patients
                .entry(patient_id.clone())
                .or_insert_with(|| self.patient_from_row(&patient_id, &row, &columns));

            if let Some(observation) = self.observation_from_row(&patient_id, &row, &columns) {
                observations.push(observation);
            }
        }

        tracing::debug!(
            patients = patients.len(),
            observations = observations.len(),
            "Parsed tabular input"
        );

        Ok(ParseOutput {
            patients: patients.into_values().collect(),
            observations,
        })
    }

    fn patient_from_row(
        &self,
        patient_id: &str,
        row: &StringRecord,
        columns: &HashMap<String, usize>,
    ) -> PatientRecord {
        let address = PostalAddress {
            line: get(row, columns, COL_ADDRESS_LINE).map(str::to_string),
            city: get(row, columns, COL_CITY).map(str::to_string),
            state: get(row, columns, COL_STATE).map(str::to_string),
            postal_code: get(row, columns, COL_POSTAL_CODE).map(str::to_string),
        };

        PatientRecord {
            external_id: patient_id.to_string(),
            given_name: get(row, columns, COL_FIRST_NAME).map(str::to_string),
            family_name: get(row, columns, COL_LAST_NAME).map(str::to_string),
            birth_date: get(row, columns, COL_BIRTH_DATE).map(str::to_string),
            sex: Sex::normalize(get(row, columns, COL_GENDER).unwrap_or_default()),
            address: if address.is_empty() { None } else { Some(address) },
            phone: get(row, columns, COL_PHONE).map(str::to_string),
            email: get(row, columns, COL_EMAIL).map(str::to_string),
        }
    }

    fn observation_from_row(
        &self,
        patient_id: &str,
        row: &StringRecord,
        columns: &HashMap<String, usize>,
    ) -> Option<ObservationRecord> {
        // A row contributes an observation only when both type and value
        // are present.
        let kind = get(row, columns, COL_OBS_TYPE)?;
        let value = get(row, columns, COL_OBS_VALUE)?;

        Some(ObservationRecord {
            patient_id: patient_id.to_string(),
            kind: kind.to_string(),
            value: ObservationValue::coerce(value),
            unit: get(row, columns, COL_OBS_UNIT).unwrap_or_default().to_string(),
            effective_date: Some(
                get(row, columns, COL_OBS_DATE)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.processing_date.format("%Y-%m-%d").to_string()),
            ),
        })
    }
}

impl Default for TabularParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the header-name → column-index map, verifying required columns
fn column_index(headers: &StringRecord) -> Result<HashMap<String, usize>> {
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_string(), idx))
        .collect();

    for required in REQUIRED_COLUMNS {
        if !columns.contains_key(*required) {
            return Err(ConcordError::Parse(format!(
                "Missing required column: {required}"
            )));
        }
    }

    Ok(columns)
}

/// Fetch a trimmed, non-empty field by column name
fn get<'r>(row: &'r StringRecord, columns: &HashMap<String, usize>, name: &str) -> Option<&'r str> {
    let idx = *columns.get(name)?;
    match row.get(idx) {
        Some(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
