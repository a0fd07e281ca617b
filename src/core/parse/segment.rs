//! Segmented-message parser
//!
//! Parses pipe-delimited segmented messages (HL7v2-style) into the same
//! intermediate records as the tabular parser. Input may carry several
//! concatenated messages; each message is a header line (`MSH|...`) plus
//! every following line up to the next header.
//!
//! Unlike the tabular parser this one is tolerant: a message without a
//! patient-identity segment is skipped, and a malformed result segment is
//! recorded and skipped while parsing continues. Segmented feeds come from
//! live interface engines where per-message noise is routine, so one bad
//! segment must not poison the batch.

use crate::domain::records::{
    ObservationRecord, ObservationValue, ParseOutput, PatientRecord, PostalAddress, Sex,
};
use crate::domain::terminology;
use indexmap::IndexMap;

/// Message header segment type
const SEGMENT_HEADER: &str = "MSH";
/// Patient-identity segment type
const SEGMENT_PATIENT: &str = "PID";
/// Result segment type
const SEGMENT_RESULT: &str = "OBX";

// PID field positions (PID-n lands at token n since token 0 is the type)
const PID_IDENTIFIER: usize = 3;
const PID_NAME: usize = 5;
const PID_BIRTH_DATE: usize = 7;
const PID_SEX: usize = 8;
const PID_ADDRESS: usize = 11;
const PID_PHONE: usize = 13;

// OBX field positions
const OBX_CODE: usize = 3;
const OBX_VALUE: usize = 5;
const OBX_UNITS: usize = 6;
const OBX_TIMESTAMP: usize = 14;

// MSH-1 is the field separator itself and disappears when splitting on `|`,
// so MSH-7 (message timestamp) lands at token 6.
const MSH_TIMESTAMP: usize = 6;

/// A result segment that was skipped, with the reason
///
/// Skips are data, not errors: the tolerant-parsing contract is that the
/// rest of the input keeps processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSegment {
    /// Zero-based index of the message within the input
    pub message_index: usize,
    /// Raw segment line that was skipped
    pub segment: String,
    pub reason: String,
}

/// Result of parsing segmented input
#[derive(Debug, Default)]
pub struct SegmentedOutput {
    pub records: ParseOutput,
    pub skipped: Vec<SkippedSegment>,
}

/// One pipe-delimited line
struct Segment<'a> {
    kind: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> Segment<'a> {
    fn parse(line: &'a str) -> Self {
        let tokens: Vec<&str> = line.split('|').collect();
        Self {
            kind: tokens[0],
            tokens,
        }
    }

    /// Field by position, empty string when absent
    fn field(&self, index: usize) -> &'a str {
        self.tokens.get(index).copied().unwrap_or_default()
    }

    /// `^`-delimited component of a field, empty string when absent
    fn component(&self, index: usize, component: usize) -> &'a str {
        self.field(index)
            .split('^')
            .nth(component)
            .unwrap_or_default()
    }
}

/// Parse segmented-message input into intermediate records
///
/// Patients are deduplicated across all messages by external identifier
/// (first message wins); observations are concatenated in message order.
pub fn parse(input: &str) -> SegmentedOutput {
    let mut patients: IndexMap<String, PatientRecord> = IndexMap::new();
    let mut observations = Vec::new();
    let mut skipped = Vec::new();

    for (message_index, lines) in split_messages(input).into_iter().enumerate() {
        let segments: Vec<Segment> = lines.iter().map(|line| Segment::parse(line)).collect();

        let Some(pid) = segments.iter().find(|s| s.kind == SEGMENT_PATIENT) else {
            tracing::warn!(message = message_index, "Message without patient segment, skipping");
            continue;
        };

        let external_id = pid.component(PID_IDENTIFIER, 0).trim();
        if external_id.is_empty() {
            tracing::warn!(message = message_index, "Patient segment without identifier, skipping");
            continue;
        }

        patients
            .entry(external_id.to_string())
            .or_insert_with(|| patient_from_segment(external_id, pid));

        let header_date = segments
            .iter()
            .find(|s| s.kind == SEGMENT_HEADER)
            .and_then(|msh| reformat_compact_date(msh.field(MSH_TIMESTAMP)));

        for segment in segments.iter().filter(|s| s.kind == SEGMENT_RESULT) {
            match observation_from_segment(external_id, segment, header_date.as_deref()) {
                Ok(observation) => observations.push(observation),
                Err(reason) => {
                    tracing::warn!(
                        message = message_index,
                        reason = %reason,
                        "Skipping malformed result segment"
                    );
                    skipped.push(SkippedSegment {
                        message_index,
                        segment: segment.tokens.join("|"),
                        reason,
                    });
                }
            }
        }
    }

    tracing::debug!(
        patients = patients.len(),
        observations = observations.len(),
        skipped = skipped.len(),
        "Parsed segmented input"
    );

    SegmentedOutput {
        records: ParseOutput {
            patients: patients.into_values().collect(),
            observations,
        },
        skipped,
    }
}

/// Split raw input into messages at each header line
///
/// Lines before the first header are ignored; blank lines are dropped.
fn split_messages(input: &str) -> Vec<Vec<&str>> {
    let mut messages: Vec<Vec<&str>> = Vec::new();

    for line in input.split(['\r', '\n']) {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line.starts_with(&format!("{SEGMENT_HEADER}|")) {
            messages.push(vec![line]);
        } else if let Some(current) = messages.last_mut() {
            current.push(line);
        }
    }

    messages
}

fn patient_from_segment(external_id: &str, pid: &Segment) -> PatientRecord {
    let address = PostalAddress {
        line: non_empty(pid.component(PID_ADDRESS, 0)),
        // Component 1 is the "other designation" and is not carried
        city: non_empty(pid.component(PID_ADDRESS, 2)),
        state: non_empty(pid.component(PID_ADDRESS, 3)),
        postal_code: non_empty(pid.component(PID_ADDRESS, 4)),
    };

    PatientRecord {
        external_id: external_id.to_string(),
        family_name: non_empty(pid.component(PID_NAME, 0)),
        given_name: non_empty(pid.component(PID_NAME, 1)),
        birth_date: reformat_compact_date(pid.field(PID_BIRTH_DATE)),
        sex: Sex::normalize(pid.field(PID_SEX)),
        address: if address.is_empty() { None } else { Some(address) },
        phone: non_empty(pid.field(PID_PHONE)),
        email: None,
    }
}

fn observation_from_segment(
    patient_id: &str,
    obx: &Segment,
    header_date: Option<&str>,
) -> std::result::Result<ObservationRecord, String> {
    if obx.tokens.len() <= OBX_VALUE {
        return Err(format!(
            "truncated result segment ({} fields)",
            obx.tokens.len()
        ));
    }

    let code = obx.component(OBX_CODE, 0).trim();
    if code.is_empty() {
        return Err("missing observation code".to_string());
    }

    let raw_value = obx.field(OBX_VALUE).trim();
    if raw_value.is_empty() {
        return Err("missing observation value".to_string());
    }

    let effective_date = reformat_compact_date(obx.field(OBX_TIMESTAMP))
        .or_else(|| header_date.map(str::to_string));

    Ok(ObservationRecord {
        patient_id: patient_id.to_string(),
        kind: terminology::tag_for_code(code),
        value: ObservationValue::coerce(raw_value),
        unit: obx.component(OBX_UNITS, 0).trim().to_string(),
        effective_date,
    })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Reformat a compact `YYYYMMDD[...]` date-time as `YYYY-MM-DD`
///
/// Takes the first 8 digits of an 8-or-more-digit string; anything shorter
/// or non-numeric yields `None`.
fn reformat_compact_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.len() < 8 || !raw.chars().take(8).all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}-{}-{}", &raw[0..4], &raw[4..6], &raw[6..8]))
}
