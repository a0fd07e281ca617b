//! End-to-end ingestion pipeline tests
//!
//! These tests run the dispatcher against a real local object store
//! (tempdir-backed) and a mock FHIR store, covering every source format and
//! the skip/dry-run/archive paths.

use base64::{engine::general_purpose, Engine as _};
use concord::adapters::fhir::{FhirStore, HttpFhirStore};
use concord::adapters::storage::LocalObjectStore;
use concord::config::{FhirConfig, RetryConfig};
use concord::core::dispatch::{DispatchOptions, Dispatcher};
use concord::domain::ConcordError;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

const CSV_CONTENT: &str = "\
patient_id,first_name,last_name,birth_date,gender,observation_type,observation_value,observation_unit,observation_date
P001,John,Doe,1990-01-15,male,heart_rate,72,bpm,2024-03-01
P001,John,Doe,1990-01-15,male,heart_rate,81,bpm,2024-03-02
P002,Kim,Lee,1979-08-20,female,,,,
";

const HL7_CONTENT: &str = "\
MSH|^~\\&|LAB|FAC|CONCORD|HOSP|20240301120000||ORU^R01|42|P|2.5\r
PID|1||P001^^^FAC||Doe^John||19900115|M\r
OBX|1|NM|8867-4^Heart rate^LN||72|bpm^beats per minute|||||F\r
OBX|2|ST|X9||positive||||||F\r
MSH|^~\\&|LAB|FAC|CONCORD|HOSP|20240302090000||ORU^R01|43|P|2.5\r
OBX|1|NM|8867-4||99|bpm|||||F\r
";

/// Seed a landing bucket in a fresh tempdir
fn landing_with(objects: &[(&str, &str)]) -> (TempDir, Arc<LocalObjectStore>) {
    let dir = TempDir::new().unwrap();
    for (name, content) in objects {
        let path = dir.path().join("landing").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
    let store = Arc::new(LocalObjectStore::with_root(dir.path()));
    (dir, store)
}

fn fhir_store(base_url: &str) -> Arc<dyn FhirStore> {
    let config = FhirConfig {
        base_url: base_url.to_string(),
        auth_type: "none".to_string(),
        username: None,
        password: None,
        token: None,
        timeout_seconds: 5,
        retry: RetryConfig {
            max_retries: 1,
            initial_delay_ms: 1,
            max_delay_ms: 1,
            backoff_multiplier: 1.0,
        },
    };
    Arc::new(HttpFhirStore::new(config).unwrap())
}

/// Transaction-response body with `count` entries of the given status
fn response_body(count: usize, status: &str) -> String {
    let entries: Vec<_> = (0..count)
        .map(|_| json!({"response": {"status": status}}))
        .collect();
    json!({
        "resourceType": "Bundle",
        "type": "transaction-response",
        "entry": entries
    })
    .to_string()
}

fn event(name: &str) -> serde_json::Value {
    json!({"bucket": "landing", "name": name})
}

#[tokio::test]
async fn test_tabular_file_is_parsed_mapped_and_submitted() {
    let (_dir, storage) = landing_with(&[("csv/batch-01.csv", CSV_CONTENT)]);
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(response_body(4, "201 Created"))
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(storage, fhir_store(&server.url()), DispatchOptions::default());
    let report = dispatcher.handle(&event("csv/batch-01.csv")).await.unwrap();

    // 2 distinct patients, both heart-rate rows survive
    assert_eq!(report.patients, 2);
    assert_eq!(report.observations, 2);
    assert_eq!(report.entries, 4);
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.failed, 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_segmented_file_skips_message_without_patient() {
    let (_dir, storage) = landing_with(&[("hl7/feed.hl7", HL7_CONTENT)]);
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(response_body(3, "201 Created"))
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(storage, fhir_store(&server.url()), DispatchOptions::default());
    let report = dispatcher.handle(&event("hl7/feed.hl7")).await.unwrap();

    // The second message has no PID and contributes nothing
    assert_eq!(report.patients, 1);
    assert_eq!(report.observations, 2);
    assert_eq!(report.entries, 3);
}

#[tokio::test]
async fn test_passthrough_bundle_is_forwarded_unchanged() {
    let bundle = json!({
        "resourceType": "Bundle",
        "type": "transaction",
        "entry": [{
            "resource": {"resourceType": "Patient", "id": "pre-built"},
            "request": {"method": "POST", "url": "Patient"}
        }]
    });
    let (_dir, storage) = landing_with(&[("fhir/bundle.json", &bundle.to_string())]);
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(mockito::Matcher::PartialJson(json!({
            "resourceType": "Bundle",
            "type": "transaction"
        })))
        .with_status(200)
        .with_body(response_body(1, "200 OK"))
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(storage, fhir_store(&server.url()), DispatchOptions::default());
    let report = dispatcher.handle(&event("fhir/bundle.json")).await.unwrap();

    assert_eq!(report.entries, 1);
    assert_eq!(report.succeeded, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_enveloped_event_payload_is_decoded() {
    let (_dir, storage) = landing_with(&[("csv/batch-01.csv", CSV_CONTENT)]);
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(response_body(4, "201 Created"))
        .create_async()
        .await;

    let inner = json!({"bucket": "landing", "name": "csv/batch-01.csv"}).to_string();
    let payload = json!({"message": {"data": general_purpose::STANDARD.encode(inner)}});

    let dispatcher = Dispatcher::new(storage, fhir_store(&server.url()), DispatchOptions::default());
    let report = dispatcher.handle(&payload).await.unwrap();

    assert_eq!(report.file, "csv/batch-01.csv");
    assert_eq!(report.entries, 4);
}

#[tokio::test]
async fn test_ineligible_path_never_reaches_the_store() {
    let (_dir, storage) = landing_with(&[("processed/csv/batch-01.csv", CSV_CONTENT)]);
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/").expect(0).create_async().await;

    let dispatcher = Dispatcher::new(storage, fhir_store(&server.url()), DispatchOptions::default());
    let report = dispatcher
        .handle(&event("processed/csv/batch-01.csv"))
        .await
        .unwrap();

    assert!(report.message.contains("already processed"));
    assert_eq!(report.entries, 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_partial_failure_surfaces_as_counts() {
    let (_dir, storage) = landing_with(&[("csv/batch-01.csv", CSV_CONTENT)]);
    let mut server = mockito::Server::new_async().await;

    let body = json!({
        "resourceType": "Bundle",
        "type": "transaction-response",
        "entry": [
            {"response": {"status": "201 Created"}},
            {"response": {"status": "201 Created"}},
            {"response": {"status": "409 Conflict"}},
            {"response": {"status": "201 Created"}}
        ]
    });
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(storage, fhir_store(&server.url()), DispatchOptions::default());
    let report = dispatcher.handle(&event("csv/batch-01.csv")).await.unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn test_rejected_transaction_is_a_processing_failure() {
    let (_dir, storage) = landing_with(&[("csv/batch-01.csv", CSV_CONTENT)]);
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(422)
        .with_body("bundle failed validation")
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(storage, fhir_store(&server.url()), DispatchOptions::default());
    let result = dispatcher.handle(&event("csv/batch-01.csv")).await;

    let err = result.unwrap_err();
    assert!(matches!(err, ConcordError::FhirStore(_)));
    assert_eq!(err.http_status(), 500);
}

#[tokio::test]
async fn test_dry_run_submits_nothing() {
    let (_dir, storage) = landing_with(&[("csv/batch-01.csv", CSV_CONTENT)]);
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/").expect(0).create_async().await;

    let dispatcher = Dispatcher::new(
        storage,
        fhir_store(&server.url()),
        DispatchOptions {
            dry_run: true,
            archive_processed: false,
        },
    );
    let report = dispatcher.handle(&event("csv/batch-01.csv")).await.unwrap();

    assert_eq!(report.message, "Dry run: bundle not submitted");
    assert_eq!(report.entries, 4);
    assert_eq!(report.succeeded, 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_archive_moves_the_object_after_submission() {
    let (dir, storage) = landing_with(&[("csv/batch-01.csv", CSV_CONTENT)]);
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_body(response_body(4, "201 Created"))
        .create_async()
        .await;

    let dispatcher = Dispatcher::new(
        storage,
        fhir_store(&server.url()),
        DispatchOptions {
            dry_run: false,
            archive_processed: true,
        },
    );
    dispatcher.handle(&event("csv/batch-01.csv")).await.unwrap();

    assert!(!dir.path().join("landing/csv/batch-01.csv").exists());
    assert!(dir
        .path()
        .join("landing/processed/csv/batch-01.csv")
        .exists());
}

#[tokio::test]
async fn test_missing_object_fails_without_submission() {
    let (_dir, storage) = landing_with(&[]);
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("POST", "/").expect(0).create_async().await;

    let dispatcher = Dispatcher::new(storage, fhir_store(&server.url()), DispatchOptions::default());
    let result = dispatcher.handle(&event("csv/missing.csv")).await;

    assert!(matches!(result, Err(ConcordError::Storage(_))));
    mock.assert_async().await;
}
