//! Tests for job record decoding

use prometheus_admission::core::{AdmissionError, JobKind, JobRecord, JobStatus, LaunchType};
use serde_json::json;

#[test]
fn test_decode_every_kind() {
    let records = [
        json!({"kind": "project_update", "id": 1, "project_id": 10, "status": "successful",
               "launch_type": "manual", "created": "2024-01-01T00:00:00Z",
               "finished": "2024-01-01T00:01:00Z", "cache_timeout_secs": 60}),
        json!({"kind": "inventory_update", "id": 2, "inventory_id": 20,
               "inventory_source_id": 200, "status": "running", "launch_type": "dependency",
               "created": "2024-01-01T00:00:00Z", "cache_timeout_secs": 0}),
        json!({"kind": "job", "id": 3, "job_template_id": 30, "project_id": 10,
               "inventory_id": 20, "allow_simultaneous": true,
               "created": "2024-01-01T00:00:00Z", "project_update_on_launch": true}),
        json!({"kind": "system_job", "id": 4}),
        json!({"kind": "ad_hoc_command", "id": 5, "inventory_id": 20}),
        json!({"kind": "workflow_job", "id": 6, "workflow_job_template_id": 60}),
    ];

    let kinds: Vec<JobKind> = records
        .into_iter()
        .map(|value| JobRecord::from_value(value).unwrap().kind())
        .collect();
    assert_eq!(kinds, JobKind::ALL.to_vec());
}

#[test]
fn test_in_flight_update_has_no_finish_time() {
    let record = JobRecord::from_json_str(
        r#"{"kind": "inventory_update", "id": 2, "inventory_id": 20,
            "inventory_source_id": 200, "status": "running", "launch_type": "scm",
            "created": "2024-01-01T00:00:00Z", "cache_timeout_secs": 0}"#,
    )
    .unwrap();
    let JobRecord::InventoryUpdate(update) = record else {
        panic!("expected inventory update");
    };
    assert_eq!(update.finished, None);
    assert_eq!(update.status, JobStatus::Running);
    assert_eq!(update.launch_type, LaunchType::Scm);
}

#[test]
fn test_unknown_kind_fails_fast() {
    let err = JobRecord::from_value(json!({"kind": "inventory_source", "id": 1})).unwrap_err();
    assert!(matches!(err, AdmissionError::UnrecognizedKind(ref kind) if kind == "inventory_source"));
}

#[test]
fn test_missing_kind_fails_fast() {
    let err = JobRecord::from_value(json!({"id": 1})).unwrap_err();
    assert!(matches!(err, AdmissionError::UnrecognizedKind(_)));

    let err = JobRecord::from_value(json!({"kind": 3, "id": 1})).unwrap_err();
    assert!(matches!(err, AdmissionError::UnrecognizedKind(_)));
}

#[test]
fn test_missing_field_is_malformed() {
    let err = JobRecord::from_value(json!({
        "kind": "job", "id": 3, "job_template_id": 30,
        "allow_simultaneous": false, "created": "2024-01-01T00:00:00Z"
    }))
    .unwrap_err();
    match err {
        AdmissionError::MalformedJob { kind, reason } => {
            assert_eq!(kind, "job");
            assert!(reason.contains("project_id"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_json_is_malformed() {
    let err = JobRecord::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, AdmissionError::MalformedJob { .. }));
}

#[test]
fn test_serialized_record_keeps_kind_tag() {
    let record = JobRecord::from_value(json!({"kind": "system_job", "id": 4})).unwrap();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["kind"], "system_job");
    assert_eq!(JobRecord::from_value(value).unwrap(), record);
}
