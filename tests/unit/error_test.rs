//! Tests for error types

use prometheus_admission::core::AdmissionError;

#[test]
fn test_unrecognized_kind_error() {
    let err = AdmissionError::UnrecognizedKind("inventory_source".to_string());
    assert_eq!(format!("{}", err), "unrecognized job kind: inventory_source");
}

#[test]
fn test_malformed_job_error() {
    let err = AdmissionError::MalformedJob {
        kind: "job".to_string(),
        reason: "missing field `project_id`".to_string(),
    };
    assert_eq!(format!("{}", err), "malformed job record: missing field `project_id`");
}

#[test]
fn test_invalid_config_error() {
    let err = AdmissionError::InvalidConfig("max_candidates must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid config: max_candidates must be greater than 0"
    );
}

#[test]
fn test_errors_convert_to_app_result() {
    fn fails() -> prometheus_admission::core::AppResult<()> {
        Err(AdmissionError::UnrecognizedKind("x".into()).into())
    }
    assert_eq!(fails().unwrap_err().to_string(), "unrecognized job kind: x");
}
