//! Tests for audit sink

use chrono::{DateTime, Utc};
use prometheus_admission::core::{
    build_admission_event, AdmissionAction, AuditSink, InMemoryAuditSink, JobKind,
};

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_admission_event(1, JobKind::Job, AdmissionAction::Admit, now());
    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0], event);
    assert_eq!(events[0].job_id, 1);
    assert_eq!(events[0].action, AdmissionAction::Admit);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_admission_event(1, JobKind::SystemJob, AdmissionAction::Admit, now()));
    sink.record(build_admission_event(2, JobKind::SystemJob, AdmissionAction::Block, now()));
    sink.record(build_admission_event(3, JobKind::SystemJob, AdmissionAction::Block, now()));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].job_id, 2); // First one popped
    assert_eq!(events[1].job_id, 3);
    assert_eq!(sink.events_with(AdmissionAction::Admit).len(), 0);
}

#[test]
fn test_zero_capacity_sink_keeps_nothing() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_admission_event(1, JobKind::Job, AdmissionAction::Defer, now()));
    assert!(sink.events().is_empty());
}

#[test]
fn test_build_admission_event() {
    let first = build_admission_event(7, JobKind::ProjectUpdate, AdmissionAction::Dependency, now());
    let second = build_admission_event(7, JobKind::ProjectUpdate, AdmissionAction::Dependency, now());

    assert_eq!(first.kind, JobKind::ProjectUpdate);
    assert_eq!(first.created_at, now());
    assert_ne!(first.event_id, second.event_id);
    assert_eq!(first.action.to_string(), "dependency");
}
