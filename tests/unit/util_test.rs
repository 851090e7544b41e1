//! Tests for utility functions

use chrono::{DateTime, Utc};
use prometheus_admission::util::{Clock, FixedClock, SystemClock, UNSAVED_JOB_ID};

#[test]
fn test_fixed_clock_is_frozen() {
    let at = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
    let clock = FixedClock::new(at);
    assert_eq!(clock.now(), at);
    assert_eq!(clock.now(), clock.now());
    assert_eq!((&clock).now(), at);
}

#[test]
fn test_system_clock_moves_forward() {
    let clock = SystemClock;
    let before = clock.now();
    assert!(clock.now() >= before);
}

#[test]
fn test_unsaved_job_id() {
    assert_eq!(UNSAVED_JOB_ID, 0);
}
