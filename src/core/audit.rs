//! Audit sink implementations.
//!
//! An admission pass reports one event per decision to an [`AuditSink`].

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::job::JobKind;
use crate::util::ids::JobId;

/// Decision taken for a job during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionAction {
    /// Job was admitted and its resources marked.
    Admit,
    /// Job conflicts with an admitted job or waits on a dependency.
    Block,
    /// A dependency sync was synthesized.
    Dependency,
    /// Job was beyond the batch bound and left for a later pass.
    Defer,
}

impl fmt::Display for AdmissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admit => "admit",
            Self::Block => "block",
            Self::Dependency => "dependency",
            Self::Defer => "defer",
        })
    }
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionEvent {
    /// Event identifier.
    pub event_id: String,
    /// Job the decision applies to.
    pub job_id: JobId,
    /// Kind of that job.
    pub kind: JobKind,
    /// Decision taken.
    pub action: AdmissionAction,
    /// Pass time at which the decision was taken.
    pub created_at: DateTime<Utc>,
}

/// Audit sink abstraction.
pub trait AuditSink {
    /// Record an audit event.
    fn record(&mut self, event: AdmissionEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&mut self, _event: AdmissionEvent) {}
}

/// In-memory audit sink keeping the most recent events.
#[derive(Debug, Clone)]
pub struct InMemoryAuditSink {
    events: VecDeque<AdmissionEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AdmissionEvent> {
        self.events.iter().cloned().collect()
    }

    /// Stored events with the given action.
    pub fn events_with(&self, action: AdmissionAction) -> Vec<AdmissionEvent> {
        self.events
            .iter()
            .filter(|event| event.action == action)
            .cloned()
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AdmissionEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Helper to build an audit event with a fresh id.
pub fn build_admission_event(
    job_id: JobId,
    kind: JobKind,
    action: AdmissionAction,
    created_at: DateTime<Utc>,
) -> AdmissionEvent {
    AdmissionEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        job_id,
        kind,
        action,
        created_at,
    }
}
