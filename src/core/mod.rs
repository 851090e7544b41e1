//! Admission decisions: job records, resource locks, staleness and the pass
//! that ties them together.

pub mod audit;
pub mod error;
pub mod graph;
pub mod job;
pub mod lock_table;
pub mod pass;
pub mod staleness;

pub use audit::{
    build_admission_event, AdmissionAction, AdmissionEvent, AuditSink, InMemoryAuditSink,
    NoopAuditSink,
};
pub use error::{AdmissionError, AppResult};
pub use graph::DependencyGraph;
pub use job::{
    AdHocCommand, InventoryUpdateJob, JobKind, JobRecord, JobStatus, LaunchType, PlaybookJob,
    ProjectUpdateJob, SystemJob, WorkflowJob,
};
pub use lock_table::{LockSnapshot, ResourceLockTable, ResourceMap};
pub use pass::{AdmissionPass, PassOutcome};
pub use staleness::{StalenessPolicy, INVENTORY_DEPENDENCY_OFFSET, PROJECT_DEPENDENCY_OFFSET};
