//! Job records considered by an admission pass.
//!
//! [`JobRecord`] is a closed set of six kinds. Each kind wraps a struct that
//! carries exactly the fields its lock and staleness policies read, so a
//! well-typed record can never be "missing" a field at decision time. Records
//! arriving as JSON go through [`JobRecord::from_value`], which rejects unknown
//! kinds and incomplete records before they reach the lock table.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::AdmissionError;
use crate::util::ids::{
    InventoryId, InventorySourceId, JobId, JobTemplateId, ProjectId, WorkflowJobTemplateId,
};

/// Lifecycle status of a job or sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, not yet considered.
    Pending,
    /// Admitted, waiting on dependencies.
    Waiting,
    /// Executing.
    Running,
    /// Finished successfully.
    Successful,
    /// Finished with a failure.
    Failed,
    /// Could not be run due to an internal error.
    Error,
    /// Stopped by a user.
    Canceled,
}

impl JobStatus {
    /// Whether a sync in this status leaves no usable source data behind.
    pub const fn is_unusable(self) -> bool {
        matches!(self, Self::Failed | Self::Canceled)
    }
}

/// How a job was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchType {
    /// Launched by a user.
    Manual,
    /// Relaunch of an earlier job.
    Relaunch,
    /// Provisioning callback.
    Callback,
    /// Launched by a schedule.
    Scheduled,
    /// Synthesized by a staleness check ahead of a dependent job.
    Dependency,
    /// Spawned by a workflow node.
    Workflow,
    /// Triggered by a source sync.
    Sync,
    /// Triggered by an SCM change.
    Scm,
}

/// Source-control sync of a project checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUpdateJob {
    /// Job identifier.
    pub id: JobId,
    /// Project being synced.
    pub project_id: ProjectId,
    /// Current status.
    pub status: JobStatus,
    /// Trigger of the update.
    pub launch_type: LaunchType,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Completion time; `None` while the update is still in flight.
    #[serde(default)]
    pub finished: Option<DateTime<Utc>>,
    /// Seconds a completed sync stays fresh.
    pub cache_timeout_secs: u64,
}

/// Sync of one inventory source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUpdateJob {
    /// Job identifier.
    pub id: JobId,
    /// Inventory that owns the source.
    pub inventory_id: InventoryId,
    /// Source being synced.
    pub inventory_source_id: InventorySourceId,
    /// Current status.
    pub status: JobStatus,
    /// Trigger of the update.
    pub launch_type: LaunchType,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Completion time; `None` while the update is still in flight.
    #[serde(default)]
    pub finished: Option<DateTime<Utc>>,
    /// Seconds a completed sync stays fresh.
    pub cache_timeout_secs: u64,
}

/// Playbook run launched from a job template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookJob {
    /// Job identifier.
    pub id: JobId,
    /// Template the job was launched from.
    pub job_template_id: JobTemplateId,
    /// Project whose checkout the playbook runs from.
    pub project_id: ProjectId,
    /// Inventory targeted; `None` places no inventory constraint.
    #[serde(default)]
    pub inventory_id: Option<InventoryId>,
    /// Whether several jobs of the same template may run at once.
    pub allow_simultaneous: bool,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Whether the project must be refreshed before launch when stale.
    #[serde(default)]
    pub project_update_on_launch: bool,
}

/// Maintenance job; exclusive of every other system job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemJob {
    /// Job identifier.
    pub id: JobId,
}

/// Ad-hoc command run against an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdHocCommand {
    /// Job identifier.
    pub id: JobId,
    /// Inventory the command targets.
    pub inventory_id: InventoryId,
}

/// Workflow run launched from a workflow job template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowJob {
    /// Job identifier.
    pub id: JobId,
    /// Template the workflow was launched from.
    pub workflow_job_template_id: WorkflowJobTemplateId,
}

/// Discriminator of a [`JobRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// [`ProjectUpdateJob`].
    ProjectUpdate,
    /// [`InventoryUpdateJob`].
    InventoryUpdate,
    /// [`PlaybookJob`].
    Job,
    /// [`SystemJob`].
    SystemJob,
    /// [`AdHocCommand`].
    AdHocCommand,
    /// [`WorkflowJob`].
    WorkflowJob,
}

impl JobKind {
    /// Every kind, in tag order.
    pub const ALL: [Self; 6] = [
        Self::ProjectUpdate,
        Self::InventoryUpdate,
        Self::Job,
        Self::SystemJob,
        Self::AdHocCommand,
        Self::WorkflowJob,
    ];

    /// Wire tag of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectUpdate => "project_update",
            Self::InventoryUpdate => "inventory_update",
            Self::Job => "job",
            Self::SystemJob => "system_job",
            Self::AdHocCommand => "ad_hoc_command",
            Self::WorkflowJob => "workflow_job",
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate or running job, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobRecord {
    /// Project source-control sync.
    ProjectUpdate(ProjectUpdateJob),
    /// Inventory source sync.
    InventoryUpdate(InventoryUpdateJob),
    /// Playbook run.
    #[serde(rename = "job")]
    Playbook(PlaybookJob),
    /// System maintenance job.
    SystemJob(SystemJob),
    /// Ad-hoc command.
    AdHocCommand(AdHocCommand),
    /// Workflow run.
    WorkflowJob(WorkflowJob),
}

impl JobRecord {
    /// Kind of the record.
    pub const fn kind(&self) -> JobKind {
        match self {
            Self::ProjectUpdate(_) => JobKind::ProjectUpdate,
            Self::InventoryUpdate(_) => JobKind::InventoryUpdate,
            Self::Playbook(_) => JobKind::Job,
            Self::SystemJob(_) => JobKind::SystemJob,
            Self::AdHocCommand(_) => JobKind::AdHocCommand,
            Self::WorkflowJob(_) => JobKind::WorkflowJob,
        }
    }

    /// Identifier of the wrapped job.
    pub const fn id(&self) -> JobId {
        match self {
            Self::ProjectUpdate(job) => job.id,
            Self::InventoryUpdate(job) => job.id,
            Self::Playbook(job) => job.id,
            Self::SystemJob(job) => job.id,
            Self::AdHocCommand(job) => job.id,
            Self::WorkflowJob(job) => job.id,
        }
    }

    /// Decode a record from a JSON value carrying a `kind` tag.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::UnrecognizedKind`] when the tag is missing or unknown,
    /// [`AdmissionError::MalformedJob`] when a field the kind needs is absent.
    pub fn from_value(value: serde_json::Value) -> Result<Self, AdmissionError> {
        let tag = match value.get("kind") {
            Some(serde_json::Value::String(tag)) => tag.clone(),
            Some(other) => return Err(AdmissionError::UnrecognizedKind(other.to_string())),
            None => return Err(AdmissionError::UnrecognizedKind("<missing>".into())),
        };
        if JobKind::from_tag(&tag).is_none() {
            return Err(AdmissionError::UnrecognizedKind(tag));
        }
        serde_json::from_value(value).map_err(|e| AdmissionError::MalformedJob {
            kind: tag,
            reason: e.to_string(),
        })
    }

    /// Decode a record from a JSON string.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::MalformedJob`] for invalid JSON, otherwise as
    /// [`JobRecord::from_value`].
    pub fn from_json_str(input: &str) -> Result<Self, AdmissionError> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|e| AdmissionError::MalformedJob {
                kind: "<unparsed>".into(),
                reason: e.to_string(),
            })?;
        Self::from_value(value)
    }
}

impl From<ProjectUpdateJob> for JobRecord {
    fn from(job: ProjectUpdateJob) -> Self {
        Self::ProjectUpdate(job)
    }
}

impl From<InventoryUpdateJob> for JobRecord {
    fn from(job: InventoryUpdateJob) -> Self {
        Self::InventoryUpdate(job)
    }
}

impl From<PlaybookJob> for JobRecord {
    fn from(job: PlaybookJob) -> Self {
        Self::Playbook(job)
    }
}

impl From<SystemJob> for JobRecord {
    fn from(job: SystemJob) -> Self {
        Self::SystemJob(job)
    }
}

impl From<AdHocCommand> for JobRecord {
    fn from(job: AdHocCommand) -> Self {
        Self::AdHocCommand(job)
    }
}

impl From<WorkflowJob> for JobRecord {
    fn from(job: WorkflowJob) -> Self {
        Self::WorkflowJob(job)
    }
}
