//! Record builders shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, Utc};
use prometheus_admission::core::{
    AdHocCommand, InventoryUpdateJob, JobRecord, JobStatus, LaunchType, PlaybookJob,
    ProjectUpdateJob, SystemJob, WorkflowJob,
};

/// Fixed reference instant for every scenario.
pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// `t0` shifted by `secs` (negative for earlier).
pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + TimeDelta::seconds(secs)
}

pub fn playbook(id: u64, template: u64, project: u64, inventory: Option<u64>) -> PlaybookJob {
    PlaybookJob {
        id,
        job_template_id: template,
        project_id: project,
        inventory_id: inventory,
        allow_simultaneous: false,
        created: t0(),
        project_update_on_launch: false,
    }
}

pub fn job(id: u64, template: u64, project: u64, inventory: u64) -> JobRecord {
    playbook(id, template, project, Some(inventory)).into()
}

pub fn project_update(id: u64, project: u64) -> JobRecord {
    finished_project_update(project, JobStatus::Pending, LaunchType::Manual, t0(), None, 0)
        .with_id(id)
        .into()
}

pub fn inventory_update(id: u64, inventory: u64, source: u64) -> JobRecord {
    finished_inventory_update(inventory, source, JobStatus::Pending, LaunchType::Manual, t0(), None, 0)
        .with_id(id)
        .into()
}

pub fn finished_project_update(
    project: u64,
    status: JobStatus,
    launch_type: LaunchType,
    created: DateTime<Utc>,
    finished: Option<DateTime<Utc>>,
    cache_timeout_secs: u64,
) -> ProjectUpdateJob {
    ProjectUpdateJob {
        id: 900,
        project_id: project,
        status,
        launch_type,
        created,
        finished,
        cache_timeout_secs,
    }
}

pub fn finished_inventory_update(
    inventory: u64,
    source: u64,
    status: JobStatus,
    launch_type: LaunchType,
    created: DateTime<Utc>,
    finished: Option<DateTime<Utc>>,
    cache_timeout_secs: u64,
) -> InventoryUpdateJob {
    InventoryUpdateJob {
        id: 901,
        inventory_id: inventory,
        inventory_source_id: source,
        status,
        launch_type,
        created,
        finished,
        cache_timeout_secs,
    }
}

pub fn system_job(id: u64) -> JobRecord {
    SystemJob { id }.into()
}

pub fn ad_hoc(id: u64, inventory: u64) -> JobRecord {
    AdHocCommand {
        id,
        inventory_id: inventory,
    }
    .into()
}

pub fn workflow(id: u64, template: u64) -> JobRecord {
    WorkflowJob {
        id,
        workflow_job_template_id: template,
    }
    .into()
}

pub trait WithId {
    fn with_id(self, id: u64) -> Self;
}

impl WithId for ProjectUpdateJob {
    fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

impl WithId for InventoryUpdateJob {
    fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}
