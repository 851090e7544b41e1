//! Per-pass resource exclusivity bookkeeping.
//!
//! One [`ResourceMap`] per resource class records which ids jobs admitted
//! earlier in the pass occupy. A key that was never marked is available.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::core::job::{
    AdHocCommand, InventoryUpdateJob, JobRecord, PlaybookJob, ProjectUpdateJob, WorkflowJob,
};
use crate::util::ids::{
    InventoryId, InventorySourceId, JobTemplateId, ProjectId, WorkflowJobTemplateId,
};

/// Availability flags for one resource class.
#[derive(Debug, Clone)]
pub struct ResourceMap<K> {
    slots: HashMap<K, bool>,
}

impl<K> Default for ResourceMap<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + Ord> ResourceMap<K> {
    /// Availability of `key`; a key never marked is available.
    pub fn is_available(&self, key: K) -> bool {
        self.slots.get(&key).copied().unwrap_or(true)
    }

    /// Availability of an optional reference; no reference never conflicts.
    pub fn is_available_for(&self, key: Option<K>) -> bool {
        key.is_none_or(|key| self.is_available(key))
    }

    /// Mark `key` occupied for the rest of the pass.
    pub fn mark_blocked(&mut self, key: K) {
        self.slots.insert(key, false);
    }

    /// Ids currently occupied, sorted.
    pub fn blocked(&self) -> Vec<K> {
        let mut ids: Vec<K> = self
            .slots
            .iter()
            .filter(|(_, available)| !**available)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

/// Occupied ids per resource class, for logging and assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSnapshot {
    /// Projects with an admitted update.
    pub project_updates: Vec<ProjectId>,
    /// Inventories with an admitted update or ad-hoc command.
    pub inventory_updates: Vec<InventoryId>,
    /// Inventory sources with an admitted update.
    pub inventory_source_updates: Vec<InventorySourceId>,
    /// Non-reentrant templates with an admitted job.
    pub job_template_jobs: Vec<JobTemplateId>,
    /// Projects reserved by admitted playbook jobs.
    pub job_project_ids: Vec<ProjectId>,
    /// Inventories reserved by admitted playbook jobs.
    pub job_inventory_ids: Vec<InventoryId>,
    /// Workflow templates with an admitted workflow job.
    pub workflow_job_template_jobs: Vec<WorkflowJobTemplateId>,
    /// Whether a system job may still be admitted.
    pub system_job_available: bool,
}

/// Exclusivity state of one admission pass.
///
/// Update markers (`project_updates`, `inventory_updates`) stop jobs from
/// running against a resource being synced; reservation markers
/// (`job_project_ids`, `job_inventory_ids`) stop syncs from starting under a
/// running playbook job.
#[derive(Debug, Clone)]
pub struct ResourceLockTable {
    project_updates: ResourceMap<ProjectId>,
    inventory_updates: ResourceMap<InventoryId>,
    inventory_source_updates: ResourceMap<InventorySourceId>,
    job_template_jobs: ResourceMap<JobTemplateId>,
    job_project_ids: ResourceMap<ProjectId>,
    job_inventory_ids: ResourceMap<InventoryId>,
    workflow_job_template_jobs: ResourceMap<WorkflowJobTemplateId>,
    system_job_available: bool,
}

impl Default for ResourceLockTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLockTable {
    /// Empty table: every resource available.
    pub fn new() -> Self {
        Self {
            project_updates: ResourceMap::default(),
            inventory_updates: ResourceMap::default(),
            inventory_source_updates: ResourceMap::default(),
            job_template_jobs: ResourceMap::default(),
            job_project_ids: ResourceMap::default(),
            job_inventory_ids: ResourceMap::default(),
            workflow_job_template_jobs: ResourceMap::default(),
            system_job_available: true,
        }
    }

    /// Claim the project for an update.
    pub fn mark_project_update_running(&mut self, job: &ProjectUpdateJob) {
        self.project_updates.mark_blocked(job.project_id);
    }

    /// Claim the inventory and one of its sources for an update.
    pub fn mark_inventory_update_running(
        &mut self,
        inventory_id: InventoryId,
        inventory_source_id: InventorySourceId,
    ) {
        self.inventory_updates.mark_blocked(inventory_id);
        self.inventory_source_updates.mark_blocked(inventory_source_id);
    }

    /// Reserve the job's project, inventory and template.
    pub fn mark_playbook_job_running(&mut self, job: &PlaybookJob) {
        if let Some(inventory_id) = job.inventory_id {
            self.job_inventory_ids.mark_blocked(inventory_id);
        }
        self.job_project_ids.mark_blocked(job.project_id);
        self.job_template_jobs.mark_blocked(job.job_template_id);
    }

    /// Claim the workflow template.
    pub fn mark_workflow_job_running(&mut self, job: &WorkflowJob) {
        self.workflow_job_template_jobs
            .mark_blocked(job.workflow_job_template_id);
    }

    /// Claim the global system-job slot. Nothing releases it within a pass.
    pub const fn mark_system_job_running(&mut self) {
        self.system_job_available = false;
    }

    /// Ad-hoc commands occupy the inventory's update slot, which keeps
    /// inventory syncs and dependent playbook jobs off it.
    pub fn mark_ad_hoc_command_running(&mut self, job: &AdHocCommand) {
        self.inventory_updates.mark_blocked(job.inventory_id);
    }

    /// Project update: no playbook job reserves the project and no other
    /// update claims it.
    pub fn can_project_update_run(&self, job: &ProjectUpdateJob) -> bool {
        self.job_project_ids.is_available(job.project_id)
            && self.project_updates.is_available(job.project_id)
    }

    /// Inventory update: no playbook job reserves the inventory and the
    /// source is not already being synced.
    pub fn can_inventory_update_run(&self, job: &InventoryUpdateJob) -> bool {
        self.job_inventory_ids.is_available(job.inventory_id)
            && self
                .inventory_source_updates
                .is_available(job.inventory_source_id)
    }

    /// Playbook job: neither its project nor its inventory is being updated,
    /// and for non-simultaneous templates no sibling job is running.
    pub fn can_playbook_job_run(&self, job: &PlaybookJob) -> bool {
        if !self.project_updates.is_available(job.project_id)
            || !self.inventory_updates.is_available_for(job.inventory_id)
        {
            return false;
        }
        job.allow_simultaneous || self.job_template_jobs.is_available(job.job_template_id)
    }

    /// Workflow job: no sibling from the same template is running.
    pub fn can_workflow_job_run(&self, job: &WorkflowJob) -> bool {
        self.workflow_job_template_jobs
            .is_available(job.workflow_job_template_id)
    }

    /// System job: the global slot is still free.
    pub const fn can_system_job_run(&self) -> bool {
        self.system_job_available
    }

    /// Ad-hoc command: its inventory is not being updated.
    pub fn can_ad_hoc_command_run(&self, job: &AdHocCommand) -> bool {
        self.inventory_updates.is_available(job.inventory_id)
    }

    /// Whether `job` may run alongside everything admitted so far.
    pub fn can_run(&self, job: &JobRecord) -> bool {
        match job {
            JobRecord::ProjectUpdate(job) => self.can_project_update_run(job),
            JobRecord::InventoryUpdate(job) => self.can_inventory_update_run(job),
            JobRecord::Playbook(job) => self.can_playbook_job_run(job),
            JobRecord::SystemJob(_) => self.can_system_job_run(),
            JobRecord::AdHocCommand(job) => self.can_ad_hoc_command_run(job),
            JobRecord::WorkflowJob(job) => self.can_workflow_job_run(job),
        }
    }

    /// Negation of [`ResourceLockTable::can_run`].
    pub fn is_blocked(&self, job: &JobRecord) -> bool {
        !self.can_run(job)
    }

    /// Record that `job` was dispatched.
    pub fn admit(&mut self, job: &JobRecord) {
        match job {
            JobRecord::ProjectUpdate(job) => self.mark_project_update_running(job),
            JobRecord::InventoryUpdate(job) => {
                self.mark_inventory_update_running(job.inventory_id, job.inventory_source_id);
            }
            JobRecord::Playbook(job) => self.mark_playbook_job_running(job),
            JobRecord::SystemJob(_) => self.mark_system_job_running(),
            JobRecord::AdHocCommand(job) => self.mark_ad_hoc_command_running(job),
            JobRecord::WorkflowJob(job) => self.mark_workflow_job_running(job),
        }
    }

    /// Admit each job in order.
    pub fn admit_batch<'a, I>(&mut self, jobs: I)
    where
        I: IntoIterator<Item = &'a JobRecord>,
    {
        for job in jobs {
            self.admit(job);
        }
    }

    /// Occupied ids per class.
    pub fn snapshot(&self) -> LockSnapshot {
        LockSnapshot {
            project_updates: self.project_updates.blocked(),
            inventory_updates: self.inventory_updates.blocked(),
            inventory_source_updates: self.inventory_source_updates.blocked(),
            job_template_jobs: self.job_template_jobs.blocked(),
            job_project_ids: self.job_project_ids.blocked(),
            job_inventory_ids: self.job_inventory_ids.blocked(),
            workflow_job_template_jobs: self.workflow_job_template_jobs.blocked(),
            system_job_available: self.system_job_available,
        }
    }
}
