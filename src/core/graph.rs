//! Dependency graph: the lock table and staleness policy of one pass.

use chrono::{DateTime, Utc};

use crate::core::job::{
    AdHocCommand, InventoryUpdateJob, JobRecord, PlaybookJob, ProjectUpdateJob, WorkflowJob,
};
use crate::core::lock_table::{LockSnapshot, ResourceLockTable};
use crate::core::staleness::StalenessPolicy;
use crate::util::clock::{Clock, SystemClock};
use crate::util::ids::{InventoryId, InventorySourceId};

/// State shared by every decision of one scheduling pass.
///
/// Build a fresh graph per pass, seed it with the latest known syncs and the
/// jobs already running, then consult it candidate by candidate. A graph must
/// not be shared between concurrent passes.
#[derive(Debug, Clone)]
pub struct DependencyGraph<C = SystemClock> {
    locks: ResourceLockTable,
    staleness: StalenessPolicy<C>,
}

impl Default for DependencyGraph<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph<SystemClock> {
    /// Graph reading time from the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> DependencyGraph<C> {
    /// Graph reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            locks: ResourceLockTable::new(),
            staleness: StalenessPolicy::new(clock),
        }
    }

    /// Lock table of the pass.
    pub const fn locks(&self) -> &ResourceLockTable {
        &self.locks
    }

    /// Staleness policy of the pass.
    pub const fn staleness(&self) -> &StalenessPolicy<C> {
        &self.staleness
    }

    /// Current time according to the graph's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.staleness.now()
    }

    /// See [`StalenessPolicy::record_latest_project_update`].
    pub fn record_latest_project_update(&mut self, update: ProjectUpdateJob) {
        self.staleness.record_latest_project_update(update);
    }

    /// See [`StalenessPolicy::record_latest_inventory_update`].
    pub fn record_latest_inventory_update(&mut self, update: InventoryUpdateJob) {
        self.staleness.record_latest_inventory_update(update);
    }

    /// See [`StalenessPolicy::record_inventory_sources`].
    pub fn record_inventory_sources(
        &mut self,
        inventory_id: InventoryId,
        source_ids: Vec<InventorySourceId>,
    ) {
        self.staleness.record_inventory_sources(inventory_id, source_ids);
    }

    /// See [`StalenessPolicy::lookup_inventory_sources`].
    pub fn lookup_inventory_sources(&self, inventory_id: InventoryId) -> &[InventorySourceId] {
        self.staleness.lookup_inventory_sources(inventory_id)
    }

    /// See [`StalenessPolicy::should_update_project`].
    pub fn should_update_project(&self, job: &PlaybookJob) -> bool {
        self.staleness.should_update_project(job)
    }

    /// See [`StalenessPolicy::should_update_inventory_source`].
    pub fn should_update_inventory_source(
        &self,
        job: &PlaybookJob,
        inventory_source_id: InventorySourceId,
    ) -> bool {
        self.staleness
            .should_update_inventory_source(job, inventory_source_id)
    }

    /// See [`ResourceLockTable::mark_project_update_running`].
    pub fn mark_project_update_running(&mut self, job: &ProjectUpdateJob) {
        self.locks.mark_project_update_running(job);
    }

    /// See [`ResourceLockTable::mark_inventory_update_running`].
    pub fn mark_inventory_update_running(
        &mut self,
        inventory_id: InventoryId,
        inventory_source_id: InventorySourceId,
    ) {
        self.locks
            .mark_inventory_update_running(inventory_id, inventory_source_id);
    }

    /// See [`ResourceLockTable::mark_playbook_job_running`].
    pub fn mark_playbook_job_running(&mut self, job: &PlaybookJob) {
        self.locks.mark_playbook_job_running(job);
    }

    /// See [`ResourceLockTable::mark_workflow_job_running`].
    pub fn mark_workflow_job_running(&mut self, job: &WorkflowJob) {
        self.locks.mark_workflow_job_running(job);
    }

    /// See [`ResourceLockTable::mark_system_job_running`].
    pub fn mark_system_job_running(&mut self) {
        self.locks.mark_system_job_running();
    }

    /// See [`ResourceLockTable::mark_ad_hoc_command_running`].
    pub fn mark_ad_hoc_command_running(&mut self, job: &AdHocCommand) {
        self.locks.mark_ad_hoc_command_running(job);
    }

    /// See [`ResourceLockTable::can_run`].
    pub fn can_run(&self, job: &JobRecord) -> bool {
        self.locks.can_run(job)
    }

    /// See [`ResourceLockTable::is_blocked`].
    pub fn is_blocked(&self, job: &JobRecord) -> bool {
        self.locks.is_blocked(job)
    }

    /// See [`ResourceLockTable::admit`].
    pub fn admit(&mut self, job: &JobRecord) {
        tracing::trace!(job_id = job.id(), kind = %job.kind(), "marking job running");
        self.locks.admit(job);
    }

    /// See [`ResourceLockTable::admit_batch`].
    pub fn admit_batch<'a, I>(&mut self, jobs: I)
    where
        I: IntoIterator<Item = &'a JobRecord>,
    {
        for job in jobs {
            self.admit(job);
        }
    }

    /// Occupied ids per resource class.
    pub fn snapshot(&self) -> LockSnapshot {
        self.locks.snapshot()
    }
}
