//! One admission pass over a priority-ordered batch of candidates.
//!
//! For every candidate playbook job the pass first asks the staleness policy
//! whether its project or inventory sources need a sync. Each stale resource
//! gets a synthesized dependency update, created a fixed offset before the
//! dependent job, which is admitted ahead of it when the lock table allows.
//! A job that triggered or waits on a dependency is held for a later pass.
//! Every other candidate is admitted unless the lock table blocks it.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::AdmissionConfig;
use crate::core::audit::{
    build_admission_event, AdmissionAction, AuditSink, InMemoryAuditSink, NoopAuditSink,
};
use crate::core::graph::DependencyGraph;
use crate::core::job::{
    InventoryUpdateJob, JobRecord, JobStatus, LaunchType, PlaybookJob, ProjectUpdateJob,
};
use crate::core::staleness::{INVENTORY_DEPENDENCY_OFFSET, PROJECT_DEPENDENCY_OFFSET};
use crate::core::AdmissionError;
use crate::util::clock::{Clock, SystemClock};
use crate::util::ids::{InventoryId, InventorySourceId, JobId, ProjectId, UNSAVED_JOB_ID};

/// Verdicts of one pass, each list in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassOutcome {
    /// Jobs to dispatch, synthesized dependencies included.
    pub admitted: Vec<JobRecord>,
    /// Jobs that must wait for a later pass.
    pub blocked: Vec<JobRecord>,
    /// Dependency syncs synthesized in this pass; each also appears in
    /// `admitted` or `blocked`.
    pub dependencies: Vec<JobRecord>,
    /// Candidates beyond the batch bound, not evaluated.
    pub deferred: Vec<JobRecord>,
}

impl PassOutcome {
    /// Whether the candidate with `job_id` was admitted.
    pub fn is_admitted(&self, job_id: JobId) -> bool {
        self.admitted
            .iter()
            .any(|job| job.id() == job_id && job.id() != UNSAVED_JOB_ID)
    }
}

/// Sequential admission walk owning the pass's [`DependencyGraph`].
#[derive(Debug)]
pub struct AdmissionPass<C = SystemClock> {
    graph: DependencyGraph<C>,
    config: AdmissionConfig,
    waiting_projects: HashSet<ProjectId>,
    waiting_sources: HashSet<InventorySourceId>,
}

impl<C: Clock> AdmissionPass<C> {
    /// Wrap a seeded graph.
    ///
    /// # Errors
    ///
    /// [`AdmissionError::InvalidConfig`] when `config` fails validation.
    pub fn new(graph: DependencyGraph<C>, config: AdmissionConfig) -> Result<Self, AdmissionError> {
        config.validate()?;
        Ok(Self {
            graph,
            config,
            waiting_projects: HashSet::new(),
            waiting_sources: HashSet::new(),
        })
    }

    /// Graph state after the decisions taken so far.
    pub const fn graph(&self) -> &DependencyGraph<C> {
        &self.graph
    }

    /// Mutable graph, for seeding before [`AdmissionPass::run`].
    pub const fn graph_mut(&mut self) -> &mut DependencyGraph<C> {
        &mut self.graph
    }

    /// Release the graph once the pass is over.
    pub fn into_graph(self) -> DependencyGraph<C> {
        self.graph
    }

    /// Audit sink sized by the pass configuration.
    pub fn new_audit_sink(&self) -> InMemoryAuditSink {
        InMemoryAuditSink::new(self.config.audit_capacity)
    }

    /// Evaluate `candidates` in order without auditing.
    pub fn run(&mut self, candidates: Vec<JobRecord>) -> PassOutcome {
        self.run_with_audit(candidates, &mut NoopAuditSink)
    }

    /// Evaluate `candidates` in order, reporting each decision to `sink`.
    pub fn run_with_audit(
        &mut self,
        mut candidates: Vec<JobRecord>,
        sink: &mut dyn AuditSink,
    ) -> PassOutcome {
        let mut outcome = PassOutcome::default();
        let deferred = if candidates.len() > self.config.max_candidates {
            candidates.split_off(self.config.max_candidates)
        } else {
            Vec::new()
        };

        for job in candidates {
            let spawned = match &job {
                JobRecord::Playbook(playbook) if self.config.spawn_dependencies => {
                    self.spawn_dependencies(playbook, &mut outcome, sink)
                }
                _ => false,
            };
            if spawned || self.waits_on_dependency(&job) || self.graph.is_blocked(&job) {
                self.block(job, &mut outcome, sink);
            } else {
                self.admit(job, &mut outcome, sink);
            }
        }

        for job in deferred {
            self.audit(&job, AdmissionAction::Defer, sink);
            outcome.deferred.push(job);
        }

        info!(
            admitted = outcome.admitted.len(),
            blocked = outcome.blocked.len(),
            dependencies = outcome.dependencies.len(),
            deferred = outcome.deferred.len(),
            "admission pass complete"
        );
        outcome
    }

    /// Synthesize dependency syncs for `job`; true when any was created.
    fn spawn_dependencies(
        &mut self,
        job: &PlaybookJob,
        outcome: &mut PassOutcome,
        sink: &mut dyn AuditSink,
    ) -> bool {
        let mut spawned = false;

        if job.project_update_on_launch && self.graph.should_update_project(job) {
            let update = self.project_dependency(job);
            self.graph.record_latest_project_update(update.clone());
            self.place_dependency(JobRecord::ProjectUpdate(update), outcome, sink);
            spawned = true;
        }

        if let Some(inventory_id) = job.inventory_id {
            let stale: Vec<InventorySourceId> = self
                .graph
                .lookup_inventory_sources(inventory_id)
                .iter()
                .copied()
                .filter(|&source_id| self.graph.should_update_inventory_source(job, source_id))
                .collect();
            for source_id in stale {
                let update = self.inventory_dependency(job, inventory_id, source_id);
                self.graph.record_latest_inventory_update(update.clone());
                self.place_dependency(JobRecord::InventoryUpdate(update), outcome, sink);
                spawned = true;
            }
        }

        spawned
    }

    fn project_dependency(&self, job: &PlaybookJob) -> ProjectUpdateJob {
        let cache_timeout_secs = self
            .graph
            .staleness()
            .latest_project_update(job.project_id)
            .map_or(0, |latest| latest.cache_timeout_secs);
        ProjectUpdateJob {
            id: UNSAVED_JOB_ID,
            project_id: job.project_id,
            status: JobStatus::Pending,
            launch_type: LaunchType::Dependency,
            created: job
                .created
                .checked_sub_signed(PROJECT_DEPENDENCY_OFFSET)
                .unwrap_or(job.created),
            finished: None,
            cache_timeout_secs,
        }
    }

    fn inventory_dependency(
        &self,
        job: &PlaybookJob,
        inventory_id: InventoryId,
        inventory_source_id: InventorySourceId,
    ) -> InventoryUpdateJob {
        let cache_timeout_secs = self
            .graph
            .staleness()
            .latest_inventory_update(inventory_source_id)
            .map_or(0, |latest| latest.cache_timeout_secs);
        InventoryUpdateJob {
            id: UNSAVED_JOB_ID,
            inventory_id,
            inventory_source_id,
            status: JobStatus::Pending,
            launch_type: LaunchType::Dependency,
            created: job
                .created
                .checked_sub_signed(INVENTORY_DEPENDENCY_OFFSET)
                .unwrap_or(job.created),
            finished: None,
            cache_timeout_secs,
        }
    }

    fn place_dependency(
        &mut self,
        dependency: JobRecord,
        outcome: &mut PassOutcome,
        sink: &mut dyn AuditSink,
    ) {
        info!(kind = %dependency.kind(), "spawning dependency update");
        self.audit(&dependency, AdmissionAction::Dependency, sink);
        outcome.dependencies.push(dependency.clone());

        if self.graph.is_blocked(&dependency) {
            // Dependents keep waiting until the sync itself gets to run.
            match &dependency {
                JobRecord::ProjectUpdate(update) => {
                    self.waiting_projects.insert(update.project_id);
                }
                JobRecord::InventoryUpdate(update) => {
                    self.waiting_sources.insert(update.inventory_source_id);
                }
                _ => {}
            }
            self.block(dependency, outcome, sink);
        } else {
            self.admit(dependency, outcome, sink);
        }
    }

    /// Whether `job` depends on a sync synthesized earlier but not admitted.
    fn waits_on_dependency(&self, job: &JobRecord) -> bool {
        let JobRecord::Playbook(playbook) = job else {
            return false;
        };
        if self.waiting_projects.contains(&playbook.project_id) {
            return true;
        }
        playbook.inventory_id.is_some_and(|inventory_id| {
            self.graph
                .lookup_inventory_sources(inventory_id)
                .iter()
                .any(|source_id| self.waiting_sources.contains(source_id))
        })
    }

    fn admit(&mut self, job: JobRecord, outcome: &mut PassOutcome, sink: &mut dyn AuditSink) {
        debug!(job_id = job.id(), kind = %job.kind(), "admitted");
        self.graph.admit(&job);
        self.audit(&job, AdmissionAction::Admit, sink);
        outcome.admitted.push(job);
    }

    fn block(&self, job: JobRecord, outcome: &mut PassOutcome, sink: &mut dyn AuditSink) {
        debug!(job_id = job.id(), kind = %job.kind(), "blocked");
        self.audit(&job, AdmissionAction::Block, sink);
        outcome.blocked.push(job);
    }

    fn audit(&self, job: &JobRecord, action: AdmissionAction, sink: &mut dyn AuditSink) {
        sink.record(build_admission_event(
            job.id(),
            job.kind(),
            action,
            self.graph.now(),
        ));
    }
}
