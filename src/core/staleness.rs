//! Decides whether a project or inventory source must be synced before a
//! dependent playbook job may run.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::core::job::{InventoryUpdateJob, JobStatus, LaunchType, PlaybookJob, ProjectUpdateJob};
use crate::util::clock::{Clock, SystemClock};
use crate::util::ids::{InventoryId, InventorySourceId, ProjectId};

/// Offset before the dependent job at which a synthesized project update is
/// created.
pub const PROJECT_DEPENDENCY_OFFSET: TimeDelta = TimeDelta::seconds(1);

/// Offset before the dependent job at which a synthesized inventory update is
/// created. Differs from the project offset so both can precede the same job.
pub const INVENTORY_DEPENDENCY_OFFSET: TimeDelta = TimeDelta::seconds(2);

/// Fields of a latest-known sync that the staleness rule reads.
trait LatestSync {
    fn status(&self) -> JobStatus;
    fn launch_type(&self) -> LaunchType;
    fn created(&self) -> DateTime<Utc>;
    fn finished(&self) -> Option<DateTime<Utc>>;
    fn cache_timeout_secs(&self) -> u64;
}

impl LatestSync for ProjectUpdateJob {
    fn status(&self) -> JobStatus {
        self.status
    }
    fn launch_type(&self) -> LaunchType {
        self.launch_type
    }
    fn created(&self) -> DateTime<Utc> {
        self.created
    }
    fn finished(&self) -> Option<DateTime<Utc>> {
        self.finished
    }
    fn cache_timeout_secs(&self) -> u64 {
        self.cache_timeout_secs
    }
}

impl LatestSync for InventoryUpdateJob {
    fn status(&self) -> JobStatus {
        self.status
    }
    fn launch_type(&self) -> LaunchType {
        self.launch_type
    }
    fn created(&self) -> DateTime<Utc> {
        self.created
    }
    fn finished(&self) -> Option<DateTime<Utc>> {
        self.finished
    }
    fn cache_timeout_secs(&self) -> u64 {
        self.cache_timeout_secs
    }
}

/// Instant at which a sync finished at `finished` stops being fresh.
/// `None` when the window overflows the calendar, i.e. never.
fn fresh_until(finished: DateTime<Utc>, cache_timeout_secs: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(cache_timeout_secs).ok()?;
    finished.checked_add_signed(TimeDelta::try_seconds(secs)?)
}

fn needs_refresh<S: LatestSync>(
    latest: Option<&S>,
    dependent_created: DateTime<Utc>,
    offset: TimeDelta,
    now: DateTime<Utc>,
) -> bool {
    let Some(latest) = latest else {
        return true;
    };
    if latest.status().is_unusable() {
        return true;
    }

    // With a zero cache window every finished sync is already stale; the
    // dependency spawned for this very job is recognized by its timestamp.
    if latest.cache_timeout_secs() == 0
        && latest.launch_type() == LaunchType::Dependency
        && dependent_created.checked_sub_signed(offset) == Some(latest.created())
    {
        return false;
    }

    match latest.finished() {
        Some(finished) => fresh_until(finished, latest.cache_timeout_secs())
            .is_some_and(|expiry| expiry < now),
        // Still in flight; it will leave current data behind.
        None => false,
    }
}

/// Latest known syncs per project and inventory source, plus the inventory
/// to sources index.
#[derive(Debug, Clone)]
pub struct StalenessPolicy<C = SystemClock> {
    clock: C,
    latest_project_updates: HashMap<ProjectId, ProjectUpdateJob>,
    latest_inventory_updates: HashMap<InventorySourceId, InventoryUpdateJob>,
    inventory_sources: HashMap<InventoryId, Vec<InventorySourceId>>,
}

impl Default for StalenessPolicy<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> StalenessPolicy<C> {
    /// Empty policy reading time from `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            latest_project_updates: HashMap::new(),
            latest_inventory_updates: HashMap::new(),
            inventory_sources: HashMap::new(),
        }
    }

    /// Current time according to the policy's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Replace the latest known update for the record's project.
    pub fn record_latest_project_update(&mut self, update: ProjectUpdateJob) {
        self.latest_project_updates.insert(update.project_id, update);
    }

    /// Replace the latest known update for the record's inventory source.
    pub fn record_latest_inventory_update(&mut self, update: InventoryUpdateJob) {
        self.latest_inventory_updates
            .insert(update.inventory_source_id, update);
    }

    /// Replace the list of sources owned by `inventory_id`.
    pub fn record_inventory_sources(
        &mut self,
        inventory_id: InventoryId,
        source_ids: Vec<InventorySourceId>,
    ) {
        self.inventory_sources.insert(inventory_id, source_ids);
    }

    /// Sources owned by `inventory_id`; empty when unknown.
    pub fn lookup_inventory_sources(&self, inventory_id: InventoryId) -> &[InventorySourceId] {
        self.inventory_sources
            .get(&inventory_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Latest known update of a project.
    pub fn latest_project_update(&self, project_id: ProjectId) -> Option<&ProjectUpdateJob> {
        self.latest_project_updates.get(&project_id)
    }

    /// Latest known update of an inventory source.
    pub fn latest_inventory_update(
        &self,
        inventory_source_id: InventorySourceId,
    ) -> Option<&InventoryUpdateJob> {
        self.latest_inventory_updates.get(&inventory_source_id)
    }

    /// Whether `job`'s project must be synced before it runs.
    pub fn should_update_project(&self, job: &PlaybookJob) -> bool {
        needs_refresh(
            self.latest_project_updates.get(&job.project_id),
            job.created,
            PROJECT_DEPENDENCY_OFFSET,
            self.clock.now(),
        )
    }

    /// Whether `inventory_source_id` must be synced before `job` runs.
    pub fn should_update_inventory_source(
        &self,
        job: &PlaybookJob,
        inventory_source_id: InventorySourceId,
    ) -> bool {
        needs_refresh(
            self.latest_inventory_updates.get(&inventory_source_id),
            job.created,
            INVENTORY_DEPENDENCY_OFFSET,
            self.clock.now(),
        )
    }
}
