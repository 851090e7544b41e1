//! Identifier aliases shared across job records and lock maps.

/// Identifier of a job row as assigned by the upstream store.
pub type JobId = u64;
/// Identifier of a project (source-control checkout).
pub type ProjectId = u64;
/// Identifier of an inventory.
pub type InventoryId = u64;
/// Identifier of an inventory source owned by an inventory.
pub type InventorySourceId = u64;
/// Identifier of a job template.
pub type JobTemplateId = u64;
/// Identifier of a workflow job template.
pub type WorkflowJobTemplateId = u64;

/// Id carried by dependency updates synthesized during a pass, before the
/// dispatcher persists them and assigns a real id.
pub const UNSAVED_JOB_ID: JobId = 0;
