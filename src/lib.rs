//! # Prometheus Admission
//!
//! Admission-control core of the Prometheus job scheduler.
//!
//! Given a priority-ordered batch of pending jobs (playbook runs, project and
//! inventory syncs, ad-hoc commands, system jobs, workflow runs) this crate
//! decides which of them may be dispatched right now without two jobs sharing
//! a project checkout, an inventory or a non-reentrant template, and whether a
//! stale project or inventory source must be synced before a dependent job.
//!
//! ## Core Pieces
//!
//! - **Job records**: a closed [`core::JobRecord`] enum over six job kinds.
//! - **Resource lock table**: per resource class "occupied" maps, filled as
//!   jobs are admitted during a pass ([`core::ResourceLockTable`]).
//! - **Staleness policy**: cache-timeout checks against the latest known sync
//!   per project and inventory source ([`core::StalenessPolicy`]).
//! - **Dependency graph**: both of the above for one pass
//!   ([`core::DependencyGraph`]).
//! - **Admission pass**: the sequential walk that spawns dependency syncs and
//!   admits or blocks each candidate ([`core::AdmissionPass`]).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prometheus_admission::config::AdmissionConfig;
//! use prometheus_admission::core::{AdmissionPass, DependencyGraph};
//!
//! let mut graph = DependencyGraph::new();
//! for update in latest_project_updates {
//!     graph.record_latest_project_update(update);
//! }
//! // Jobs already running occupy their resources before candidates are seen.
//! graph.admit_batch(&running_jobs);
//!
//! let mut pass = AdmissionPass::new(graph, AdmissionConfig::from_env()?)?;
//! let outcome = pass.run(pending_jobs);
//! dispatch(outcome.admitted);
//! ```
//!
//! A graph is pass-scoped: build a fresh one for every scheduling pass and
//! never share it between passes running concurrently.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Job records, lock table, staleness policy and the admission pass.
pub mod core;
/// Configuration models for admission passes.
pub mod config;
/// Shared utilities.
pub mod util;
