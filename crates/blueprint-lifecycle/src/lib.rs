//! # blueprint-lifecycle
//!
//! Scheduled lifecycle jobs for published blueprints.
//!
//! Leaf to root:
//! - [`retention`]: which artifacts are purge-eligible right now
//! - [`cascade`]: transactional removal of an eligible batch and its dependents
//! - [`content_store`]: best-effort removal of the removed versions' blobs
//! - [`aggregates`]: recomputation of the touched accounts' usage counters
//! - [`sessions`], [`accounts`]: independent TTL sweeps
//! - [`anonymous`]: soft-deletes private artifacts of the sentinel account
//!
//! [`LifecycleEngine`] is the invocation surface: one idempotent call per job.

pub mod accounts;
pub mod aggregates;
pub mod anonymous;
pub mod cascade;
pub mod content_store;
pub mod engine;
pub mod report;
pub mod retention;
pub mod sessions;

pub use engine::LifecycleEngine;
pub use report::{ReaperJob, RunReport};
