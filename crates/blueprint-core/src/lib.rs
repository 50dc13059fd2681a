//! # blueprint-core
//!
//! Foundation crate for the blueprint lifecycle subsystem.
//! Defines the record models, errors, config, tracing setup and constants
//! shared by the storage and lifecycle crates.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::LifecycleConfig;
pub use errors::{BlueprintError, BlueprintResult};
pub use models::{AccountId, ArtifactId, BlobRef, Exposure, UsageCounters};
