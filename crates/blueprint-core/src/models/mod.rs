//! Record models touched by the lifecycle jobs.

pub mod account;
pub mod artifact;
pub mod exposure;
pub mod session;
pub mod usage;

pub use account::{Account, AccountId};
pub use artifact::{Artifact, ArtifactId, ArtifactVersion, BlobRef, Comment};
pub use exposure::Exposure;
pub use session::Session;
pub use usage::{UsageAggregate, UsageCounters};
