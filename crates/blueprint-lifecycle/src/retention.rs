//! RetentionPolicyEvaluator: which artifacts are purge-eligible at a given instant.
//!
//! An artifact is eligible iff it carries a soft-delete timestamp (any value,
//! including one in the future) or it has an expiration strictly before now.
//! No grace period applies to either branch.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::{Artifact, ArtifactId};
use blueprint_storage::queries::artifacts;

/// The purge predicate, in memory.
pub struct RetentionPolicy;

impl RetentionPolicy {
    pub fn is_purge_eligible(
        deleted_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        deleted_at.is_some() || expires_at.is_some_and(|expires| expires < now)
    }

    pub fn artifact_is_purge_eligible(artifact: &Artifact, now: DateTime<Utc>) -> bool {
        Self::is_purge_eligible(artifact.deleted_at, artifact.expires_at, now)
    }
}

/// Read-only selection of the current purge batch.
#[derive(Debug, Clone, Default)]
pub struct RetentionPolicyEvaluator {
    batch_limit: Option<usize>,
}

impl RetentionPolicyEvaluator {
    /// `batch_limit` caps one batch; `None` selects every eligible artifact.
    pub fn new(batch_limit: Option<usize>) -> Self {
        Self { batch_limit }
    }

    pub fn batch_limit(&self) -> Option<usize> {
        self.batch_limit
    }

    /// Ids of the artifacts eligible at `now`, ordered by id, at most `batch_limit`.
    pub fn eligible_artifact_ids(
        &self,
        conn: &Connection,
        now: DateTime<Utc>,
    ) -> BlueprintResult<Vec<ArtifactId>> {
        artifacts::eligible_ids(conn, now, self.batch_limit)
    }

    /// Number of artifacts eligible at `now`, ignoring the batch limit.
    pub fn count_eligible(&self, conn: &Connection, now: DateTime<Utc>) -> BlueprintResult<i64> {
        artifacts::count_eligible(conn, now)
    }
}
