//! CascadeDeleter: removes a purge batch and everything hanging off it.
//!
//! Deletion order inside the caller's transaction:
//! 1. comments targeting the batch (no FK, so matched by value)
//! 2. artifact_versions (FK to artifacts)
//! 3. artifacts
//!
//! Owners, comment authors and blob references are captured before step 1;
//! they feed the aggregate reconciler and the content store reaper. After
//! step 2, blob references whose content id (case-insensitively) is still used
//! by a surviving version are dropped, so the reaper never touches them.

use std::collections::BTreeSet;

use rusqlite::Transaction;
use serde::Serialize;

use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::{AccountId, ArtifactId, BlobRef, Exposure};
use blueprint_storage::queries::{artifacts, comments, versions};

/// What one cascade removed, captured before the deletes ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CascadeOutcome {
    pub artifact_ids: Vec<ArtifactId>,
    /// One entry per removed owned artifact.
    pub owners: Vec<(AccountId, Exposure)>,
    /// One entry per removed authored comment, with its target's exposure.
    pub comment_authors: Vec<(AccountId, Exposure)>,
    /// Blobs safe to reap once the transaction commits.
    pub blobs: Vec<BlobRef>,
    /// Captured references kept because another artifact shares the content id.
    pub blobs_shared: usize,
    pub comments_deleted: usize,
    pub versions_deleted: usize,
    pub artifacts_deleted: usize,
}

impl CascadeOutcome {
    /// Every distinct account whose counters the cascade may have changed.
    pub fn affected_accounts(&self) -> BTreeSet<AccountId> {
        self.owners
            .iter()
            .chain(self.comment_authors.iter())
            .map(|(account, _)| account.clone())
            .collect()
    }

    pub fn total_rows(&self) -> usize {
        self.comments_deleted + self.versions_deleted + self.artifacts_deleted
    }
}

/// Stateless; every call works inside the transaction it is handed.
pub struct CascadeDeleter;

impl CascadeDeleter {
    /// Delete `ids` and their dependents. Any statement error propagates and
    /// the caller's transaction rolls back on drop.
    pub fn delete_batch(tx: &Transaction<'_>, ids: &[ArtifactId]) -> BlueprintResult<CascadeOutcome> {
        if ids.is_empty() {
            return Ok(CascadeOutcome::default());
        }

        let owners = artifacts::owners_with_exposure(tx, ids)?;
        let comment_authors = comments::authors_with_exposure(tx, ids)?;
        let captured = versions::blob_refs_for(tx, ids)?;

        let comments_deleted = comments::delete_comments_for(tx, ids)?;
        let versions_deleted = versions::delete_versions_for(tx, ids)?;

        let content_ids: Vec<String> = captured.iter().map(|b| b.content_id.clone()).collect();
        let still_used = versions::referenced_content_ids(tx, &content_ids)?;
        let (shared, blobs): (Vec<BlobRef>, Vec<BlobRef>) = captured
            .into_iter()
            .partition(|b| still_used.contains(&b.content_id.to_ascii_lowercase()));
        if !shared.is_empty() {
            tracing::debug!(
                shared = shared.len(),
                content_ids = still_used.len(),
                "keeping blobs still referenced by surviving versions"
            );
        }

        let artifacts_deleted = artifacts::delete_artifacts(tx, ids)?;

        tracing::debug!(
            batch = ids.len(),
            comments_deleted,
            versions_deleted,
            artifacts_deleted,
            blobs = blobs.len(),
            blobs_shared = shared.len(),
            "cascade applied"
        );

        Ok(CascadeOutcome {
            artifact_ids: ids.to_vec(),
            owners,
            comment_authors,
            blobs,
            blobs_shared: shared.len(),
            comments_deleted,
            versions_deleted,
            artifacts_deleted,
        })
    }
}
