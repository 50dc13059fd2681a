//! AnonymousOwnershipSweeper: flags private artifacts of the anonymous sentinel.
//!
//! Artifacts published without an account are owned by a sentinel account.
//! Their private ones are soft-deleted here and removed by the next artifact
//! purge. The sentinel id is handed in by the caller; without one the sweep
//! does nothing.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction};

use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::AccountId;
use blueprint_storage::queries::artifacts;

#[derive(Debug, Clone, Default)]
pub struct AnonymousOwnershipSweeper {
    sentinel: Option<AccountId>,
}

impl AnonymousOwnershipSweeper {
    pub fn new(sentinel: Option<AccountId>) -> Self {
        Self { sentinel }
    }

    pub fn sentinel(&self) -> Option<&str> {
        self.sentinel.as_deref()
    }

    /// Soft-delete the sentinel's live private artifacts at `now`.
    /// Returns the number flagged; existing soft-delete timestamps are kept.
    pub fn sweep(&self, tx: &Transaction<'_>, now: DateTime<Utc>) -> BlueprintResult<usize> {
        match &self.sentinel {
            Some(sentinel) => artifacts::soft_delete_private_owned_by(tx, sentinel, now),
            None => Ok(0),
        }
    }

    /// Artifacts the next sweep would flag.
    pub fn count_pending(&self, conn: &Connection) -> BlueprintResult<i64> {
        match &self.sentinel {
            Some(sentinel) => artifacts::count_private_live_owned_by(conn, sentinel),
            None => Ok(0),
        }
    }
}
