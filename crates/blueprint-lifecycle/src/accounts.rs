//! DormantAccountReaper: removes accounts never confirmed within the grace period.
//!
//! Aggregate rows go first so no counter row outlives its account. Confirmed
//! accounts are never selected.

use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, Transaction};
use serde::Serialize;

use blueprint_core::constants::SECONDS_PER_DAY;
use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::AccountId;
use blueprint_storage::queries::accounts;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DormantPurgeOutcome {
    pub account_ids: Vec<AccountId>,
    pub accounts_deleted: usize,
    pub aggregates_deleted: usize,
}

#[derive(Debug, Clone)]
pub struct DormantAccountReaper {
    grace: Duration,
}

impl DormantAccountReaper {
    pub fn new(grace_days: u32) -> Self {
        Self {
            grace: Duration::seconds(i64::from(grace_days) * SECONDS_PER_DAY),
        }
    }

    /// Unconfirmed accounts created strictly before this instant are dormant.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.grace
    }

    pub fn purge(&self, tx: &Transaction<'_>, now: DateTime<Utc>) -> BlueprintResult<DormantPurgeOutcome> {
        let cutoff = self.cutoff(now);
        let account_ids = accounts::dormant_ids(tx, cutoff)?;
        if account_ids.is_empty() {
            return Ok(DormantPurgeOutcome::default());
        }
        let aggregates_deleted = accounts::delete_dormant_aggregates(tx, cutoff)?;
        let accounts_deleted = accounts::delete_dormant(tx, cutoff)?;
        Ok(DormantPurgeOutcome {
            account_ids,
            accounts_deleted,
            aggregates_deleted,
        })
    }

    pub fn count_dormant(&self, conn: &Connection, now: DateTime<Utc>) -> BlueprintResult<i64> {
        accounts::count_dormant(conn, self.cutoff(now))
    }
}
