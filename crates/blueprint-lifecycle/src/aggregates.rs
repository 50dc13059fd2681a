//! AggregateReconciler: recomputes usage counters from post-purge state.
//!
//! Counting rules live in `blueprint_storage::queries::aggregates`: comments
//! count only while their target artifact exists, bucketed by that
//! artifact's exposure; `unlisted` lands in the private bucket.

use std::collections::BTreeSet;

use rusqlite::Transaction;
use serde::Serialize;

use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::AccountId;
use blueprint_storage::queries::aggregates;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    /// Accounts whose aggregate row was written.
    pub accounts_updated: usize,
    /// Touched ids with no account row left; nothing was written for them.
    pub accounts_missing: usize,
}

pub struct AggregateReconciler;

impl AggregateReconciler {
    /// Recompute the counters of `accounts` inside the cascade transaction.
    pub fn reconcile(
        tx: &Transaction<'_>,
        accounts: &BTreeSet<AccountId>,
    ) -> BlueprintResult<ReconcileOutcome> {
        let mut outcome = ReconcileOutcome::default();
        for account_id in accounts {
            let counters = aggregates::compute_counters(tx, account_id)?;
            if aggregates::write_counters(tx, account_id, &counters)? {
                outcome.accounts_updated += 1;
            } else {
                outcome.accounts_missing += 1;
            }
        }
        Ok(outcome)
    }

    /// Recompute every account's row. Returns the number of rows written.
    pub fn reconcile_all(tx: &Transaction<'_>) -> BlueprintResult<usize> {
        aggregates::recompute_all(tx)
    }
}
