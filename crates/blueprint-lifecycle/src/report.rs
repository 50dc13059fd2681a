//! Run reports returned by the engine and printed by `blueprint-reaper`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use blueprint_core::models::{AccountId, ArtifactId};

use crate::content_store::BlobReapReport;

/// The independently schedulable reapers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaperJob {
    Sessions,
    Accounts,
    Anonymous,
    Artifacts,
}

impl ReaperJob {
    /// Order used by `run_all`: the sweep runs before the purge so anonymous
    /// private artifacts are removed in the same pass.
    pub const ALL: [ReaperJob; 4] = [
        ReaperJob::Sessions,
        ReaperJob::Accounts,
        ReaperJob::Anonymous,
        ReaperJob::Artifacts,
    ];

    /// Name recorded in the run ledger.
    pub fn as_str(self) -> &'static str {
        match self {
            ReaperJob::Sessions => "sessions",
            ReaperJob::Accounts => "accounts",
            ReaperJob::Anonymous => "anonymous",
            ReaperJob::Artifacts => "artifacts",
        }
    }
}

impl fmt::Display for ReaperJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReaperJob {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReaperJob::ALL
            .into_iter()
            .find(|job| job.as_str() == s)
            .ok_or_else(|| format!("unknown reaper: {s}"))
    }
}

/// Ledger name of the full aggregate rebuild.
pub const RECONCILE_LEDGER_NAME: &str = "reconcile";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtifactPurgeReport {
    pub run_id: String,
    pub artifact_ids: Vec<ArtifactId>,
    pub artifacts_deleted: usize,
    pub versions_deleted: usize,
    pub comments_deleted: usize,
    pub accounts_reconciled: usize,
    pub accounts_missing: usize,
    /// Blob references left alone because a surviving version shares the content id.
    pub blobs_shared: usize,
    pub blobs: BlobReapReport,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionPurgeReport {
    pub run_id: String,
    pub cutoff: DateTime<Utc>,
    pub sessions_deleted: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountPurgeReport {
    pub run_id: String,
    pub cutoff: DateTime<Utc>,
    pub account_ids: Vec<AccountId>,
    pub accounts_deleted: usize,
    pub aggregates_deleted: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnonymousSweepReport {
    pub run_id: String,
    pub sentinel: Option<AccountId>,
    /// True when no sentinel is configured; nothing was read or written.
    pub skipped: bool,
    pub artifacts_flagged: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub run_id: String,
    pub aggregates_written: usize,
    pub duration_ms: u64,
}

/// Read-only snapshot of what each reaper would act on at `now`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingReport {
    pub now: DateTime<Utc>,
    pub eligible_artifacts: i64,
    pub expired_sessions: i64,
    pub dormant_accounts: i64,
    pub anonymous_private_artifacts: i64,
}

/// Report of one reaper run, tagged with the reaper name when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reaper", rename_all = "snake_case")]
pub enum RunReport {
    Sessions(SessionPurgeReport),
    Accounts(AccountPurgeReport),
    Anonymous(AnonymousSweepReport),
    Artifacts(ArtifactPurgeReport),
}

impl RunReport {
    pub fn job(&self) -> ReaperJob {
        match self {
            RunReport::Sessions(_) => ReaperJob::Sessions,
            RunReport::Accounts(_) => ReaperJob::Accounts,
            RunReport::Anonymous(_) => ReaperJob::Anonymous,
            RunReport::Artifacts(_) => ReaperJob::Artifacts,
        }
    }

    pub fn run_id(&self) -> &str {
        match self {
            RunReport::Sessions(r) => &r.run_id,
            RunReport::Accounts(r) => &r.run_id,
            RunReport::Anonymous(r) => &r.run_id,
            RunReport::Artifacts(r) => &r.run_id,
        }
    }

    /// Primary rows affected: sessions, accounts, flagged or purged artifacts.
    pub fn affected(&self) -> usize {
        match self {
            RunReport::Sessions(r) => r.sessions_deleted,
            RunReport::Accounts(r) => r.accounts_deleted,
            RunReport::Anonymous(r) => r.artifacts_flagged,
            RunReport::Artifacts(r) => r.artifacts_deleted,
        }
    }
}
