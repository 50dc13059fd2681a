//! LifecycleEngine: one idempotent entry point per reaper.
//!
//! Each transactional run takes the writer, opens one `BEGIN IMMEDIATE`
//! transaction, re-evaluates eligibility inside it, applies its mutations and
//! appends its ledger row before commit. A failed run leaves no trace in any
//! table. Blob deletion happens after commit, outside the writer lock.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rusqlite::Transaction;
use serde_json::json;
use uuid::Uuid;

use blueprint_core::config::LifecycleConfig;
use blueprint_core::errors::BlueprintResult;
use blueprint_storage::queries::runs::{self, RunRecord};
use blueprint_storage::{with_immediate_transaction, DatabaseManager};

use crate::accounts::DormantAccountReaper;
use crate::aggregates::AggregateReconciler;
use crate::anonymous::AnonymousOwnershipSweeper;
use crate::cascade::CascadeDeleter;
use crate::content_store::{ContentStore, ContentStoreReaper};
use crate::report::{
    AccountPurgeReport, AnonymousSweepReport, ArtifactPurgeReport, PendingReport, ReaperJob,
    ReconcileReport, RunReport, SessionPurgeReport, RECONCILE_LEDGER_NAME,
};
use crate::retention::RetentionPolicyEvaluator;
use crate::sessions::SessionReaper;

pub struct LifecycleEngine {
    db: DatabaseManager,
    evaluator: RetentionPolicyEvaluator,
    content: ContentStoreReaper,
    sessions: SessionReaper,
    accounts: DormantAccountReaper,
    anonymous: AnonymousOwnershipSweeper,
}

impl LifecycleEngine {
    /// Open the configured database (migrating it) and build every reaper.
    pub fn open(config: &LifecycleConfig) -> BlueprintResult<Self> {
        let db = DatabaseManager::open(&config.storage)?;
        Ok(Self::new(db, config))
    }

    /// Build the reapers around an already opened database.
    pub fn new(db: DatabaseManager, config: &LifecycleConfig) -> Self {
        Self {
            db,
            evaluator: RetentionPolicyEvaluator::new(config.retention.batch_limit),
            content: ContentStoreReaper::new(ContentStore::from_config(&config.content_store)),
            sessions: SessionReaper::new(config.retention.session_ttl_hours),
            accounts: DormantAccountReaper::new(config.retention.account_grace_days),
            anonymous: AnonymousOwnershipSweeper::new(
                config.anonymous.sentinel_account_id.clone(),
            ),
        }
    }

    pub fn db(&self) -> &DatabaseManager {
        &self.db
    }

    pub fn content_store(&self) -> &ContentStore {
        self.content.store()
    }

    /// Purge every eligible artifact (up to the batch limit) with its
    /// versions, comments and blobs, and reconcile the touched accounts.
    pub fn purge_artifacts(&self, now: DateTime<Utc>) -> BlueprintResult<ArtifactPurgeReport> {
        let run = RunContext::start(ReaperJob::Artifacts.as_str());
        let _guard = run.span.enter();

        let (cascade, reconcile) = self
            .db
            .with_writer(|conn| {
                with_immediate_transaction(conn, |tx| {
                    let ids = self.evaluator.eligible_artifact_ids(tx, now)?;
                    let cascade = CascadeDeleter::delete_batch(tx, &ids)?;
                    let reconcile =
                        AggregateReconciler::reconcile(tx, &cascade.affected_accounts())?;
                    run.record(
                        tx,
                        cascade.artifacts_deleted,
                        json!({
                            "artifacts": cascade.artifacts_deleted,
                            "versions": cascade.versions_deleted,
                            "comments": cascade.comments_deleted,
                            "blobs_captured": cascade.blobs.len(),
                            "blobs_shared": cascade.blobs_shared,
                            "accounts_reconciled": reconcile.accounts_updated,
                        }),
                    )?;
                    Ok((cascade, reconcile))
                })
            })
            .inspect_err(|e| tracing::error!(error = %e, "artifact purge rolled back"))?;

        let blobs = self.content.reap(&cascade.blobs);

        let report = ArtifactPurgeReport {
            run_id: run.run_id.clone(),
            artifacts_deleted: cascade.artifacts_deleted,
            versions_deleted: cascade.versions_deleted,
            comments_deleted: cascade.comments_deleted,
            artifact_ids: cascade.artifact_ids,
            accounts_reconciled: reconcile.accounts_updated,
            accounts_missing: reconcile.accounts_missing,
            blobs_shared: cascade.blobs_shared,
            blobs,
            duration_ms: run.elapsed_ms(),
        };
        tracing::info!(
            artifacts = report.artifacts_deleted,
            versions = report.versions_deleted,
            comments = report.comments_deleted,
            blobs_removed = report.blobs.removed,
            blobs_failed = report.blobs.failed,
            accounts_reconciled = report.accounts_reconciled,
            duration_ms = report.duration_ms,
            "artifact purge complete"
        );
        Ok(report)
    }

    /// Delete sessions idle for longer than the session TTL.
    pub fn purge_sessions(&self, now: DateTime<Utc>) -> BlueprintResult<SessionPurgeReport> {
        let run = RunContext::start(ReaperJob::Sessions.as_str());
        let _guard = run.span.enter();
        let cutoff = self.sessions.cutoff(now);

        let sessions_deleted = self
            .db
            .with_writer(|conn| {
                with_immediate_transaction(conn, |tx| {
                    let deleted = self.sessions.purge(tx, now)?;
                    run.record(tx, deleted, json!({ "cutoff": cutoff }))?;
                    Ok(deleted)
                })
            })
            .inspect_err(|e| tracing::error!(error = %e, "session purge rolled back"))?;

        let report = SessionPurgeReport {
            run_id: run.run_id.clone(),
            cutoff,
            sessions_deleted,
            duration_ms: run.elapsed_ms(),
        };
        tracing::info!(sessions = sessions_deleted, %cutoff, "session purge complete");
        Ok(report)
    }

    /// Delete unconfirmed accounts older than the grace period, with their aggregates.
    pub fn purge_dormant_accounts(&self, now: DateTime<Utc>) -> BlueprintResult<AccountPurgeReport> {
        let run = RunContext::start(ReaperJob::Accounts.as_str());
        let _guard = run.span.enter();
        let cutoff = self.accounts.cutoff(now);

        let outcome = self
            .db
            .with_writer(|conn| {
                with_immediate_transaction(conn, |tx| {
                    let outcome = self.accounts.purge(tx, now)?;
                    run.record(
                        tx,
                        outcome.accounts_deleted,
                        json!({
                            "cutoff": cutoff,
                            "accounts": outcome.accounts_deleted,
                            "aggregates": outcome.aggregates_deleted,
                        }),
                    )?;
                    Ok(outcome)
                })
            })
            .inspect_err(|e| tracing::error!(error = %e, "dormant account purge rolled back"))?;

        let report = AccountPurgeReport {
            run_id: run.run_id.clone(),
            cutoff,
            account_ids: outcome.account_ids,
            accounts_deleted: outcome.accounts_deleted,
            aggregates_deleted: outcome.aggregates_deleted,
            duration_ms: run.elapsed_ms(),
        };
        tracing::info!(
            accounts = report.accounts_deleted,
            aggregates = report.aggregates_deleted,
            %cutoff,
            "dormant account purge complete"
        );
        Ok(report)
    }

    /// Soft-delete the anonymous sentinel's private artifacts.
    /// Without a configured sentinel this is a no-op and writes nothing.
    pub fn sweep_anonymous_artifacts(&self, now: DateTime<Utc>) -> BlueprintResult<AnonymousSweepReport> {
        let run = RunContext::start(ReaperJob::Anonymous.as_str());
        let _guard = run.span.enter();

        let Some(sentinel) = self.anonymous.sentinel().map(str::to_string) else {
            tracing::info!("no sentinel account configured, skipping anonymous sweep");
            return Ok(AnonymousSweepReport {
                run_id: run.run_id.clone(),
                sentinel: None,
                skipped: true,
                artifacts_flagged: 0,
                duration_ms: run.elapsed_ms(),
            });
        };

        let flagged = self
            .db
            .with_writer(|conn| {
                with_immediate_transaction(conn, |tx| {
                    let flagged = self.anonymous.sweep(tx, now)?;
                    run.record(tx, flagged, json!({ "sentinel": sentinel }))?;
                    Ok(flagged)
                })
            })
            .inspect_err(|e| tracing::error!(error = %e, "anonymous sweep rolled back"))?;

        tracing::info!(sentinel = %sentinel, artifacts = flagged, "anonymous sweep complete");
        Ok(AnonymousSweepReport {
            run_id: run.run_id.clone(),
            sentinel: Some(sentinel),
            skipped: false,
            artifacts_flagged: flagged,
            duration_ms: run.elapsed_ms(),
        })
    }

    /// Dispatch one reaper.
    pub fn run(&self, job: ReaperJob, now: DateTime<Utc>) -> BlueprintResult<RunReport> {
        Ok(match job {
            ReaperJob::Sessions => RunReport::Sessions(self.purge_sessions(now)?),
            ReaperJob::Accounts => RunReport::Accounts(self.purge_dormant_accounts(now)?),
            ReaperJob::Anonymous => RunReport::Anonymous(self.sweep_anonymous_artifacts(now)?),
            ReaperJob::Artifacts => RunReport::Artifacts(self.purge_artifacts(now)?),
        })
    }

    /// Run every reaper in [`ReaperJob::ALL`] order. A failing reaper does not
    /// stop the ones after it.
    pub fn run_all(&self, now: DateTime<Utc>) -> Vec<(ReaperJob, BlueprintResult<RunReport>)> {
        ReaperJob::ALL
            .into_iter()
            .map(|job| (job, self.run(job, now)))
            .collect()
    }

    /// Count what each reaper would act on at `now`, without writing.
    pub fn pending(&self, now: DateTime<Utc>) -> BlueprintResult<PendingReport> {
        self.db.with_reader(|conn| {
            Ok(PendingReport {
                now,
                eligible_artifacts: self.evaluator.count_eligible(conn, now)?,
                expired_sessions: self.sessions.count_expired(conn, now)?,
                dormant_accounts: self.accounts.count_dormant(conn, now)?,
                anonymous_private_artifacts: self.anonymous.count_pending(conn)?,
            })
        })
    }

    /// Rebuild every account's aggregate row from current state.
    pub fn reconcile_all_aggregates(&self) -> BlueprintResult<ReconcileReport> {
        let run = RunContext::start(RECONCILE_LEDGER_NAME);
        let _guard = run.span.enter();

        let written = self
            .db
            .with_writer(|conn| {
                with_immediate_transaction(conn, |tx| {
                    let written = AggregateReconciler::reconcile_all(tx)?;
                    run.record(tx, written, json!({ "aggregates": written }))?;
                    Ok(written)
                })
            })
            .inspect_err(|e| tracing::error!(error = %e, "aggregate rebuild rolled back"))?;

        tracing::info!(aggregates = written, "aggregate rebuild complete");
        Ok(ReconcileReport {
            run_id: run.run_id.clone(),
            aggregates_written: written,
            duration_ms: run.elapsed_ms(),
        })
    }

    /// Most recent ledger entries, newest first, optionally for one reaper.
    pub fn recent_runs(&self, reaper: Option<&str>, limit: usize) -> BlueprintResult<Vec<RunRecord>> {
        self.db.with_reader(|conn| runs::recent_runs(conn, reaper, limit))
    }
}

/// Identity and timing of one run.
struct RunContext {
    run_id: String,
    reaper: &'static str,
    started_at: DateTime<Utc>,
    clock: Instant,
    span: tracing::Span,
}

impl RunContext {
    fn start(reaper: &'static str) -> Self {
        let run_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("reaper_run", reaper, run_id = %run_id);
        Self {
            run_id,
            reaper,
            started_at: Utc::now(),
            clock: Instant::now(),
            span,
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    /// Append this run to the ledger inside the run's transaction.
    fn record(
        &self,
        tx: &Transaction<'_>,
        affected: usize,
        details: serde_json::Value,
    ) -> BlueprintResult<()> {
        runs::record_run(
            tx,
            &RunRecord {
                run_id: self.run_id.clone(),
                reaper: self.reaper.to_string(),
                started_at: self.started_at,
                finished_at: Utc::now(),
                affected: affected as u64,
                details,
            },
        )
    }
}
