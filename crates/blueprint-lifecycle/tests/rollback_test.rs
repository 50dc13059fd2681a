//! Failed runs roll back completely: every table is unchanged, no blob is
//! touched, and no ledger row is written.

mod common;

use chrono::Duration;

use blueprint_core::models::Exposure;

use common::*;

fn seed_purgeable(h: &Harness) {
    h.conn(|conn| {
        insert_account(conn, &account("alice", true, Duration::days(90)));
        insert_account(conn, &account("bob", true, Duration::days(90)));
        let mut doomed = artifact("doomed", Some("alice"), Exposure::Private);
        doomed.deleted_at = Some(now() - Duration::days(2));
        insert_artifact(conn, &doomed);
        insert_artifact(conn, &artifact("kept", Some("alice"), Exposure::Public));
        insert_comment(conn, "doomed", Some("bob"));
        insert_comment(conn, "kept", Some("bob"));
    });
    h.seed_versions("doomed", "d00m", 2);
    h.engine.reconcile_all_aggregates().unwrap();
}

fn assert_failed_without_trace(h: &Harness, before: &[(&'static str, Vec<Vec<rusqlite::types::Value>>)]) {
    let after = h.dump_all();
    for ((table, rows_before), (_, rows_after)) in before.iter().zip(after.iter()) {
        assert_eq!(rows_before, rows_after, "{table} changed by a failed run");
    }
}

#[test]
fn cascade_rolls_back_when_reconciliation_hits_schema_drift() {
    let h = Harness::new();
    seed_purgeable(&h);
    // Deletes succeed, then the aggregate upsert fails on the renamed column.
    h.conn(|conn| {
        conn.execute_batch(
            "ALTER TABLE usage_aggregates RENAME COLUMN private_comments TO private_remarks",
        )
        .unwrap()
    });
    let before = h.dump_all();

    let err = h.engine.purge_artifacts(now()).unwrap_err();
    assert!(err.is_storage());

    assert_failed_without_trace(&h, &before);
    assert!(h.blob_exists("d00m", 1));
    assert!(h.blob_exists("d00m", 2));
}

#[test]
fn cascade_rolls_back_when_a_delete_is_rejected() {
    let h = Harness::new();
    seed_purgeable(&h);
    h.conn(|conn| {
        conn.execute_batch(
            "CREATE TRIGGER artifacts_locked BEFORE DELETE ON artifacts
             BEGIN SELECT RAISE(ABORT, 'artifacts are locked'); END;",
        )
        .unwrap()
    });
    let before = h.dump_all();

    assert!(h.engine.purge_artifacts(now()).is_err());

    assert_failed_without_trace(&h, &before);
    assert!(h.blob_exists("d00m", 1));
    assert!(h.engine.recent_runs(Some("artifacts"), 10).unwrap().is_empty());
}

#[test]
fn anonymous_sweep_rolls_back_on_missing_exposure_column() {
    let h = Harness::with_config(|config| {
        config.anonymous.sentinel_account_id = Some(SENTINEL.to_string());
    });
    h.conn(|conn| {
        insert_artifact(conn, &artifact("anon-1", Some(SENTINEL), Exposure::Private));
        conn.execute_batch("ALTER TABLE artifacts RENAME COLUMN exposure TO visibility")
            .unwrap();
    });
    let before = h.dump_all();

    let err = h.engine.sweep_anonymous_artifacts(now()).unwrap_err();
    assert!(err.is_storage());
    assert_failed_without_trace(&h, &before);
}

#[test]
fn dormant_purge_restores_aggregates_when_account_delete_fails() {
    let h = Harness::new();
    h.conn(|conn| {
        insert_account(conn, &account("stale", false, Duration::days(60)));
    });
    h.engine.reconcile_all_aggregates().unwrap();
    h.conn(|conn| {
        conn.execute_batch(
            "CREATE TRIGGER accounts_locked BEFORE DELETE ON accounts
             BEGIN SELECT RAISE(ABORT, 'accounts are locked'); END;",
        )
        .unwrap()
    });
    let before = h.dump_all();

    assert!(h.engine.purge_dormant_accounts(now()).is_err());
    assert_failed_without_trace(&h, &before);
    h.conn(|conn| assert_eq!(count(conn, "usage_aggregates"), 1));
}

#[test]
fn session_purge_failure_leaves_no_ledger_row() {
    let h = Harness::new();
    h.conn(|conn| {
        insert_session(conn, &session("old", now() - Duration::hours(48)));
        conn.execute_batch(
            "CREATE TRIGGER sessions_locked BEFORE DELETE ON sessions
             BEGIN SELECT RAISE(ABORT, 'sessions are locked'); END;",
        )
        .unwrap()
    });
    let before = h.dump_all();

    assert!(h.engine.purge_sessions(now()).is_err());
    assert_failed_without_trace(&h, &before);
}
