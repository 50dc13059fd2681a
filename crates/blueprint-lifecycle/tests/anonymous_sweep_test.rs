//! Anonymous ownership sweep.

mod common;

use chrono::Duration;

use blueprint_core::models::Exposure;
use blueprint_storage::queries::artifacts;

use common::*;

fn seed_anonymous_world(h: &Harness) {
    h.conn(|conn| {
        insert_account(conn, &account(SENTINEL, true, Duration::days(400)));
        insert_account(conn, &account("carol", true, Duration::days(40)));

        insert_artifact(conn, &artifact("anon-private", Some(SENTINEL), Exposure::Private));
        insert_artifact(conn, &artifact("anon-public", Some(SENTINEL), Exposure::Public));
        insert_artifact(conn, &artifact("anon-unlisted", Some(SENTINEL), Exposure::Unlisted));
        let mut flagged = artifact("anon-flagged", Some(SENTINEL), Exposure::Private);
        flagged.deleted_at = Some(now() - Duration::days(3));
        insert_artifact(conn, &flagged);
        insert_artifact(conn, &artifact("carol-private", Some("carol"), Exposure::Private));
    });
}

fn with_sentinel() -> Harness {
    Harness::with_config(|config| {
        config.anonymous.sentinel_account_id = Some(SENTINEL.to_string());
    })
}

#[test]
fn only_private_artifacts_of_the_sentinel_are_flagged() {
    let h = with_sentinel();
    seed_anonymous_world(&h);

    let report = h.engine.sweep_anonymous_artifacts(now()).unwrap();
    assert!(!report.skipped);
    assert_eq!(report.sentinel.as_deref(), Some(SENTINEL));
    assert_eq!(report.artifacts_flagged, 1);

    h.conn(|conn| {
        let get = |id: &str| artifacts::get_artifact(conn, id).unwrap().unwrap();
        assert_eq!(get("anon-private").deleted_at, Some(now()));
        assert_eq!(get("anon-flagged").deleted_at, Some(now() - Duration::days(3)));
        assert!(get("anon-public").deleted_at.is_none());
        assert!(get("anon-unlisted").deleted_at.is_none());
        assert!(get("carol-private").deleted_at.is_none());
    });
}

#[test]
fn flagged_artifacts_are_removed_by_the_next_purge() {
    let h = with_sentinel();
    seed_anonymous_world(&h);

    h.engine.sweep_anonymous_artifacts(now()).unwrap();
    let purge = h.engine.purge_artifacts(now()).unwrap();

    assert_eq!(
        purge.artifact_ids,
        vec!["anon-flagged".to_string(), "anon-private".to_string()]
    );
    assert_eq!(h.engine.pending(now()).unwrap().anonymous_private_artifacts, 0);
}

#[test]
fn without_a_sentinel_nothing_changes() {
    let h = Harness::new();
    seed_anonymous_world(&h);
    let before = h.dump_all();

    let report = h.engine.sweep_anonymous_artifacts(now()).unwrap();
    assert!(report.skipped);
    assert!(report.sentinel.is_none());
    assert_eq!(report.artifacts_flagged, 0);

    assert_eq!(before, h.dump_all());
}

#[test]
fn sweep_is_idempotent() {
    let h = with_sentinel();
    seed_anonymous_world(&h);

    h.engine.sweep_anonymous_artifacts(now()).unwrap();
    let again = h.engine.sweep_anonymous_artifacts(now() + Duration::hours(1)).unwrap();
    assert_eq!(again.artifacts_flagged, 0);

    h.conn(|conn| {
        let a = artifacts::get_artifact(conn, "anon-private").unwrap().unwrap();
        assert_eq!(a.deleted_at, Some(now()));
    });
}
