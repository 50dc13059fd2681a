//! File-backed DatabaseManager: pragmas, migrations, reader visibility.

use chrono::{TimeZone, Utc};

use blueprint_core::config::StorageConfig;
use blueprint_core::models::Session;
use blueprint_storage::connection::pragmas::verify_wal_mode;
use blueprint_storage::migrations::{current_version, LATEST_VERSION};
use blueprint_storage::queries::sessions;
use blueprint_storage::{to_storage_err, with_immediate_transaction, DatabaseManager};

#[test]
fn file_database_uses_wal_and_latest_schema() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        db_path: dir.path().join("blueprint.db").display().to_string(),
        ..StorageConfig::default()
    };
    let db = DatabaseManager::open(&config).unwrap();

    assert!(db.with_writer(verify_wal_mode).unwrap());
    assert_eq!(db.with_writer(current_version).unwrap(), LATEST_VERSION);
    assert_eq!(db.path(), Some(dir.path().join("blueprint.db").as_path()));
}

#[test]
fn readers_see_committed_writes() {
    let dir = tempfile::tempdir().unwrap();
    let db = DatabaseManager::open_path(&dir.path().join("blueprint.db")).unwrap();
    let session = Session {
        id: "s1".to_string(),
        last_access_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        payload: "{}".to_string(),
    };

    db.with_writer(|conn| {
        with_immediate_transaction(conn, |tx| sessions::upsert_session(tx, &session))
    })
    .unwrap();

    let loaded = db.with_reader(|conn| sessions::get_session(conn, "s1")).unwrap();
    assert_eq!(loaded, Some(session));
}

#[test]
fn readers_reject_writes() {
    let dir = tempfile::tempdir().unwrap();
    let db = DatabaseManager::open_path(&dir.path().join("blueprint.db")).unwrap();

    let result = db.with_reader(|conn| {
        conn.execute("DELETE FROM sessions", [])
            .map_err(|e| to_storage_err(e.to_string()))
    });
    assert!(result.is_err());
}

#[test]
fn reopening_keeps_data_and_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blueprint.db");
    {
        let db = DatabaseManager::open_path(&path).unwrap();
        db.with_writer(|conn| {
            sessions::upsert_session(
                conn,
                &Session {
                    id: "s1".to_string(),
                    last_access_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    payload: String::new(),
                },
            )
        })
        .unwrap();
    }

    let db = DatabaseManager::open_path(&path).unwrap();
    assert_eq!(db.with_writer(current_version).unwrap(), LATEST_VERSION);
    assert!(db
        .with_reader(|conn| sessions::get_session(conn, "s1"))
        .unwrap()
        .is_some());
}
