//! Shared fixtures for the lifecycle integration tests.
#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::types::Value;
use rusqlite::Connection;
use tempfile::TempDir;

use blueprint_core::config::LifecycleConfig;
use blueprint_core::models::{Account, Artifact, ArtifactVersion, Exposure, Session};
use blueprint_lifecycle::content_store::ContentStore;
use blueprint_lifecycle::LifecycleEngine;
use blueprint_storage::queries::{accounts, artifacts, comments, sessions, versions};
use blueprint_storage::DatabaseManager;

pub const SENTINEL: &str = "anonymous";

/// Tables compared byte for byte by the rollback tests.
pub const TABLES: [&str; 7] = [
    "accounts",
    "usage_aggregates",
    "artifacts",
    "artifact_versions",
    "comments",
    "sessions",
    "reaper_runs",
];

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// An engine over an in-memory database and a temporary content root.
pub struct Harness {
    pub engine: LifecycleEngine,
    pub content_dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(adjust: impl FnOnce(&mut LifecycleConfig)) -> Self {
        let content_dir = tempfile::tempdir().unwrap();
        let mut config = LifecycleConfig::default();
        config.content_store.root = content_dir.path().display().to_string();
        adjust(&mut config);
        let db = DatabaseManager::open_in_memory().unwrap();
        Self {
            engine: LifecycleEngine::new(db, &config),
            content_dir,
        }
    }

    pub fn store(&self) -> &ContentStore {
        self.engine.content_store()
    }

    /// Run `f` on the writer connection outside any lifecycle run.
    pub fn conn<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        self.engine.db().with_writer(|conn| Ok(f(conn))).unwrap()
    }

    /// Insert `count` versions of `artifact_id` under `content_id` and write their blobs.
    pub fn seed_versions(&self, artifact_id: &str, content_id: &str, count: i64) {
        for version in 1..=count {
            let row = ArtifactVersion {
                artifact_id: artifact_id.to_string(),
                version,
                content_id: content_id.to_string(),
                reason: format!("revision {version}"),
                created_at: now() - Duration::days(5),
            };
            self.conn(|conn| versions::insert_version(conn, &row).unwrap());
            let blob = row.blob_ref();
            write_blob(
                self.store(),
                &blob.content_id,
                blob.version,
                &format!("# {artifact_id} v{version}"),
            );
        }
    }

    pub fn blob_exists(&self, content_id: &str, version: i64) -> bool {
        self.store().blob_path(content_id, version).unwrap().is_file()
    }

    pub fn dump_all(&self) -> Vec<(&'static str, Vec<Vec<Value>>)> {
        self.conn(|conn| TABLES.iter().map(|t| (*t, dump_table(conn, t))).collect())
    }
}

/// Write one version blob at its fan-out path, creating directories.
pub fn write_blob(store: &ContentStore, content_id: &str, version: i64, body: &str) -> PathBuf {
    let path = store.blob_path(content_id, version).unwrap();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, body).unwrap();
    path
}

pub fn artifact(id: &str, owner: Option<&str>, exposure: Exposure) -> Artifact {
    Artifact {
        id: id.to_string(),
        title: format!("Blueprint {id}"),
        owner_id: owner.map(str::to_string),
        exposure,
        deleted_at: None,
        expires_at: None,
        current_version: 1,
        created_at: now() - Duration::days(10),
        published_at: Some(now() - Duration::days(10)),
    }
}

pub fn account(id: &str, confirmed: bool, age: Duration) -> Account {
    Account {
        id: id.to_string(),
        username: format!("user-{id}"),
        confirmed_at: confirmed.then(|| now() - age + Duration::hours(1)),
        created_at: now() - age,
    }
}

pub fn session(id: &str, last_access_at: DateTime<Utc>) -> Session {
    Session {
        id: id.to_string(),
        last_access_at,
        payload: r#"{"csrf":"token"}"#.to_string(),
    }
}

pub fn insert_artifact(conn: &Connection, artifact: &Artifact) {
    artifacts::insert_artifact(conn, artifact).unwrap();
}

pub fn insert_account(conn: &Connection, account: &Account) {
    accounts::insert_account(conn, account).unwrap();
}

pub fn insert_session(conn: &Connection, session: &Session) {
    sessions::upsert_session(conn, session).unwrap();
}

pub fn insert_comment(conn: &Connection, artifact_id: &str, author: Option<&str>) -> i64 {
    comments::insert_comment(conn, artifact_id, author, "looks good", now() - Duration::days(1))
        .unwrap()
}

pub fn dump_table(conn: &Connection, table: &str) -> Vec<Vec<Value>> {
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {table} ORDER BY rowid"))
        .unwrap();
    let columns = stmt.column_count();
    let rows = stmt
        .query_map([], |row| {
            (0..columns)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .unwrap()
        .map(Result::unwrap)
        .collect();
    rows
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}
