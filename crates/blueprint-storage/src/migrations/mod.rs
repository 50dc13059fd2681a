//! Schema migrations using PRAGMA user_version.

pub mod v001_initial;
pub mod v002_reaper_runs;

use rusqlite::Connection;

use blueprint_core::errors::{BlueprintError, BlueprintResult, StorageError};

use crate::to_storage_err;

/// Latest schema version known to this build.
pub const LATEST_VERSION: u32 = 2;

fn migration_failed(version: u32, e: rusqlite::Error) -> BlueprintError {
    StorageError::MigrationFailed {
        version,
        message: e.to_string(),
    }
    .into()
}

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> BlueprintResult<()> {
    let current_version = current_version(conn)?;

    let migrations: &[(&str, u32)] = &[
        (v001_initial::MIGRATION_SQL, 1),
        (v002_reaper_runs::MIGRATION_SQL, 2),
    ];

    for (sql, version) in migrations {
        if current_version < *version {
            conn.execute_batch(sql)
                .map_err(|e| migration_failed(*version, e))?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| migration_failed(*version, e))?;
            tracing::info!(version = version, "applied migration");
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> BlueprintResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}
