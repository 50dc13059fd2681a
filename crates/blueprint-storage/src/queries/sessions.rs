//! Session rows and the idle-session sweep.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::Session;

use crate::{from_epoch, to_epoch, to_epoch_bound, to_storage_err};

/// Insert or refresh a session row.
pub fn upsert_session(conn: &Connection, session: &Session) -> BlueprintResult<()> {
    conn.execute(
        "INSERT INTO sessions (id, last_access_at, payload) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
             last_access_at = excluded.last_access_at,
             payload = excluded.payload",
        params![session.id, to_epoch(session.last_access_at), session.payload],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get a session by id.
pub fn get_session(conn: &Connection, id: &str) -> BlueprintResult<Option<Session>> {
    conn.query_row(
        "SELECT id, last_access_at, payload FROM sessions WHERE id = ?1",
        params![id],
        |row| {
            Ok(Session {
                id: row.get(0)?,
                last_access_at: from_epoch(1, row.get(1)?)?,
                payload: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Delete sessions last accessed strictly before `cutoff`.
pub fn delete_idle_before(conn: &Connection, cutoff: DateTime<Utc>) -> BlueprintResult<usize> {
    conn.execute(
        "DELETE FROM sessions WHERE last_access_at < ?1",
        params![to_epoch_bound(cutoff)],
    )
    .map_err(|e| to_storage_err(format!("sessions: {e}")))
}

/// Number of sessions last accessed strictly before `cutoff`.
pub fn count_idle_before(conn: &Connection, cutoff: DateTime<Utc>) -> BlueprintResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM sessions WHERE last_access_at < ?1",
        params![to_epoch_bound(cutoff)],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
