//! Artifact rows: insert, lookup, purge eligibility, cascade removal, soft-delete sweep.

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::{AccountId, Artifact, ArtifactId, Exposure};

use super::{id_chunks, parse_exposure, placeholders};
use crate::{from_epoch, to_epoch, to_epoch_bound, to_storage_err};

const ARTIFACT_COLUMNS: &str = "id, title, owner_id, exposure, deleted_at, expires_at,
     current_version, created_at, published_at";

fn optional_ts(idx: usize, value: Option<i64>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    value.map(|secs| from_epoch(idx, secs)).transpose()
}

fn row_to_artifact(row: &Row<'_>) -> rusqlite::Result<Artifact> {
    Ok(Artifact {
        id: row.get(0)?,
        title: row.get(1)?,
        owner_id: row.get(2)?,
        exposure: parse_exposure(3, row.get(3)?)?,
        deleted_at: optional_ts(4, row.get(4)?)?,
        expires_at: optional_ts(5, row.get(5)?)?,
        current_version: row.get(6)?,
        created_at: from_epoch(7, row.get(7)?)?,
        published_at: optional_ts(8, row.get(8)?)?,
    })
}

/// Insert an artifact row.
pub fn insert_artifact(conn: &Connection, artifact: &Artifact) -> BlueprintResult<()> {
    conn.execute(
        "INSERT INTO artifacts (id, title, owner_id, exposure, deleted_at, expires_at,
                                current_version, created_at, published_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            artifact.id,
            artifact.title,
            artifact.owner_id,
            artifact.exposure.as_str(),
            artifact.deleted_at.map(to_epoch),
            artifact.expires_at.map(to_epoch),
            artifact.current_version,
            to_epoch(artifact.created_at),
            artifact.published_at.map(to_epoch),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get an artifact by id.
pub fn get_artifact(conn: &Connection, id: &str) -> BlueprintResult<Option<Artifact>> {
    conn.query_row(
        &format!("SELECT {ARTIFACT_COLUMNS} FROM artifacts WHERE id = ?1"),
        params![id],
        row_to_artifact,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Every artifact, ordered by id.
pub fn list_artifacts(conn: &Connection) -> BlueprintResult<Vec<Artifact>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {ARTIFACT_COLUMNS} FROM artifacts ORDER BY id"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], row_to_artifact)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Ids of artifacts that are purge-eligible at `now`, ordered by id.
///
/// Eligible iff soft-deleted (any timestamp) or expired strictly before `now`.
/// `limit` caps the batch; `None` returns every eligible id.
pub fn eligible_ids(
    conn: &Connection,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> BlueprintResult<Vec<ArtifactId>> {
    // SQLite treats a negative LIMIT as "no limit".
    let limit = limit.map(|l| l as i64).unwrap_or(-1);
    let mut stmt = conn
        .prepare_cached(
            "SELECT id FROM artifacts
             WHERE deleted_at IS NOT NULL
                OR (expires_at IS NOT NULL AND expires_at < ?1)
             ORDER BY id
             LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![to_epoch_bound(now), limit], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Number of artifacts purge-eligible at `now`.
pub fn count_eligible(conn: &Connection, now: DateTime<Utc>) -> BlueprintResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM artifacts
         WHERE deleted_at IS NOT NULL
            OR (expires_at IS NOT NULL AND expires_at < ?1)",
        params![to_epoch_bound(now)],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Owners of the given artifacts, one entry per owned artifact, with its exposure.
/// Ownerless artifacts are skipped.
pub fn owners_with_exposure(
    conn: &Connection,
    ids: &[ArtifactId],
) -> BlueprintResult<Vec<(AccountId, Exposure)>> {
    let mut out = Vec::new();
    for chunk in id_chunks(ids) {
        let sql = format!(
            "SELECT owner_id, exposure FROM artifacts
             WHERE owner_id IS NOT NULL AND id IN ({})",
            placeholders(chunk.len())
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| to_storage_err(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(chunk.iter()), |row| {
                Ok((row.get::<_, String>(0)?, parse_exposure(1, row.get(1)?)?))
            })
            .map_err(|e| to_storage_err(e.to_string()))?;
        for row in rows {
            out.push(row.map_err(|e| to_storage_err(e.to_string()))?);
        }
    }
    Ok(out)
}

/// Delete the given artifact rows. Returns the number deleted.
pub fn delete_artifacts(conn: &Connection, ids: &[ArtifactId]) -> BlueprintResult<usize> {
    let mut deleted = 0;
    for chunk in id_chunks(ids) {
        let sql = format!(
            "DELETE FROM artifacts WHERE id IN ({})",
            placeholders(chunk.len())
        );
        deleted += conn
            .execute(&sql, params_from_iter(chunk.iter()))
            .map_err(|e| to_storage_err(format!("artifacts: {e}")))?;
    }
    Ok(deleted)
}

/// Mark private artifacts of `owner_id` as soft-deleted at `now`.
/// Already soft-deleted artifacts keep their original timestamp.
pub fn soft_delete_private_owned_by(
    conn: &Connection,
    owner_id: &str,
    now: DateTime<Utc>,
) -> BlueprintResult<usize> {
    conn.execute(
        "UPDATE artifacts SET deleted_at = ?2
         WHERE owner_id = ?1
           AND exposure = 'private'
           AND deleted_at IS NULL",
        params![owner_id, to_epoch(now)],
    )
    .map_err(|e| to_storage_err(format!("artifacts: {e}")))
}

/// Count `owner_id`'s private artifacts not yet soft-deleted.
pub fn count_private_live_owned_by(conn: &Connection, owner_id: &str) -> BlueprintResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM artifacts
         WHERE owner_id = ?1 AND exposure = 'private' AND deleted_at IS NULL",
        params![owner_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
