//! Comment rows. `artifact_id` is a plain value; orphans are expected.

use rusqlite::{params, params_from_iter, Connection};

use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::{AccountId, ArtifactId, Comment, Exposure};

use super::{id_chunks, parse_exposure, placeholders};
use crate::{from_epoch, to_epoch, to_storage_err};

/// Insert a comment and return its row id.
pub fn insert_comment(
    conn: &Connection,
    artifact_id: &str,
    author_id: Option<&str>,
    content: &str,
    created_at: chrono::DateTime<chrono::Utc>,
) -> BlueprintResult<i64> {
    conn.execute(
        "INSERT INTO comments (artifact_id, author_id, content, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![artifact_id, author_id, content, to_epoch(created_at)],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

/// Every comment, ordered by id.
pub fn list_comments(conn: &Connection) -> BlueprintResult<Vec<Comment>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, artifact_id, author_id, content, created_at
             FROM comments ORDER BY id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Comment {
                id: row.get(0)?,
                artifact_id: row.get(1)?,
                author_id: row.get(2)?,
                content: row.get(3)?,
                created_at: from_epoch(4, row.get(4)?)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Authors of comments on the given artifacts, one entry per comment, paired
/// with the exposure of the artifact the comment targets.
/// Anonymous comments are skipped.
pub fn authors_with_exposure(
    conn: &Connection,
    ids: &[ArtifactId],
) -> BlueprintResult<Vec<(AccountId, Exposure)>> {
    let mut out = Vec::new();
    for chunk in id_chunks(ids) {
        let sql = format!(
            "SELECT c.author_id, a.exposure
             FROM comments c
             JOIN artifacts a ON a.id = c.artifact_id
             WHERE c.author_id IS NOT NULL AND c.artifact_id IN ({})",
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

/// Delete every comment targeting the given artifacts. Returns the number deleted.
pub fn delete_comments_for(conn: &Connection, ids: &[ArtifactId]) -> BlueprintResult<usize> {
    let mut deleted = 0;
    for chunk in id_chunks(ids) {
        let sql = format!(
            "DELETE FROM comments WHERE artifact_id IN ({})",
            placeholders(chunk.len())
        );
        deleted += conn
            .execute(&sql, params_from_iter(chunk.iter()))
            .map_err(|e| to_storage_err(format!("comments: {e}")))?;
    }
    Ok(deleted)
}

/// Number of comments whose artifact id matches no artifact row.
pub fn count_orphans(conn: &Connection) -> BlueprintResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM comments c
         WHERE NOT EXISTS (SELECT 1 FROM artifacts a WHERE a.id = c.artifact_id)",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
