//! Artifact version rows and the content references they carry.

use std::collections::BTreeSet;

use rusqlite::{params, params_from_iter, Connection};

use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::{ArtifactId, ArtifactVersion, BlobRef};

use super::{id_chunks, placeholders};
use crate::{from_epoch, to_epoch, to_storage_err};

/// Insert a version row.
pub fn insert_version(conn: &Connection, version: &ArtifactVersion) -> BlueprintResult<()> {
    conn.execute(
        "INSERT INTO artifact_versions (artifact_id, version, content_id, reason, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            version.artifact_id,
            version.version,
            version.content_id,
            version.reason,
            to_epoch(version.created_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Versions of one artifact, oldest first.
pub fn versions_of(conn: &Connection, artifact_id: &str) -> BlueprintResult<Vec<ArtifactVersion>> {
    let mut stmt = conn
        .prepare(
            "SELECT artifact_id, version, content_id, reason, created_at
             FROM artifact_versions WHERE artifact_id = ?1 ORDER BY version",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![artifact_id], |row| {
            Ok(ArtifactVersion {
                artifact_id: row.get(0)?,
                version: row.get(1)?,
                content_id: row.get(2)?,
                reason: row.get(3)?,
                created_at: from_epoch(4, row.get(4)?)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Content references of every version of the given artifacts.
pub fn blob_refs_for(conn: &Connection, ids: &[ArtifactId]) -> BlueprintResult<Vec<BlobRef>> {
    let mut out = Vec::new();
    for chunk in id_chunks(ids) {
        let sql = format!(
            "SELECT content_id, version FROM artifact_versions
             WHERE artifact_id IN ({})
             ORDER BY content_id, version",
            placeholders(chunk.len())
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| to_storage_err(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(chunk.iter()), |row| {
                Ok(BlobRef {
                    content_id: row.get(0)?,
                    version: row.get(1)?,
                })
            })
            .map_err(|e| to_storage_err(e.to_string()))?;
        for row in rows {
            out.push(row.map_err(|e| to_storage_err(e.to_string()))?);
        }
    }
    Ok(out)
}

/// Lowercased content ids, out of `content_ids`, that some version row still
/// references. Matching ignores case since blob paths are lowercased.
pub fn referenced_content_ids(
    conn: &Connection,
    content_ids: &[String],
) -> BlueprintResult<BTreeSet<String>> {
    let lowered: Vec<String> = content_ids
        .iter()
        .map(|id| id.to_ascii_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mut out = BTreeSet::new();
    for chunk in id_chunks(&lowered) {
        let sql = format!(
            "SELECT DISTINCT lower(content_id) FROM artifact_versions
             WHERE lower(content_id) IN ({})",
            placeholders(chunk.len())
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| to_storage_err(e.to_string()))?;
        let rows = stmt
            .query_map(params_from_iter(chunk.iter()), |row| row.get::<_, String>(0))
            .map_err(|e| to_storage_err(e.to_string()))?;
        for row in rows {
            out.insert(row.map_err(|e| to_storage_err(e.to_string()))?);
        }
    }
    Ok(out)
}

/// Delete every version of the given artifacts. Returns the number deleted.
pub fn delete_versions_for(conn: &Connection, ids: &[ArtifactId]) -> BlueprintResult<usize> {
    let mut deleted = 0;
    for chunk in id_chunks(ids) {
        let sql = format!(
            "DELETE FROM artifact_versions WHERE artifact_id IN ({})",
            placeholders(chunk.len())
        );
        deleted += conn
            .execute(&sql, params_from_iter(chunk.iter()))
            .map_err(|e| to_storage_err(format!("artifact_versions: {e}")))?;
    }
    Ok(deleted)
}
