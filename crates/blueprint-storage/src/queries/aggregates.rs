//! usage_aggregates: per-account counters recomputed from live rows.
//!
//! Counting rules shared by every query here:
//! - artifacts count by their own exposure;
//! - comments count by the exposure of the artifact they target, and only
//!   while that artifact exists (orphans count nowhere);
//! - `unlisted` falls in the private bucket.

use rusqlite::{params, Connection, OptionalExtension};

use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::{UsageAggregate, UsageCounters};

use crate::to_storage_err;

const COUNTERS_FOR_ACCOUNT_SQL: &str = "
    SELECT
        (SELECT COUNT(*) FROM artifacts
          WHERE owner_id = ?1 AND exposure = 'public'),
        (SELECT COUNT(*) FROM comments c JOIN artifacts a ON a.id = c.artifact_id
          WHERE c.author_id = ?1 AND a.exposure = 'public'),
        (SELECT COUNT(*) FROM artifacts
          WHERE owner_id = ?1 AND exposure IN ('private', 'unlisted')),
        (SELECT COUNT(*) FROM comments c JOIN artifacts a ON a.id = c.artifact_id
          WHERE c.author_id = ?1 AND a.exposure IN ('private', 'unlisted'))";

/// Compute an account's counters from the current rows.
pub fn compute_counters(conn: &Connection, account_id: &str) -> BlueprintResult<UsageCounters> {
    conn.query_row(COUNTERS_FOR_ACCOUNT_SQL, params![account_id], |row| {
        Ok(UsageCounters {
            public_artifacts: row.get(0)?,
            public_comments: row.get(1)?,
            private_artifacts: row.get(2)?,
            private_comments: row.get(3)?,
        })
    })
    .map_err(|e| to_storage_err(format!("usage_aggregates: {e}")))
}

/// Upsert an account's aggregate row.
///
/// Nothing is written when the account no longer exists; returns whether a
/// row was written.
pub fn write_counters(
    conn: &Connection,
    account_id: &str,
    counters: &UsageCounters,
) -> BlueprintResult<bool> {
    let written = conn
        .execute(
            "INSERT INTO usage_aggregates
                 (account_id, public_artifacts, public_comments, private_artifacts, private_comments)
             SELECT id, ?2, ?3, ?4, ?5 FROM accounts WHERE id = ?1
             ON CONFLICT(account_id) DO UPDATE SET
                 public_artifacts  = excluded.public_artifacts,
                 public_comments   = excluded.public_comments,
                 private_artifacts = excluded.private_artifacts,
                 private_comments  = excluded.private_comments",
            params![
                account_id,
                counters.public_artifacts,
                counters.public_comments,
                counters.private_artifacts,
                counters.private_comments,
            ],
        )
        .map_err(|e| to_storage_err(format!("usage_aggregates: {e}")))?;
    Ok(written > 0)
}

/// Recompute the aggregate row of every account in one statement.
/// Returns the number of rows written.
pub fn recompute_all(conn: &Connection) -> BlueprintResult<usize> {
    conn.execute(
        "INSERT INTO usage_aggregates
             (account_id, public_artifacts, public_comments, private_artifacts, private_comments)
         SELECT acc.id,
             (SELECT COUNT(*) FROM artifacts
               WHERE owner_id = acc.id AND exposure = 'public'),
             (SELECT COUNT(*) FROM comments c JOIN artifacts a ON a.id = c.artifact_id
               WHERE c.author_id = acc.id AND a.exposure = 'public'),
             (SELECT COUNT(*) FROM artifacts
               WHERE owner_id = acc.id AND exposure IN ('private', 'unlisted')),
             (SELECT COUNT(*) FROM comments c JOIN artifacts a ON a.id = c.artifact_id
               WHERE c.author_id = acc.id AND a.exposure IN ('private', 'unlisted'))
         FROM accounts acc WHERE true
         ON CONFLICT(account_id) DO UPDATE SET
             public_artifacts  = excluded.public_artifacts,
             public_comments   = excluded.public_comments,
             private_artifacts = excluded.private_artifacts,
             private_comments  = excluded.private_comments",
        [],
    )
    .map_err(|e| to_storage_err(format!("usage_aggregates: {e}")))
}

/// Read an account's stored counters.
pub fn get_counters(conn: &Connection, account_id: &str) -> BlueprintResult<Option<UsageCounters>> {
    conn.query_row(
        "SELECT public_artifacts, public_comments, private_artifacts, private_comments
         FROM usage_aggregates WHERE account_id = ?1",
        params![account_id],
        |row| {
            Ok(UsageCounters {
                public_artifacts: row.get(0)?,
                public_comments: row.get(1)?,
                private_artifacts: row.get(2)?,
                private_comments: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Every stored aggregate row, ordered by account id.
pub fn list_aggregates(conn: &Connection) -> BlueprintResult<Vec<UsageAggregate>> {
    let mut stmt = conn
        .prepare(
            "SELECT account_id, public_artifacts, public_comments, private_artifacts, private_comments
             FROM usage_aggregates ORDER BY account_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(UsageAggregate {
                account_id: row.get(0)?,
                counters: UsageCounters {
                    public_artifacts: row.get(1)?,
                    public_comments: row.get(2)?,
                    private_artifacts: row.get(3)?,
                    private_comments: row.get(4)?,
                },
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
