//! reaper_runs ledger: one row per committed run, written inside the run's
//! own transaction.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use blueprint_core::errors::BlueprintResult;

use crate::{from_epoch, to_epoch, to_storage_err};

/// A committed lifecycle run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub reaper: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Primary rows removed or marked by the run.
    pub affected: u64,
    pub details: serde_json::Value,
}

/// Append a run to the ledger.
pub fn record_run(conn: &Connection, run: &RunRecord) -> BlueprintResult<()> {
    conn.execute(
        "INSERT INTO reaper_runs (run_id, reaper, started_at, finished_at, affected, details)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            run.run_id,
            run.reaper,
            to_epoch(run.started_at),
            to_epoch(run.finished_at),
            run.affected as i64,
            run.details.to_string(),
        ],
    )
    .map_err(|e| to_storage_err(format!("reaper_runs: {e}")))?;
    Ok(())
}

/// Most recent runs first, optionally filtered by reaper name.
pub fn recent_runs(
    conn: &Connection,
    reaper: Option<&str>,
    limit: usize,
) -> BlueprintResult<Vec<RunRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT run_id, reaper, started_at, finished_at, affected, details
             FROM reaper_runs
             WHERE ?1 IS NULL OR reaper = ?1
             ORDER BY finished_at DESC, rowid DESC
             LIMIT ?2",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![reaper, limit as i64], |row| {
            let details: String = row.get(5)?;
            Ok(RunRecord {
                run_id: row.get(0)?,
                reaper: row.get(1)?,
                started_at: from_epoch(2, row.get(2)?)?,
                finished_at: from_epoch(3, row.get(3)?)?,
                affected: row.get::<_, i64>(4)? as u64,
                details: serde_json::from_str(&details).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        5,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
