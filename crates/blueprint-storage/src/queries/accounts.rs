//! Account rows and the dormant-account sweep.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use blueprint_core::errors::BlueprintResult;
use blueprint_core::models::{Account, AccountId};

use crate::{from_epoch, to_epoch, to_epoch_bound, to_storage_err};

/// Insert an account row.
pub fn insert_account(conn: &Connection, account: &Account) -> BlueprintResult<()> {
    conn.execute(
        "INSERT INTO accounts (id, username, confirmed_at, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            account.id,
            account.username,
            account.confirmed_at.map(to_epoch),
            to_epoch(account.created_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Get an account by id.
pub fn get_account(conn: &Connection, id: &str) -> BlueprintResult<Option<Account>> {
    conn.query_row(
        "SELECT id, username, confirmed_at, created_at FROM accounts WHERE id = ?1",
        params![id],
        |row| {
            Ok(Account {
                id: row.get(0)?,
                username: row.get(1)?,
                confirmed_at: row.get::<_, Option<i64>>(2)?.map(|v| from_epoch(2, v)).transpose()?,
                created_at: from_epoch(3, row.get(3)?)?,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Ids of unconfirmed accounts created strictly before `cutoff`.
pub fn dormant_ids(conn: &Connection, cutoff: DateTime<Utc>) -> BlueprintResult<Vec<AccountId>> {
    let mut stmt = conn
        .prepare(
            "SELECT id FROM accounts
             WHERE confirmed_at IS NULL AND created_at < ?1
             ORDER BY id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![to_epoch_bound(cutoff)], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Delete the aggregate rows of dormant accounts. Must run before
/// [`delete_dormant`] in the same transaction.
pub fn delete_dormant_aggregates(conn: &Connection, cutoff: DateTime<Utc>) -> BlueprintResult<usize> {
    conn.execute(
        "DELETE FROM usage_aggregates WHERE account_id IN (
             SELECT id FROM accounts WHERE confirmed_at IS NULL AND created_at < ?1
         )",
        params![to_epoch_bound(cutoff)],
    )
    .map_err(|e| to_storage_err(format!("usage_aggregates: {e}")))
}

/// Delete unconfirmed accounts created strictly before `cutoff`.
pub fn delete_dormant(conn: &Connection, cutoff: DateTime<Utc>) -> BlueprintResult<usize> {
    conn.execute(
        "DELETE FROM accounts WHERE confirmed_at IS NULL AND created_at < ?1",
        params![to_epoch_bound(cutoff)],
    )
    .map_err(|e| to_storage_err(format!("accounts: {e}")))
}

/// Number of unconfirmed accounts created strictly before `cutoff`.
pub fn count_dormant(conn: &Connection, cutoff: DateTime<Utc>) -> BlueprintResult<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE confirmed_at IS NULL AND created_at < ?1",
        params![to_epoch_bound(cutoff)],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
