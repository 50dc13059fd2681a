//! # blueprint-storage
//!
//! SQLite persistence layer for the lifecycle jobs: a serialized writer
//! connection, a read pool, `BEGIN IMMEDIATE` transactions, migrations and
//! the per-table queries the reapers run.

pub mod connection;
pub mod migrations;
pub mod queries;

pub use connection::writer::with_immediate_transaction;
pub use connection::DatabaseManager;

use chrono::{DateTime, Utc};

use blueprint_core::errors::{BlueprintError, StorageError};

/// Convert a message into a storage error.
pub fn to_storage_err(message: impl Into<String>) -> BlueprintError {
    BlueprintError::Storage(StorageError::SqliteError {
        message: message.into(),
    })
}

/// Timestamps are stored as unix seconds.
pub fn to_epoch(ts: DateTime<Utc>) -> i64 {
    ts.timestamp()
}

/// Bound for `stored < ts` comparisons against whole-second columns.
///
/// Rounds up when `ts` has a fractional second, so a stored value equal to
/// the floor of `ts` still counts as strictly before it.
pub fn to_epoch_bound(ts: DateTime<Utc>) -> i64 {
    if ts.timestamp_subsec_nanos() > 0 {
        ts.timestamp() + 1
    } else {
        ts.timestamp()
    }
}

/// Inverse of [`to_epoch`] for the value read from column `idx`.
/// Out-of-range values map to a conversion error.
pub fn from_epoch(idx: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Integer,
            Box::new(StorageError::InvalidValue {
                table: "*",
                column: "timestamp",
                value: secs.to_string(),
            }),
        )
    })
}
