//! SessionReaper: TTL sweep of idle sessions.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

use blueprint_core::constants::SECONDS_PER_HOUR;
use blueprint_core::errors::BlueprintResult;
use blueprint_storage::queries::sessions;

#[derive(Debug, Clone)]
pub struct SessionReaper {
    ttl: Duration,
}

impl SessionReaper {
    pub fn new(ttl_hours: u32) -> Self {
        Self {
            ttl: Duration::seconds(i64::from(ttl_hours) * SECONDS_PER_HOUR),
        }
    }

    /// Sessions last accessed strictly before this instant are expired.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.ttl
    }

    /// Delete expired sessions. Returns the number deleted.
    pub fn purge(&self, conn: &Connection, now: DateTime<Utc>) -> BlueprintResult<usize> {
        sessions::delete_idle_before(conn, self.cutoff(now))
    }

    pub fn count_expired(&self, conn: &Connection, now: DateTime<Utc>) -> BlueprintResult<i64> {
        sessions::count_idle_before(conn, self.cutoff(now))
    }
}
