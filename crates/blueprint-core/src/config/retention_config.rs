use serde::{Deserialize, Serialize};

use super::defaults;

/// Retention windows for the TTL reapers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Sessions idle longer than this are deleted.
    pub session_ttl_hours: u32,
    /// Unconfirmed accounts older than this are deleted.
    pub account_grace_days: u32,
    /// Max artifacts purged per run. `None` purges every eligible artifact.
    pub batch_limit: Option<usize>,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: defaults::DEFAULT_SESSION_TTL_HOURS,
            account_grace_days: defaults::DEFAULT_ACCOUNT_GRACE_DAYS,
            batch_limit: None,
        }
    }
}
