use serde::{Deserialize, Serialize};

use super::{AccountId, Exposure};

/// The four per-account counters kept in `usage_aggregates`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    pub public_artifacts: i64,
    pub public_comments: i64,
    /// Covers both `private` and `unlisted`.
    pub private_artifacts: i64,
    /// Covers both `private` and `unlisted`.
    pub private_comments: i64,
}

impl UsageCounters {
    pub fn record_artifact(&mut self, exposure: Exposure) {
        if exposure.counts_as_private() {
            self.private_artifacts += 1;
        } else {
            self.public_artifacts += 1;
        }
    }

    pub fn record_comment(&mut self, exposure: Exposure) {
        if exposure.counts_as_private() {
            self.private_comments += 1;
        } else {
            self.public_comments += 1;
        }
    }
}

/// One row of `usage_aggregates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageAggregate {
    pub account_id: AccountId,
    pub counters: UsageCounters,
}
