use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A web session record. Only its expiry is managed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub last_access_at: DateTime<Utc>,
    pub payload: String,
}
