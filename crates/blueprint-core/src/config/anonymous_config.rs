use serde::{Deserialize, Serialize};

/// Sentinel "no owner" account of the running environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymousConfig {
    /// Unset in environments without an anonymous account; the sweep is then a no-op.
    pub sentinel_account_id: Option<String>,
}
