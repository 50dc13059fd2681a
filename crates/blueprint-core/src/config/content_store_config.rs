use serde::{Deserialize, Serialize};

use super::defaults;

/// Location and naming of the on-disk version blobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStoreConfig {
    /// Root directory of the single-character fan-out trie.
    pub root: String,
    /// Blob file extension, without the leading dot.
    pub extension: String,
    /// Remove directories left empty after blob deletion.
    pub prune_empty_dirs: bool,
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self {
            root: defaults::DEFAULT_CONTENT_ROOT.to_string(),
            extension: defaults::DEFAULT_BLOB_EXTENSION.to_string(),
            prune_empty_dirs: defaults::DEFAULT_PRUNE_EMPTY_DIRS,
        }
    }
}
