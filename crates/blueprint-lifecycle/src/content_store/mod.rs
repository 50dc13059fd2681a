//! On-disk content store holding one blob file per artifact version.

pub mod path;
pub mod reaper;

use std::path::{Path, PathBuf};

use blueprint_core::config::ContentStoreConfig;
use blueprint_core::errors::ContentStoreError;

pub use reaper::{BlobReapReport, ContentStoreReaper};

/// Location and naming of the content store.
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    extension: String,
    prune_empty_dirs: bool,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            prune_empty_dirs: true,
        }
    }

    pub fn from_config(config: &ContentStoreConfig) -> Self {
        Self::new(&config.root, &config.extension).with_pruning(config.prune_empty_dirs)
    }

    /// Whether emptied trie directories are removed after reaping.
    pub fn with_pruning(mut self, prune_empty_dirs: bool) -> Self {
        self.prune_empty_dirs = prune_empty_dirs;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn prunes_empty_dirs(&self) -> bool {
        self.prune_empty_dirs
    }

    pub fn leaf_dir(&self, content_id: &str) -> Result<PathBuf, ContentStoreError> {
        path::leaf_dir(&self.root, content_id)
    }

    pub fn blob_path(&self, content_id: &str, version: i64) -> Result<PathBuf, ContentStoreError> {
        path::blob_path(&self.root, content_id, version, &self.extension)
    }
}

pub(crate) fn io_err(path: &Path, e: std::io::Error) -> ContentStoreError {
    ContentStoreError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
