//! ContentStoreReaper: deletes the blobs of versions removed by a committed cascade.
//!
//! Runs strictly after the database transaction commits. Nothing here can
//! fail a run: every problem is logged with `warn!` and counted. A blob that
//! is already gone counts as absent, so retrying the same references is safe.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;

use blueprint_core::models::BlobRef;

use super::{io_err, path, ContentStore};

/// Outcome of one reaping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlobReapReport {
    pub removed: usize,
    pub already_absent: usize,
    pub failed: usize,
    pub dirs_pruned: usize,
}

impl BlobReapReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

pub struct ContentStoreReaper {
    store: ContentStore,
}

impl ContentStoreReaper {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Delete every version blob of each referenced content id: the captured
    /// versions plus any other `<content-id>-<n>` file left in its leaf directory.
    ///
    /// Callers pass only content ids no surviving version uses. Ids differing
    /// in case share files and are reaped once.
    pub fn reap(&self, blobs: &[BlobRef]) -> BlobReapReport {
        let mut by_content: BTreeMap<String, BTreeSet<i64>> = BTreeMap::new();
        for blob in blobs {
            by_content
                .entry(blob.content_id.to_ascii_lowercase())
                .or_default()
                .insert(blob.version);
        }

        let mut report = BlobReapReport::default();
        for (content_id, versions) in &by_content {
            self.reap_content(content_id, versions, &mut report);
        }

        if report.failed > 0 {
            tracing::warn!(
                removed = report.removed,
                failed = report.failed,
                "content store reap finished with failures"
            );
        } else {
            tracing::debug!(
                removed = report.removed,
                already_absent = report.already_absent,
                dirs_pruned = report.dirs_pruned,
                "content store reap finished"
            );
        }
        report
    }

    fn reap_content(&self, content_id: &str, versions: &BTreeSet<i64>, report: &mut BlobReapReport) {
        let leaf = match self.store.leaf_dir(content_id) {
            Ok(leaf) => leaf,
            Err(e) => {
                tracing::warn!(content_id, error = %e, "skipping blobs with unsafe content id");
                report.failed += versions.len();
                return;
            }
        };

        for &version in versions {
            let file = leaf.join(path::blob_file_name(content_id, version, self.store.extension()));
            remove_blob(&file, report);
        }
        self.remove_strays(&leaf, content_id, versions, report);

        if self.store.prunes_empty_dirs() {
            report.dirs_pruned += prune_upwards(&leaf, self.store.root());
        }
    }

    /// Versions no row pointed at anymore, e.g. left behind by an interrupted edit.
    fn remove_strays(
        &self,
        leaf: &Path,
        content_id: &str,
        captured: &BTreeSet<i64>,
        report: &mut BlobReapReport,
    ) {
        let entries = match fs::read_dir(leaf) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return,
            Err(e) => {
                tracing::warn!(dir = %leaf.display(), error = %e, "cannot scan leaf directory");
                report.failed += 1;
                return;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(version) = path::parse_blob_version(name, content_id, self.store.extension())
            else {
                continue;
            };
            if captured.contains(&version) {
                continue;
            }
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                remove_blob(&entry.path(), report);
            }
        }
    }
}

fn remove_blob(file: &Path, report: &mut BlobReapReport) {
    match fs::remove_file(file) {
        Ok(()) => report.removed += 1,
        Err(e) if e.kind() == ErrorKind::NotFound => report.already_absent += 1,
        Err(e) => {
            tracing::warn!(error = %io_err(file, e), "failed to delete blob");
            report.failed += 1;
        }
    }
}

/// Remove `leaf` and its ancestors below `root` while they are empty.
/// Stops at the first directory that is not empty or cannot be removed.
fn prune_upwards(leaf: &Path, root: &Path) -> usize {
    let mut pruned = 0;
    let mut dir = leaf;
    while dir != root && dir.starts_with(root) {
        match fs::remove_dir(dir) {
            Ok(()) => pruned += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(_) => break,
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }
    pruned
}
