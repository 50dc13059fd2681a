//! Fan-out path layout of the content store. Pure functions, no filesystem access.
//!
//! Each lowercased character of a content id is one directory level below the
//! root; the leaf directory holds `<content-id>-<version>.<ext>`:
//!
//! ```text
//! Abc1, version 2, "md"  ->  <root>/a/b/c/1/abc1-2.md
//! ```

use std::path::{Path, PathBuf};

use blueprint_core::errors::ContentStoreError;

/// Reject ids that would not map to plain path components.
pub fn validate_content_id(content_id: &str) -> Result<(), ContentStoreError> {
    if content_id.is_empty() {
        return Err(invalid(content_id, "empty content id"));
    }
    if let Some(c) = content_id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(invalid(content_id, &format!("unsafe character {c:?}")));
    }
    Ok(())
}

/// Directory holding every version blob of `content_id`.
pub fn leaf_dir(root: &Path, content_id: &str) -> Result<PathBuf, ContentStoreError> {
    validate_content_id(content_id)?;
    let mut dir = root.to_path_buf();
    for c in content_id.chars() {
        dir.push(c.to_ascii_lowercase().to_string());
    }
    Ok(dir)
}

/// `<content-id>-<version>.<ext>` with the id lowercased.
pub fn blob_file_name(content_id: &str, version: i64, extension: &str) -> String {
    format!("{}-{version}.{extension}", content_id.to_ascii_lowercase())
}

/// Full path of one version blob.
pub fn blob_path(
    root: &Path,
    content_id: &str,
    version: i64,
    extension: &str,
) -> Result<PathBuf, ContentStoreError> {
    Ok(leaf_dir(root, content_id)?.join(blob_file_name(content_id, version, extension)))
}

/// The version number encoded in a leaf-directory file name, if the name is a
/// blob of `content_id`.
pub fn parse_blob_version(file_name: &str, content_id: &str, extension: &str) -> Option<i64> {
    let prefix = format!("{}-", content_id.to_ascii_lowercase());
    let suffix = format!(".{extension}");
    let digits = file_name.strip_prefix(&prefix)?.strip_suffix(&suffix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn invalid(content_id: &str, reason: &str) -> ContentStoreError {
    ContentStoreError::InvalidContentId {
        content_id: content_id.to_string(),
        reason: reason.to_string(),
    }
}
