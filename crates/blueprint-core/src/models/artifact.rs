use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, Exposure};

pub type ArtifactId = String;

/// A published blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub title: String,
    /// `None` for ownerless artifacts; may also be the sentinel anonymous account.
    pub owner_id: Option<AccountId>,
    pub exposure: Exposure,
    /// Soft-delete marker. Any value makes the artifact purge-eligible.
    pub deleted_at: Option<DateTime<Utc>>,
    /// `None` means the artifact never expires.
    pub expires_at: Option<DateTime<Utc>>,
    pub current_version: i64,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// One revision of an artifact. Its body lives in the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactVersion {
    pub artifact_id: ArtifactId,
    pub version: i64,
    pub content_id: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl ArtifactVersion {
    pub fn blob_ref(&self) -> BlobRef {
        BlobRef {
            content_id: self.content_id.clone(),
            version: self.version,
        }
    }
}

/// A comment. `artifact_id` is not enforced by the schema and may point at an
/// artifact that never existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub artifact_id: ArtifactId,
    pub author_id: Option<AccountId>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Key of one version blob in the content store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlobRef {
    pub content_id: String,
    pub version: i64,
}
