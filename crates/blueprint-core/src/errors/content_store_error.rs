/// Errors raised by the on-disk content store.
///
/// These never abort a lifecycle run: the content store reaper logs them and
/// counts them as failed blob deletions.
#[derive(Debug, thiserror::Error)]
pub enum ContentStoreError {
    #[error("invalid content id {content_id:?}: {reason}")]
    InvalidContentId { content_id: String, reason: String },

    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },
}
