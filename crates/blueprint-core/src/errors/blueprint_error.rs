use super::{ConfigError, ContentStoreError, StorageError};

/// Top-level error for every lifecycle operation.
#[derive(Debug, thiserror::Error)]
pub enum BlueprintError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ContentStore(#[from] ContentStoreError),
}

pub type BlueprintResult<T> = Result<T, BlueprintError>;

impl BlueprintError {
    /// True for relational failures that aborted a transactional run.
    pub fn is_storage(&self) -> bool {
        matches!(self, BlueprintError::Storage(_))
    }
}
