//! Error handling for the lifecycle subsystem.
//! One error enum per concern, `thiserror` only.

pub mod blueprint_error;
pub mod config_error;
pub mod content_store_error;
pub mod storage_error;

pub use blueprint_error::{BlueprintError, BlueprintResult};
pub use config_error::ConfigError;
pub use content_store_error::ContentStoreError;
pub use storage_error::StorageError;
