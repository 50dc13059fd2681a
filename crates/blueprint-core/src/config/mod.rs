//! Configuration for the lifecycle jobs.
//! TOML-based, 3-layer resolution: env > file > defaults.

pub mod anonymous_config;
pub mod content_store_config;
pub mod defaults;
pub mod lifecycle_config;
pub mod retention_config;
pub mod storage_config;

pub use anonymous_config::AnonymousConfig;
pub use content_store_config::ContentStoreConfig;
pub use lifecycle_config::LifecycleConfig;
pub use retention_config::RetentionConfig;
pub use storage_config::StorageConfig;
