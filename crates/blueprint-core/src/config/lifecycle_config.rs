//! Top-level lifecycle configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnonymousConfig, ContentStoreConfig, RetentionConfig, StorageConfig};
use crate::constants::CONFIG_FILENAME;
use crate::errors::ConfigError;

pub const ENV_DB_PATH: &str = "BLUEPRINT_DB_PATH";
pub const ENV_CONTENT_ROOT: &str = "BLUEPRINT_CONTENT_ROOT";
pub const ENV_SENTINEL_ACCOUNT: &str = "BLUEPRINT_SENTINEL_ACCOUNT";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`BLUEPRINT_*`)
/// 2. Config file (`--config` path, or `blueprint.toml` in the working directory)
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub storage: StorageConfig,
    pub content_store: ContentStoreConfig,
    pub retention: RetentionConfig,
    pub anonymous: AnonymousConfig,
}

impl LifecycleConfig {
    /// Load configuration with layered resolution.
    ///
    /// An explicit `path` must exist. Without one, `blueprint.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(CONFIG_FILENAME);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `BLUEPRINT_*` overrides read through `lookup`.
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(db_path) = non_empty(ENV_DB_PATH) {
            self.storage.db_path = db_path;
        }
        if let Some(root) = non_empty(ENV_CONTENT_ROOT) {
            self.content_store.root = root;
        }
        if let Some(sentinel) = non_empty(ENV_SENTINEL_ACCOUNT) {
            self.anonymous.sentinel_account_id = Some(sentinel);
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention.session_ttl_hours == 0 {
            return Err(invalid("retention.session_ttl_hours", "must be greater than 0"));
        }
        if self.retention.account_grace_days == 0 {
            return Err(invalid("retention.account_grace_days", "must be greater than 0"));
        }
        if self.retention.batch_limit == Some(0) {
            return Err(invalid("retention.batch_limit", "must be greater than 0 when set"));
        }
        let ext = &self.content_store.extension;
        if ext.is_empty() || ext.contains('.') || ext.contains('/') {
            return Err(invalid(
                "content_store.extension",
                "must be a non-empty extension without dots or slashes",
            ));
        }
        if self.storage.read_pool_size == 0 {
            return Err(invalid("storage.read_pool_size", "must be greater than 0"));
        }
        if matches!(&self.anonymous.sentinel_account_id, Some(id) if id.trim().is_empty()) {
            return Err(invalid(
                "anonymous.sentinel_account_id",
                "must not be blank; omit the key to disable the sweep",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LifecycleConfig::default();
        config.validate().unwrap();
        assert_eq!(config.retention.session_ttl_hours, 24);
        assert_eq!(config.retention.account_grace_days, 30);
        assert!(config.anonymous.sentinel_account_id.is_none());
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = LifecycleConfig::from_toml(
            r#"
            [retention]
            session_ttl_hours = 12

            [anonymous]
            sentinel_account_id = "anon"
            "#,
        )
        .unwrap();
        assert_eq!(config.retention.session_ttl_hours, 12);
        assert_eq!(config.retention.account_grace_days, 30);
        assert_eq!(config.anonymous.sentinel_account_id.as_deref(), Some("anon"));
        assert_eq!(config.content_store.extension, "md");
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let mut config = LifecycleConfig::from_toml("[storage]\ndb_path = \"file.db\"").unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_DB_PATH, "env.db"),
            (ENV_SENTINEL_ACCOUNT, "anon-env"),
            (ENV_CONTENT_ROOT, "  "),
        ]
        .into_iter()
        .collect();
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.storage.db_path, "env.db");
        assert_eq!(config.anonymous.sentinel_account_id.as_deref(), Some("anon-env"));
        assert_eq!(config.content_store.root, "content");
    }

    #[test]
    fn rejects_zero_windows_and_bad_extension() {
        let mut config = LifecycleConfig::default();
        config.retention.session_ttl_hours = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { ref field, .. }) if field == "retention.session_ttl_hours"
        ));

        let mut config = LifecycleConfig::default();
        config.content_store.extension = ".md".to_string();
        assert!(config.validate().is_err());

        let mut config = LifecycleConfig::default();
        config.retention.batch_limit = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = LifecycleConfig::from_toml("[retention\nsession_ttl_hours = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn explicit_missing_file_is_reported() {
        let err = LifecycleConfig::load(Some(Path::new("/nonexistent/blueprint.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
