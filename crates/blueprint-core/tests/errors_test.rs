use blueprint_core::errors::{BlueprintError, ConfigError, ContentStoreError, StorageError};

#[test]
fn storage_error_converts_and_displays_message() {
    let err: BlueprintError = StorageError::SqliteError {
        message: "no such column: exposure".to_string(),
    }
    .into();
    assert!(err.is_storage());
    assert_eq!(err.to_string(), "SQLite error: no such column: exposure");
}

#[test]
fn migration_error_names_version() {
    let err = StorageError::MigrationFailed {
        version: 2,
        message: "table exists".to_string(),
    };
    assert_eq!(err.to_string(), "migration failed at version 2: table exists");
}

#[test]
fn non_storage_errors_are_not_relational() {
    let err: BlueprintError = ConfigError::FileNotFound {
        path: "x.toml".to_string(),
    }
    .into();
    assert!(!err.is_storage());

    let err: BlueprintError = ContentStoreError::InvalidContentId {
        content_id: "../etc".to_string(),
        reason: "unsafe character '.'".to_string(),
    }
    .into();
    assert!(!err.is_storage());
    assert!(err.to_string().contains("../etc"));
}
