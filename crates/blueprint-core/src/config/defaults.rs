// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "blueprint.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Content store ---
pub const DEFAULT_CONTENT_ROOT: &str = "content";
pub const DEFAULT_BLOB_EXTENSION: &str = "md";
pub const DEFAULT_PRUNE_EMPTY_DIRS: bool = true;

// --- Retention ---
pub const DEFAULT_SESSION_TTL_HOURS: u32 = 24;
pub const DEFAULT_ACCOUNT_GRACE_DAYS: u32 = 30;

// --- Observability ---
pub const DEFAULT_LOG_FILTER: &str = "blueprint=info";
