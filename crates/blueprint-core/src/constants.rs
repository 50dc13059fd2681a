/// Blueprint lifecycle version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: i64 = 3_600;

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Maximum number of bound parameters per `IN (...)` chunk.
/// SQLite's default SQLITE_MAX_VARIABLE_NUMBER is 32766; stay well under it.
pub const MAX_IN_CLAUSE_PARAMS: usize = 500;

/// Environment variable holding the tracing filter.
pub const LOG_ENV_VAR: &str = "BLUEPRINT_LOG";

/// Default project config file name.
pub const CONFIG_FILENAME: &str = "blueprint.toml";
