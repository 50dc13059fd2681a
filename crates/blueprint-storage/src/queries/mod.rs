//! Per-table queries run by the lifecycle jobs.

pub mod accounts;
pub mod aggregates;
pub mod artifacts;
pub mod comments;
pub mod runs;
pub mod sessions;
pub mod versions;

use blueprint_core::constants::MAX_IN_CLAUSE_PARAMS;

/// `?, ?, ?` with `n` placeholders.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Split ids into chunks that fit in one `IN (...)` clause.
pub(crate) fn id_chunks(ids: &[String]) -> std::slice::Chunks<'_, String> {
    ids.chunks(MAX_IN_CLAUSE_PARAMS)
}

/// Map a stored exposure string, failing the row on unknown values.
pub(crate) fn parse_exposure(
    idx: usize,
    value: String,
) -> rusqlite::Result<blueprint_core::Exposure> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(blueprint_core::errors::StorageError::InvalidValue {
                table: "artifacts",
                column: "exposure",
                value,
            }),
        )
    })
}
