//! v002: reaper_runs ledger. One row per committed lifecycle run.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS reaper_runs (
    run_id      TEXT PRIMARY KEY,
    reaper      TEXT NOT NULL,
    started_at  INTEGER NOT NULL,
    finished_at INTEGER NOT NULL,
    affected    INTEGER NOT NULL DEFAULT 0,
    details     TEXT NOT NULL DEFAULT '{}'
);

CREATE INDEX IF NOT EXISTS idx_reaper_runs_reaper ON reaper_runs(reaper, finished_at);
";
