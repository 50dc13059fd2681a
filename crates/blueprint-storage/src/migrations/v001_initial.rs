//! v001: accounts, usage_aggregates, artifacts, artifact_versions, comments, sessions.
//!
//! All timestamps are INTEGER unix seconds. `comments.artifact_id` carries no
//! foreign key: comments may reference artifacts that never existed.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id           TEXT PRIMARY KEY,
    username     TEXT NOT NULL,
    confirmed_at INTEGER,
    created_at   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_accounts_unconfirmed
    ON accounts(created_at) WHERE confirmed_at IS NULL;

CREATE TABLE IF NOT EXISTS usage_aggregates (
    account_id        TEXT PRIMARY KEY,
    public_artifacts  INTEGER NOT NULL DEFAULT 0,
    public_comments   INTEGER NOT NULL DEFAULT 0,
    private_artifacts INTEGER NOT NULL DEFAULT 0,
    private_comments  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS artifacts (
    id              TEXT PRIMARY KEY,
    title           TEXT NOT NULL DEFAULT '',
    owner_id        TEXT,
    exposure        TEXT NOT NULL CHECK (exposure IN ('public', 'unlisted', 'private')),
    deleted_at      INTEGER,
    expires_at      INTEGER,
    current_version INTEGER NOT NULL DEFAULT 1,
    created_at      INTEGER NOT NULL,
    published_at    INTEGER
);

CREATE INDEX IF NOT EXISTS idx_artifacts_owner ON artifacts(owner_id);
CREATE INDEX IF NOT EXISTS idx_artifacts_deleted
    ON artifacts(deleted_at) WHERE deleted_at IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_artifacts_expires
    ON artifacts(expires_at) WHERE expires_at IS NOT NULL;

CREATE TABLE IF NOT EXISTS artifact_versions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    artifact_id TEXT NOT NULL REFERENCES artifacts(id),
    version     INTEGER NOT NULL,
    content_id  TEXT NOT NULL,
    reason      TEXT NOT NULL DEFAULT '',
    created_at  INTEGER NOT NULL,
    UNIQUE (artifact_id, version)
);

CREATE INDEX IF NOT EXISTS idx_versions_content ON artifact_versions(content_id);

CREATE TABLE IF NOT EXISTS comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    artifact_id TEXT NOT NULL,
    author_id   TEXT,
    content     TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_artifact ON comments(artifact_id);
CREATE INDEX IF NOT EXISTS idx_comments_author ON comments(author_id);

CREATE TABLE IF NOT EXISTS sessions (
    id             TEXT PRIMARY KEY,
    last_access_at INTEGER NOT NULL,
    payload        TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_sessions_last_access ON sessions(last_access_at);
";
