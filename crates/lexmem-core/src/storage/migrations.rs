//! Database Migrations
//!
//! Schema migration definitions for the storage layer.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "Initial schema: words, explanations, reviews, aggregates, review queue",
    up: MIGRATION_V1_UP,
}];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS words (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    text TEXT NOT NULL,
    context TEXT,
    confidence INTEGER NOT NULL DEFAULT 3,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_words_user ON words(user_id);

-- Generated explanations; written out of band by the AI collaborator
CREATE TABLE IF NOT EXISTS word_explanations (
    word_id TEXT PRIMARY KEY REFERENCES words(id) ON DELETE CASCADE,
    definition TEXT NOT NULL,
    example_good TEXT NOT NULL,
    example_bad TEXT,
    part_of_speech TEXT,
    cefr_level TEXT,
    generated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    result INTEGER NOT NULL,
    review_type TEXT NOT NULL,
    reviewed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reviews_word_time ON reviews(word_id, reviewed_at);
CREATE INDEX IF NOT EXISTS idx_reviews_user_time ON reviews(user_id, reviewed_at);

-- Per-word aggregates, maintained in the same transaction as the review
CREATE TABLE IF NOT EXISTS review_stats (
    word_id TEXT PRIMARY KEY REFERENCES words(id) ON DELETE CASCADE,
    total_reviews INTEGER NOT NULL DEFAULT 0,
    correct_reviews INTEGER NOT NULL DEFAULT 0,
    last_reviewed_at TEXT,
    accuracy_rate REAL NOT NULL DEFAULT 0.0
);

-- Ranked candidate set; the per-user rows are replaced atomically on rebuild
CREATE TABLE IF NOT EXISTS review_queue (
    user_id TEXT NOT NULL,
    word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
    priority_score REAL NOT NULL,
    reason TEXT NOT NULL,
    PRIMARY KEY (user_id, word_id)
);

CREATE INDEX IF NOT EXISTS idx_queue_user_score ON review_queue(user_id, priority_score DESC);

INSERT INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            // execute_batch handles the multi-statement SQL
            conn.execute_batch(migration.up)?;

            applied += 1;
        }
    }

    Ok(applied)
}
