//! Database schema and initialization

use crate::error::Result;
use crate::search::normalize;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection};
use std::path::Path;

/// Main database handle
pub struct Database {
    pub(crate) conn: Connection,
}

const SCHEMA_VERSION: i32 = 1;

/// SQL function exposing the query normalizer, used for exact-text lookups
pub(crate) const NORMALIZE_FN: &str = "qf_normalize";

const CREATE_TABLES: &str = r#"
-- Transcript lines, one row per quote
CREATE TABLE IF NOT EXISTS quotes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    episode_id TEXT NOT NULL,
    timestamp_sec INTEGER NOT NULL CHECK (timestamp_sec >= 0),
    speaker TEXT NOT NULL,
    text TEXT NOT NULL,
    episode_name TEXT NOT NULL DEFAULT '',
    spotify_url TEXT,
    created_at TEXT NOT NULL
);

-- Full-text index over quote text (external content)
CREATE VIRTUAL TABLE IF NOT EXISTS quotes_fts USING fts5(
    text,
    content='quotes',
    content_rowid='id',
    tokenize='porter unicode61'
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_quotes_speaker ON quotes(speaker);
CREATE INDEX IF NOT EXISTS idx_quotes_episode_timestamp ON quotes(episode_id, timestamp_sec);
"#;

const CREATE_TRIGGERS: &str = r#"
-- Sync FTS on insert
CREATE TRIGGER IF NOT EXISTS quotes_ai
AFTER INSERT ON quotes
BEGIN
    INSERT INTO quotes_fts(rowid, text) VALUES (new.id, new.text);
END;

-- Sync FTS on delete
CREATE TRIGGER IF NOT EXISTS quotes_ad
AFTER DELETE ON quotes
BEGIN
    INSERT INTO quotes_fts(quotes_fts, rowid, text) VALUES ('delete', old.id, old.text);
END;

-- Sync FTS on update
CREATE TRIGGER IF NOT EXISTS quotes_au
AFTER UPDATE ON quotes
BEGIN
    INSERT INTO quotes_fts(quotes_fts, rowid, text) VALUES ('delete', old.id, old.text);
    INSERT INTO quotes_fts(rowid, text) VALUES (new.id, new.text);
END;
"#;

impl Database {
    /// Open database at path, creating if necessary
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        register_functions(&conn)?;
        Ok(Self { conn })
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        register_functions(&conn)?;
        Ok(Self { conn })
    }

    /// Initialize database schema
    pub fn initialize(&self) -> Result<()> {
        // Set PRAGMAs for performance
        self.conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;
             PRAGMA busy_timeout = 5000;",
        )?;

        self.conn.execute_batch(CREATE_TABLES)?;
        self.conn.execute_batch(CREATE_TRIGGERS)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> Result<Option<i32>> {
        let version = self
            .conn
            .query_row(
                "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .ok();
        Ok(version)
    }
}

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        NORMALIZE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| normalize(&t)))
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db.initialize().unwrap();
        assert_eq!(db.schema_version().unwrap(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_normalize_function_registered() {
        let db = Database::open_in_memory().unwrap();
        let out: String = db
            .conn
            .query_row("SELECT qf_normalize('TRY  Both.')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(out, "try both");
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("quotes.sqlite");
        let db = Database::open(&path).unwrap();
        db.initialize().unwrap();
        assert!(path.exists());
    }
}
