//! Database schema definitions
//!
//! This module contains the SQL schema for the pagehoard database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Every discovered link and its crawl state
CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    link TEXT NOT NULL UNIQUE,
    src_link TEXT NOT NULL,
    is_crawled INTEGER NOT NULL DEFAULT 0,
    last_crawl_dt TEXT,
    response_status INTEGER,
    content_type TEXT,
    content_len INTEGER,
    file_path TEXT UNIQUE,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_links_is_crawled ON links(is_crawled);
CREATE INDEX IF NOT EXISTS idx_links_last_crawl_dt ON links(last_crawl_dt);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
