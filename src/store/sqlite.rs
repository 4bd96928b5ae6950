//! SQLite link store implementation
//!
//! This module provides the SQLite-backed implementation of the LinkStore
//! trait, including the reconnect-and-replay behavior for transient failures.

use crate::store::schema::initialize_schema;
use crate::store::traits::{LinkStore, StoreError, StoreResult};
use crate::store::{InsertOutcome, LinkRecord};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::{Path, PathBuf};

/// SQLite link store backend
pub struct SqliteLinkStore {
    conn: Connection,
    path: Option<PathBuf>,
    max_links: u64,
}

/// Classifies statement failures that warrant one reconnect-and-replay
///
/// These are the connection-class faults; constraint violations and other
/// logic errors surface immediately.
fn is_transient(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::DatabaseBusy)
            | Some(ErrorCode::DatabaseLocked)
            | Some(ErrorCode::SystemIoFailure)
    )
}

fn open_connection(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    // Configure SQLite for concurrent readers and durable writes
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
    ",
    )?;

    initialize_schema(&conn)?;

    Ok(conn)
}

impl SqliteLinkStore {
    /// Opens or creates the link database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `max_links` - The discovery cap enforced by `insert_new`
    pub fn new(path: &Path, max_links: u64) -> StoreResult<Self> {
        let conn = open_connection(path)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            max_links,
        })
    }

    /// Creates an in-memory store (for testing)
    #[cfg(test)]
    pub fn new_in_memory(max_links: u64) -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            path: None,
            max_links,
        })
    }

    /// Runs one statement, reconnecting and replaying exactly once on a
    /// transient failure; a second failure surfaces to the caller
    fn with_retry<T>(
        &mut self,
        f: impl Fn(&Connection) -> Result<T, rusqlite::Error>,
    ) -> StoreResult<T> {
        match f(&self.conn) {
            Ok(value) => Ok(value),
            Err(e) if is_transient(&e) => {
                tracing::warn!("store statement failed ({}), reconnecting to replay", e);
                self.reconnect()?;
                f(&self.conn).map_err(|e| StoreError::ReplayFailed(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reopens the database connection
    ///
    /// An in-memory database has nothing to reopen (its data lives in the
    /// connection), so the replay reuses the existing handle.
    fn reconnect(&mut self) -> StoreResult<()> {
        if let Some(path) = &self.path {
            self.conn = open_connection(path).map_err(|e| StoreError::Reconnect(e.to_string()))?;
        }
        Ok(())
    }
}

fn row_to_record(row: &Row<'_>) -> Result<LinkRecord, rusqlite::Error> {
    Ok(LinkRecord {
        id: row.get(0)?,
        link: row.get(1)?,
        src_link: row.get(2)?,
        is_crawled: row.get::<_, i64>(3)? != 0,
        last_crawl_dt: row.get(4)?,
        response_status: row.get(5)?,
        content_type: row.get(6)?,
        content_len: row.get(7)?,
        file_path: row.get(8)?,
        created_at: row.get(9)?,
    })
}

const RECORD_COLUMNS: &str = "id, link, src_link, is_crawled, last_crawl_dt, \
     response_status, content_type, content_len, file_path, created_at";

impl LinkStore for SqliteLinkStore {
    fn count(&mut self) -> StoreResult<u64> {
        let count: i64 =
            self.with_retry(|conn| conn.query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0)))?;
        Ok(count as u64)
    }

    fn insert_new(&mut self, link: &str, src_link: &str) -> StoreResult<InsertOutcome> {
        // The cap read and the conditional insert happen under the same
        // store lock, so concurrent workers cannot overshoot the limit.
        if self.count()? >= self.max_links {
            return Ok(InsertOutcome::LimitReached);
        }

        let now = Utc::now().to_rfc3339();
        let changed = self.with_retry(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO links (link, src_link, created_at) VALUES (?1, ?2, ?3)",
                params![link, src_link, now],
            )
        })?;

        if changed == 1 {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::Duplicate)
        }
    }

    fn get_uncrawled(&mut self, limit: u64) -> StoreResult<Vec<LinkRecord>> {
        self.with_retry(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM links WHERE is_crawled = 0 LIMIT ?1",
                RECORD_COLUMNS
            ))?;
            let rows = stmt.query_map(params![limit as i64], row_to_record)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }

    fn get_stale(&mut self, older_than: DateTime<Utc>, limit: u64) -> StoreResult<Vec<LinkRecord>> {
        let cutoff = older_than.to_rfc3339();
        self.with_retry(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM links WHERE is_crawled = 1 AND last_crawl_dt <= ?1 LIMIT ?2",
                RECORD_COLUMNS
            ))?;
            let rows = stmt.query_map(params![cutoff, limit as i64], row_to_record)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
    }

    fn record_visit(
        &mut self,
        id: i64,
        status: u16,
        content_type: Option<&str>,
        content_len: Option<i64>,
        file_path: Option<&str>,
    ) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();

        if status == 200 {
            self.with_retry(|conn| {
                conn.execute(
                    "UPDATE links SET is_crawled = 1, last_crawl_dt = ?1, response_status = ?2,
                     content_type = ?3, content_len = ?4, file_path = ?5 WHERE id = ?6",
                    params![now, status, content_type, content_len, file_path, id],
                )
            })?;
        } else {
            // Non-200 visits record the status alone; body fields are not touched
            self.with_retry(|conn| {
                conn.execute(
                    "UPDATE links SET is_crawled = 1, last_crawl_dt = ?1, response_status = ?2
                     WHERE id = ?3",
                    params![now, status, id],
                )
            })?;
        }

        Ok(())
    }

    fn get_link(&mut self, id: i64) -> StoreResult<Option<LinkRecord>> {
        self.with_retry(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM links WHERE id = ?1", RECORD_COLUMNS),
                params![id],
                row_to_record,
            )
            .optional()
        })
    }
}
