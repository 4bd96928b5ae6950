//! Link store trait and error types

use crate::store::{InsertOutcome, LinkRecord};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store operation failed after reconnect: {0}")]
    ReplayFailed(String),

    #[error("Failed to reopen database connection: {0}")]
    Reconnect(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for the persistent link frontier
///
/// The store is the only component allowed to mutate persisted crawl state.
/// All methods take `&mut self`: every statement runs through the store's
/// reconnect-and-replay path, and callers serialize access through one lock.
pub trait LinkStore {
    /// Total distinct links known. Used to enforce the discovery cap.
    fn count(&mut self) -> StoreResult<u64>;

    /// Registers a newly discovered link
    ///
    /// Inserts an uncrawled row with `created_at = now`. Returns
    /// `Duplicate` if the link already exists and `LimitReached` if the
    /// configured maximum-link cap is already met; neither is an error.
    /// The cap check and the insert run inside the same exclusive section,
    /// so the cap holds under concurrent callers.
    fn insert_new(&mut self, link: &str, src_link: &str) -> StoreResult<InsertOutcome>;

    /// Rows with `is_crawled = 0`, bounded by `limit`, store-default order
    fn get_uncrawled(&mut self, limit: u64) -> StoreResult<Vec<LinkRecord>>;

    /// Crawled rows whose last visit is at or before `older_than`
    fn get_stale(&mut self, older_than: DateTime<Utc>, limit: u64) -> StoreResult<Vec<LinkRecord>>;

    /// Records the outcome of a visit attempt
    ///
    /// Sets `is_crawled = 1`, advances `last_crawl_dt`, and stores `status`
    /// (real or synthetic). The body fields are written only when
    /// `status == 200`. This is the only write path after the initial insert.
    fn record_visit(
        &mut self,
        id: i64,
        status: u16,
        content_type: Option<&str>,
        content_len: Option<i64>,
        file_path: Option<&str>,
    ) -> StoreResult<()>;

    /// Fetches one record by id (diagnostics and tests)
    fn get_link(&mut self, id: i64) -> StoreResult<Option<LinkRecord>>;
}
