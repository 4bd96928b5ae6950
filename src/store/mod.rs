//! Link store module: the durable crawl frontier
//!
//! This module is the single source of truth for every discovered link and
//! its crawl state. It owns:
//! - SQLite database initialization and schema management
//! - Link uniqueness and the global discovery cap
//! - Durable visit-status transitions
//! - Frontier reads (uncrawled and stale rows)

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteLinkStore;
pub use traits::{LinkStore, StoreError, StoreResult};

/// Sentinel recorded as `src_link` for the seed URL, which no page referenced
pub const SEED_SRC: &str = "NA";

/// One row of the `links` table
///
/// A record is created when a link is first discovered and mutated only by
/// `record_visit`; rows are never deleted.
#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub id: i64,
    pub link: String,
    pub src_link: String,
    pub is_crawled: bool,
    pub last_crawl_dt: Option<String>,
    pub response_status: Option<u16>,
    pub content_type: Option<String>,
    pub content_len: Option<i64>,
    pub file_path: Option<String>,
    pub created_at: String,
}

/// Outcome of an `insert_new` call
///
/// `Duplicate` and `LimitReached` are both no-ops on the table, but callers
/// react differently: a duplicate is skipped silently while a capacity
/// rejection stops link extraction for the rest of the crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was created
    Inserted,
    /// The link already exists; the insert was absorbed
    Duplicate,
    /// The discovery cap has been reached; nothing was inserted
    LimitReached,
}

impl InsertOutcome {
    /// Returns true if a new row was actually created
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted)
    }
}
