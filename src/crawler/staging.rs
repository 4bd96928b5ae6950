//! Staging buffer between the link store and the worker pool
//!
//! Workers take links from this in-memory batch instead of hitting the store
//! per link. A record leaves the buffer exactly once (pop is exclusive) and
//! is not reintroduced until the pool's next full drain-then-refill cycle, so
//! no link can be in flight twice.

use crate::store::{LinkRecord, LinkStore, SqliteLinkStore, StoreResult};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// In-memory batch of frontier records
pub struct StagingBuffer {
    links: Mutex<Vec<LinkRecord>>,
    store: Arc<Mutex<SqliteLinkStore>>,
    batch_limit: u64,
}

impl StagingBuffer {
    /// Creates an empty buffer draining from the given store
    ///
    /// `batch_limit` bounds each frontier read, uncrawled and stale alike.
    pub fn new(store: Arc<Mutex<SqliteLinkStore>>, batch_limit: u64) -> Self {
        Self {
            links: Mutex::new(Vec::new()),
            store,
            batch_limit,
        }
    }

    /// Removes and returns one staged record
    ///
    /// Non-blocking: returns `None` immediately when the buffer is empty and
    /// leaves the refill-or-back-off decision to the caller. The buffer lock
    /// is released before this method returns, never held across a visit.
    pub fn pop(&self) -> Option<LinkRecord> {
        self.links.lock().unwrap().pop()
    }

    /// Current buffer size
    pub fn count(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    /// Refills the buffer from the store
    ///
    /// Appends all currently-uncrawled records, then all records whose last
    /// visit is at or before `stale_cutoff`. Only called once the buffer is
    /// empty and every in-flight worker has completed.
    ///
    /// # Returns
    ///
    /// The buffer size after the refill.
    pub fn refresh(&self, stale_cutoff: DateTime<Utc>) -> StoreResult<usize> {
        let (uncrawled, stale) = {
            let mut store = self.store.lock().unwrap();
            (
                store.get_uncrawled(self.batch_limit)?,
                store.get_stale(stale_cutoff, self.batch_limit)?,
            )
        };

        let mut links = self.links.lock().unwrap();
        links.extend(uncrawled);
        links.extend(stale);
        Ok(links.len())
    }
}
