//! Worker pool: bounded dispatch over the staging buffer
//!
//! The pool owns a fixed number of concurrent visit slots and runs an
//! explicit cycle: dispatch staged links onto free slots, wait while
//! saturated, drain all in-flight visits once the buffer is empty, then
//! refill it. Draining fully before a refill is what keeps a link from being
//! re-staged while a visit for it is still in flight.

use crate::config::Config;
use crate::crawler::staging::StagingBuffer;
use crate::crawler::worker::PageWorker;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Coordinates visit tasks across a fixed set of worker slots
pub struct WorkerPool {
    config: Arc<Config>,
    buffer: Arc<StagingBuffer>,
    worker: PageWorker,
    slots: Arc<Semaphore>,
}

impl WorkerPool {
    pub fn new(config: Arc<Config>, buffer: Arc<StagingBuffer>, worker: PageWorker) -> Self {
        let slots = Arc::new(Semaphore::new(
            config.crawler.parallel_thread_count as usize,
        ));
        Self {
            config,
            buffer,
            worker,
            slots,
        }
    }

    /// Runs the standing service
    ///
    /// There is no terminal condition; the pool loops until the process is
    /// stopped. When a full cycle stages nothing, the frontier is exhausted
    /// and the pool idles for the configured interval before trying again.
    pub async fn run(&self) {
        tracing::info!(
            "worker pool started with {} slots",
            self.config.crawler.parallel_thread_count
        );

        loop {
            let staged = self.cycle().await;
            if staged == 0 {
                tracing::info!(
                    "all links crawled, idling for {}s",
                    self.config.crawler.sleep_interval
                );
                tokio::time::sleep(Duration::from_secs(self.config.crawler.sleep_interval)).await;
            }
        }
    }

    /// One dispatch-drain-refill pass
    ///
    /// Dispatches until the buffer is empty (acquiring a slot parks the loop
    /// while all slots are busy), joins every in-flight visit, then refreshes
    /// the buffer from the store.
    ///
    /// # Returns
    ///
    /// The number of links staged by the refill.
    pub async fn cycle(&self) -> usize {
        let mut in_flight = JoinSet::new();

        while let Some(record) = self.buffer.pop() {
            let permit = self
                .slots
                .clone()
                .acquire_owned()
                .await
                .expect("worker slot semaphore closed");
            let worker = self.worker.clone();

            in_flight.spawn(async move {
                worker.visit(record).await;
                drop(permit);
            });

            // Completed tasks are reaped as we go so the set stays small
            while in_flight.try_join_next().is_some() {}
        }

        // Drain: every popped link must finish before the buffer is refilled
        while in_flight.join_next().await.is_some() {}

        let cutoff = Utc::now()
            - ChronoDuration::hours(self.config.crawler.link_refresh_after_hours as i64);
        match self.buffer.refresh(cutoff) {
            Ok(staged) => {
                if staged > 0 {
                    tracing::debug!("staged {} links for dispatch", staged);
                }
                staged
            }
            Err(e) => {
                tracing::error!("frontier refresh failed: {}", e);
                0
            }
        }
    }
}
