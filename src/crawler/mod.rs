//! Crawler module for web page fetching and coordination
//!
//! This module contains the core crawling machinery:
//! - HTTP fetching with failure classification
//! - HTML link extraction
//! - The staging buffer between store and workers
//! - Per-link visit execution
//! - The bounded worker pool and its dispatch cycle

mod extract;
mod http;
mod pool;
mod staging;
mod worker;

pub use extract::extract_links;
pub use http::{build_http_client, fetch_url, FetchErrorKind, FetchOutcome};
pub use pool::WorkerPool;
pub use staging::StagingBuffer;
pub use worker::PageWorker;

use crate::config::Config;
use crate::store::{LinkStore, SqliteLinkStore, SEED_SRC};
use crate::CrawlError;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Starts the standing crawl service
///
/// Opens the link store, seeds it with the configured base URL when empty,
/// creates the archive directory, and hands control to the worker pool. Only
/// returns on a startup failure; once running, the service is terminated by
/// process shutdown.
pub async fn crawl(config: Config) -> Result<(), CrawlError> {
    let config = Arc::new(config);

    archive_dir_setup(&config)?;

    let mut store = SqliteLinkStore::new(
        Path::new(&config.store.database_path),
        config.crawler.max_link_limit,
    )?;
    seed_if_empty(&mut store, &config)?;
    let store = Arc::new(Mutex::new(store));

    let client = build_http_client(&config.http)?;
    let buffer = Arc::new(StagingBuffer::new(
        store.clone(),
        config.store.fetch_batch_limit,
    ));
    let worker = PageWorker::new(config.clone(), client, store);
    let pool = WorkerPool::new(config, buffer, worker);

    pool.run().await;
    Ok(())
}

fn archive_dir_setup(config: &Config) -> Result<(), CrawlError> {
    let dir = Path::new(&config.archive.html_page_dir);
    crate::archive::ensure_archive_dir(dir)?;
    Ok(())
}

/// Inserts the configured base URL when the link table is empty, so a fresh
/// database has one frontier entry to start from
fn seed_if_empty(store: &mut SqliteLinkStore, config: &Config) -> Result<(), CrawlError> {
    if store.count()? == 0 {
        store.insert_new(&config.crawler.base_url, SEED_SRC)?;
        tracing::info!("seeded frontier with {}", config.crawler.base_url);
    }
    Ok(())
}
