//! Page worker: one link's crawl step, end to end
//!
//! A worker fetches the page, registers newly discovered links, archives the
//! body, and writes the outcome back to the store. Fetch failures are fully
//! absorbed here as terminal record states; nothing propagates to the pool.

use crate::archive;
use crate::config::Config;
use crate::crawler::extract::extract_links;
use crate::crawler::http::{fetch_url, FetchErrorKind, FetchOutcome};
use crate::store::{InsertOutcome, LinkRecord, LinkStore, SqliteLinkStore};
use crate::url::resolve_link;
use reqwest::Client;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ::url::Url;

/// Pause after a connection-class failure, so a down host is not hammered by
/// the slot's next dispatch
const CONNECTION_BACKOFF: Duration = Duration::from_secs(1);

/// Executes fetch-parse-store tasks against staged links
///
/// Workers are stateless across visits; everything here is shared
/// configuration and shared handles, so the struct is cheap to clone into
/// each spawned task.
#[derive(Clone)]
pub struct PageWorker {
    config: Arc<Config>,
    client: Client,
    store: Arc<Mutex<SqliteLinkStore>>,
    limit_reached: Arc<AtomicBool>,
}

impl PageWorker {
    pub fn new(config: Arc<Config>, client: Client, store: Arc<Mutex<SqliteLinkStore>>) -> Self {
        Self {
            config,
            client,
            store,
            limit_reached: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Visits one staged link
    ///
    /// Side effects are strictly ordered: new links are registered before the
    /// record is marked visited, so a crash in between leaves the row
    /// uncrawled and the retry re-registers children idempotently.
    pub async fn visit(&self, record: LinkRecord) {
        tracing::debug!("visiting {}", record.link);

        match fetch_url(&self.client, &record.link).await {
            FetchOutcome::Failed(kind) => {
                let status = kind.synthetic_status();
                tracing::warn!(
                    "fetch failed for {}: {:?}, recording status {}",
                    record.link,
                    kind,
                    status
                );
                self.record_visit(record.id, status, None, None, None);

                if kind == FetchErrorKind::Connection {
                    tokio::time::sleep(CONNECTION_BACKOFF).await;
                }
            }

            FetchOutcome::Success { status, .. } if status != 200 => {
                tracing::debug!("{} answered {}", record.link, status);
                self.record_visit(record.id, status, None, None, None);
            }

            FetchOutcome::Success {
                final_url,
                status: _,
                content_type,
                content_len,
                body,
            } => {
                self.register_new_links(&body, &final_url);

                let file_path = match self.archive_body(&record, &body) {
                    Ok(path) => path,
                    Err(e) => {
                        // Leave the row uncrawled; the next refill retries it
                        tracing::error!("failed to archive {}: {}", record.link, e);
                        return;
                    }
                };

                self.record_visit(
                    record.id,
                    200,
                    content_type.as_deref(),
                    Some(content_len),
                    Some(&file_path),
                );
            }
        }
    }

    /// Extracts, resolves, and registers the page's links
    ///
    /// Stops at the first capacity rejection and latches the shared flag so
    /// later visits skip extraction entirely.
    fn register_new_links(&self, body: &str, final_url: &str) {
        if self.limit_reached.load(Ordering::Relaxed) {
            return;
        }

        let base = match Url::parse(final_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("unparseable final URL {}: {}", final_url, e);
                return;
            }
        };

        for href in extract_links(body) {
            let resolved = match resolve_link(&href, &base) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("rejected href on {}: {}", final_url, e);
                    continue;
                }
            };

            let outcome = {
                let mut store = self.store.lock().unwrap();
                store.insert_new(resolved.as_str(), final_url)
            };

            match outcome {
                Ok(InsertOutcome::Inserted) => {
                    tracing::debug!("discovered {}", resolved);
                }
                Ok(InsertOutcome::Duplicate) => {}
                Ok(InsertOutcome::LimitReached) => {
                    self.limit_reached.store(true, Ordering::Relaxed);
                    tracing::info!(
                        "maximum link limit of {} reached, discovery stopped",
                        self.config.crawler.max_link_limit
                    );
                    break;
                }
                Err(e) => {
                    tracing::error!("failed to register {}: {}", resolved, e);
                }
            }
        }
    }

    /// Writes the body to the archive, reusing the record's existing file on
    /// a re-visit so `file_path` stays stable
    fn archive_body(&self, record: &LinkRecord, body: &str) -> std::io::Result<String> {
        let dir = Path::new(&self.config.archive.html_page_dir);
        let existing = record
            .file_path
            .as_deref()
            .filter(|_| record.is_crawled)
            .map(Path::new);

        let path = archive::write_page(dir, body, existing)?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// Records a visit outcome, logging instead of propagating on failure:
    /// the store already replayed once, and the row stays uncrawled for the
    /// next refill
    fn record_visit(
        &self,
        id: i64,
        status: u16,
        content_type: Option<&str>,
        content_len: Option<i64>,
        file_path: Option<&str>,
    ) {
        let result = {
            let mut store = self.store.lock().unwrap();
            store.record_visit(id, status, content_type, content_len, file_path)
        };
        if let Err(e) = result {
            tracing::error!("failed to record visit for link {}: {}", id, e);
        }
    }
}
