//! End-to-end tests for the crawler
//!
//! These tests use wiremock to stand up mock HTTP servers and drive the
//! staging buffer, workers, and pool against a real on-disk store.

use chrono::{Duration, Utc};
use pagehoard::config::{ArchiveConfig, Config, CrawlerConfig, HttpConfig, StoreConfig};
use pagehoard::crawler::{build_http_client, PageWorker, StagingBuffer, WorkerPool};
use pagehoard::store::{InsertOutcome, LinkStore, SqliteLinkStore, SEED_SRC};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at scratch paths
fn create_test_config(base_url: &str, dir: &TempDir, max_links: u64) -> Config {
    Config {
        crawler: CrawlerConfig {
            base_url: base_url.to_string(),
            parallel_thread_count: 3,
            sleep_interval: 1,
            max_link_limit: max_links,
            link_refresh_after_hours: 24,
        },
        http: HttpConfig {
            request_timeout: 5,
            user_agent: "pagehoard-test/0".to_string(),
        },
        store: StoreConfig {
            database_path: dir
                .path()
                .join("crawl.db")
                .to_string_lossy()
                .into_owned(),
            fetch_batch_limit: 100,
        },
        archive: ArchiveConfig {
            html_page_dir: dir.path().join("pages").to_string_lossy().into_owned(),
        },
    }
}

struct TestRig {
    config: Arc<Config>,
    store: Arc<Mutex<SqliteLinkStore>>,
    buffer: Arc<StagingBuffer>,
    worker: PageWorker,
}

fn assemble(config: Config) -> TestRig {
    let config = Arc::new(config);
    std::fs::create_dir_all(&config.archive.html_page_dir).unwrap();

    let store = SqliteLinkStore::new(
        Path::new(&config.store.database_path),
        config.crawler.max_link_limit,
    )
    .unwrap();
    let store = Arc::new(Mutex::new(store));

    let client = build_http_client(&config.http).unwrap();
    let buffer = Arc::new(StagingBuffer::new(
        store.clone(),
        config.store.fetch_batch_limit,
    ));
    let worker = PageWorker::new(config.clone(), client, store.clone());

    TestRig {
        config,
        store,
        buffer,
        worker,
    }
}

fn stale_cutoff(config: &Config) -> chrono::DateTime<Utc> {
    Utc::now() - Duration::hours(config.crawler.link_refresh_after_hours as i64)
}

#[tokio::test]
async fn test_seed_page_discovery_respects_cap() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // Seed page with two crawlable hrefs and one invalid one
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                format!(
                    r#"<html><body>
                    <a href="/a">A</a>
                    <a href="{}/b">B</a>
                    <a href="javascript:void(0)">C</a>
                    </body></html>"#,
                    base
                ),
                "text/html",
            ),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let rig = assemble(create_test_config(&base, &dir, 3));

    // Seed and visit it
    {
        let mut store = rig.store.lock().unwrap();
        assert_eq!(
            store.insert_new(&rig.config.crawler.base_url, SEED_SRC).unwrap(),
            InsertOutcome::Inserted
        );
    }
    rig.buffer.refresh(stale_cutoff(&rig.config)).unwrap();
    let seed = rig.buffer.pop().unwrap();
    let seed_id = seed.id;
    rig.worker.visit(seed).await;

    let mut store = rig.store.lock().unwrap();

    // Two new rows were registered, the javascript: href was rejected
    assert_eq!(store.count().unwrap(), 3);
    let uncrawled = store.get_uncrawled(10).unwrap();
    let links: Vec<_> = uncrawled.iter().map(|r| r.link.clone()).collect();
    assert!(links.contains(&format!("{}/a", base)));
    assert!(links.contains(&format!("{}/b", base)));

    // The cap is now met, so further discoveries are rejected
    assert_eq!(
        store.insert_new(&format!("{}/z", base), &base).unwrap(),
        InsertOutcome::LimitReached
    );

    // The seed row itself was archived and marked visited
    let seed_row = store.get_link(seed_id).unwrap().unwrap();
    assert!(seed_row.is_crawled);
    assert_eq!(seed_row.response_status, Some(200));
    assert!(seed_row.content_type.as_deref().unwrap().contains("text/html"));
    assert!(seed_row.content_len.unwrap() > 0);
    let archived = seed_row.file_path.unwrap();
    assert!(Path::new(&archived).exists());
}

#[tokio::test]
async fn test_connection_failure_recorded_as_502() {
    let dir = TempDir::new().unwrap();
    // Port 1 on localhost is not listening
    let rig = assemble(create_test_config("http://127.0.0.1:1/", &dir, 10));

    {
        let mut store = rig.store.lock().unwrap();
        store.insert_new("http://127.0.0.1:1/", SEED_SRC).unwrap();
    }
    rig.buffer.refresh(stale_cutoff(&rig.config)).unwrap();
    let record = rig.buffer.pop().unwrap();
    let id = record.id;
    rig.worker.visit(record).await;

    let mut store = rig.store.lock().unwrap();
    let row = store.get_link(id).unwrap().unwrap();
    assert!(row.is_crawled);
    assert_eq!(row.response_status, Some(502));
    assert_eq!(row.file_path, None);
    assert_eq!(row.content_type, None);
    assert_eq!(row.content_len, None);
}

#[tokio::test]
async fn test_non_200_records_status_without_body_fields() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let rig = assemble(create_test_config(&base, &dir, 10));

    {
        let mut store = rig.store.lock().unwrap();
        store
            .insert_new(&format!("{}/gone", base), SEED_SRC)
            .unwrap();
    }
    rig.buffer.refresh(stale_cutoff(&rig.config)).unwrap();
    let record = rig.buffer.pop().unwrap();
    let id = record.id;
    rig.worker.visit(record).await;

    let mut store = rig.store.lock().unwrap();
    let row = store.get_link(id).unwrap().unwrap();
    assert!(row.is_crawled);
    assert_eq!(row.response_status, Some(404));
    assert_eq!(row.file_path, None);
    assert_eq!(row.content_len, None);
}

#[tokio::test]
async fn test_stale_record_staged_and_popped_exactly_once() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>no links</body></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let rig = assemble(create_test_config(&base, &dir, 10));

    {
        let mut store = rig.store.lock().unwrap();
        store.insert_new(&base, SEED_SRC).unwrap();
    }
    rig.buffer.refresh(stale_cutoff(&rig.config)).unwrap();
    let record = rig.buffer.pop().unwrap();
    let id = record.id;
    rig.worker.visit(record).await;

    // Freshly visited: not stale, refresh stages nothing
    assert_eq!(rig.buffer.refresh(stale_cutoff(&rig.config)).unwrap(), 0);

    // Backdate the visit past the refresh interval
    let backdated = (Utc::now() - Duration::hours(48)).to_rfc3339();
    let conn = rusqlite::Connection::open(&rig.config.store.database_path).unwrap();
    conn.execute(
        "UPDATE links SET last_crawl_dt = ?1 WHERE id = ?2",
        rusqlite::params![backdated, id],
    )
    .unwrap();

    // The record is now due: staged once, popped once
    assert_eq!(rig.buffer.refresh(stale_cutoff(&rig.config)).unwrap(), 1);
    let staged = rig.buffer.pop().unwrap();
    assert_eq!(staged.id, id);
    assert!(staged.is_crawled);
    assert!(rig.buffer.pop().is_none());
}

#[tokio::test]
async fn test_revisit_reuses_archive_file() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>v2</body></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let rig = assemble(create_test_config(&base, &dir, 10));

    {
        let mut store = rig.store.lock().unwrap();
        store.insert_new(&base, SEED_SRC).unwrap();
    }
    rig.buffer.refresh(stale_cutoff(&rig.config)).unwrap();
    let record = rig.buffer.pop().unwrap();
    let id = record.id;
    rig.worker.visit(record).await;

    let first_path = rig
        .store
        .lock()
        .unwrap()
        .get_link(id)
        .unwrap()
        .unwrap()
        .file_path
        .unwrap();

    // Re-visit the now-crawled record directly
    let revisit = rig.store.lock().unwrap().get_link(id).unwrap().unwrap();
    rig.worker.visit(revisit).await;

    let second_path = rig
        .store
        .lock()
        .unwrap()
        .get_link(id)
        .unwrap()
        .unwrap()
        .file_path
        .unwrap();
    assert_eq!(first_path, second_path);
    assert_eq!(
        std::fs::read_to_string(&second_path).unwrap(),
        "<html><body>v2</body></html>"
    );
}

#[tokio::test]
async fn test_pool_crawls_frontier_to_exhaustion() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/a">A</a><a href="/b">B</a></body></html>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;
    for leaf in ["/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(leaf))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>leaf</body></html>")
                    .insert_header("content-type", "text/html"),
            )
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let rig = assemble(create_test_config(&base, &dir, 10));
    {
        let mut store = rig.store.lock().unwrap();
        store.insert_new(&base, SEED_SRC).unwrap();
    }

    let pool = WorkerPool::new(rig.config.clone(), rig.buffer.clone(), rig.worker.clone());

    // Cycle 1 stages the seed, cycle 2 visits it and stages its children,
    // cycle 3 visits the children and finds nothing left to stage
    assert_eq!(pool.cycle().await, 1);
    assert_eq!(pool.cycle().await, 2);
    assert_eq!(pool.cycle().await, 0);

    let mut store = rig.store.lock().unwrap();
    assert_eq!(store.count().unwrap(), 3);
    assert!(store.get_uncrawled(10).unwrap().is_empty());
}

#[tokio::test]
async fn test_discovery_cap_holds_under_concurrent_inserts() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("crawl.db");
    let store = Arc::new(Mutex::new(SqliteLinkStore::new(&db_path, 5).unwrap()));

    let mut handles = Vec::new();
    for t in 0..8 {
        let store = store.clone();
        handles.push(std::thread::spawn(move || {
            for i in 0..10 {
                let link = format!("https://example.com/{}/{}", t, i);
                store.lock().unwrap().insert_new(&link, "NA").unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.lock().unwrap().count().unwrap(), 5);
}
