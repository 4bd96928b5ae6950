use serde::Deserialize;

/// Main configuration structure for pagehoard
///
/// Built once at startup and passed by `Arc` to every component.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub store: StoreConfig,
    pub archive: ArchiveConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL inserted when the link table is empty
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of concurrent worker slots
    #[serde(rename = "parallel-thread-count")]
    pub parallel_thread_count: u32,

    /// Idle sleep between refill attempts when the frontier is drained (seconds)
    #[serde(rename = "sleep-interval")]
    pub sleep_interval: u64,

    /// Maximum total distinct links the crawler will ever register
    #[serde(rename = "max-link-limit")]
    pub max_link_limit: u64,

    /// A crawled link becomes stale this many hours after its last visit
    #[serde(rename = "link-refresh-after-hours")]
    pub link_refresh_after_hours: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Link store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Maximum rows pulled from the store per frontier read
    #[serde(rename = "fetch-batch-limit", default = "default_fetch_batch_limit")]
    pub fetch_batch_limit: u64,
}

/// Page archive configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Directory where fetched page bodies are written
    #[serde(rename = "html-page-dir")]
    pub html_page_dir: String,
}

fn default_user_agent() -> String {
    format!("pagehoard/{}", env!("CARGO_PKG_VERSION"))
}

fn default_fetch_batch_limit() -> u64 {
    500
}
