//! Pagehoard: a polite, resumable archiving crawler
//!
//! This crate implements a standing crawl service: seeded with one URL, it
//! discovers, fetches, and archives reachable pages, persists the link graph
//! in SQLite, and periodically re-visits stale pages.

pub mod archive;
pub mod config;
pub mod crawler;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for pagehoard operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL has no recognized scheme: {0}")]
    MissingScheme(String),

    #[error("URL has no dotted domain: {0}")]
    MissingDomain(String),
}

/// Result type alias for pagehoard operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::store::{InsertOutcome, LinkRecord, LinkStore, SqliteLinkStore};
pub use crate::url::{accept_link, resolve_link};
