//! HTTP fetch primitive
//!
//! This module builds the shared reqwest client and performs single-page
//! fetches, classifying every failure into the crawler's error taxonomy.
//! Compression is disabled so the recorded content length reflects the
//! transferred byte count rather than a decompressed estimate.

use crate::config::HttpConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops before a fetch is abandoned
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server answered; any status code
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status: u16,
        /// Content-Type header value, if present
        content_type: Option<String>,
        /// Transferred byte count: Content-Length header, or body length
        content_len: i64,
        /// Page body
        body: String,
    },

    /// No response was obtained
    Failed(FetchErrorKind),
}

/// Classified fetch failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The URL carries no scheme at all
    MissingScheme,
    /// The URL scheme is not http or https
    InvalidScheme,
    /// Connection refused, reset, or host unreachable
    Connection,
    /// Redirect chain exceeded the hop limit
    TooManyRedirects,
    /// The request timed out
    Timeout,
}

impl FetchErrorKind {
    /// Status recorded on the link row when no real HTTP status exists
    ///
    /// Scheme problems are permanently invalid (404 class), network faults
    /// are upstream failures (502 class), and timeouts get 408.
    pub fn synthetic_status(&self) -> u16 {
        match self {
            Self::MissingScheme | Self::InvalidScheme => 404,
            Self::Connection | Self::TooManyRedirects => 502,
            Self::Timeout => 408,
        }
    }
}

/// Builds the HTTP client shared by all workers
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .build()
}

/// Fetches one page
///
/// Scheme problems are caught before any request goes out; transport errors
/// from the client are mapped onto the taxonomy. The caller never sees an
/// error value, only a classified outcome.
pub async fn fetch_url(client: &Client, link: &str) -> FetchOutcome {
    match scheme_of(link) {
        Scheme::Http => {}
        Scheme::Missing => return FetchOutcome::Failed(FetchErrorKind::MissingScheme),
        Scheme::Other => return FetchOutcome::Failed(FetchErrorKind::InvalidScheme),
    }

    let response = match client.get(link).send().await {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Failed(classify_error(&e)),
    };

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let header_len: Option<i64> = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok());

    match response.text().await {
        Ok(body) => {
            let content_len = header_len.unwrap_or(body.len() as i64);
            FetchOutcome::Success {
                final_url,
                status,
                content_type,
                content_len,
                body,
            }
        }
        Err(e) => FetchOutcome::Failed(classify_error(&e)),
    }
}

enum Scheme {
    Http,
    Missing,
    Other,
}

fn scheme_of(link: &str) -> Scheme {
    if link.starts_with("http://") || link.starts_with("https://") {
        Scheme::Http
    } else if link.contains("://") || link.split(':').next().map_or(false, |s| {
        !s.is_empty() && s.len() < link.len() && s.chars().all(|c| c.is_ascii_alphabetic())
    }) {
        Scheme::Other
    } else {
        Scheme::Missing
    }
}

fn classify_error(e: &reqwest::Error) -> FetchErrorKind {
    if e.is_timeout() {
        FetchErrorKind::Timeout
    } else if e.is_redirect() {
        FetchErrorKind::TooManyRedirects
    } else {
        FetchErrorKind::Connection
    }
}
