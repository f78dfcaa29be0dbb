//! HTTP fetcher implementation
//!
//! This module handles page fetches for the crawl phase, including:
//! - Building the HTTP client with a fixed descriptive user agent
//! - GET requests with redirect following and per-client timeout
//! - Content-Type inspection (markup vs. resource)
//! - Error classification into a fetch outcome enum

use reqwest::{header, redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// User agent sent with every request
const USER_AGENT: &str = concat!("harvestman/", env!("CARGO_PKG_VERSION"));

/// Accept header advertising a preference for markup
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Maximum redirect hops before a fetch is abandoned
const MAX_REDIRECTS: usize = 10;

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// Markup page fetched successfully
    Page {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body
        body: String,
    },

    /// The response is a resource, not a page (non-markup Content-Type);
    /// the body was not read
    ResourceContent {
        /// The Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status
    HttpStatus {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network-level failure (connection refused, timeout, TLS error)
    Network {
        /// Error description
        error: String,
    },
}

/// Builds the HTTP client used for both crawling and direct downloads
///
/// The client follows redirects (bounded), negotiates gzip/brotli, and
/// applies the configured timeout to every request it issues.
///
/// # Arguments
///
/// * `timeout` - Per-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if a Content-Type value describes parseable markup
///
/// Anything that is neither HTML nor XML is treated as a resource the
/// crawler stumbled onto directly (e.g. a seed that is itself a file).
pub fn is_markup_content_type(content_type: &str) -> bool {
    let ct = content_type.to_lowercase();
    ct.contains("text/html") || ct.contains("xml")
}

/// Fetches a single page during the crawl phase
///
/// Discovery fetches are single-shot: a failure here drops the URL from
/// the traversal. Retry with backoff belongs to the download engine, not
/// to discovery.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// A [`FetchOutcome`] describing the page, resource, or failure
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            let error = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                "connection failed".to_string()
            } else {
                e.to_string()
            };
            return FetchOutcome::Network { error };
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchOutcome::HttpStatus {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_markup_content_type(&content_type) {
        return FetchOutcome::ResourceContent { content_type };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Page {
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => FetchOutcome::Network {
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[test]
    fn test_markup_content_types() {
        assert!(is_markup_content_type("text/html"));
        assert!(is_markup_content_type("text/html; charset=utf-8"));
        assert!(is_markup_content_type("application/xhtml+xml"));
        assert!(is_markup_content_type("application/xml"));
        assert!(is_markup_content_type("TEXT/HTML"));
    }

    #[test]
    fn test_resource_content_types() {
        assert!(!is_markup_content_type("application/zip"));
        assert!(!is_markup_content_type("application/octet-stream"));
        assert!(!is_markup_content_type("text/csv"));
        assert!(!is_markup_content_type(""));
    }
}
