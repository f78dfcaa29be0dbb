//! Crawler module for page fetching and link discovery
//!
//! This module contains the discovery half of the pipeline:
//! - HTTP fetching with outcome classification
//! - Link extraction from fetched markup
//! - The breadth-first crawl session

mod fetcher;
mod parser;
mod session;

pub use fetcher::{build_http_client, fetch_page, is_markup_content_type, FetchOutcome};
pub use parser::extract_hrefs;
pub use session::{CrawlOutcome, CrawlSession};
