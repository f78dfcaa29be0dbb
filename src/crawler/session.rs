//! Crawl session - breadth-first traversal state and main crawl loop
//!
//! A [`CrawlSession`] owns all crawl state for one run: the FIFO frontier,
//! the visited set, and the three accumulating result sets. The session is
//! constructed with an injected HTTP client so tests can point it at a
//! mock server.

use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use crate::crawler::parser::extract_hrefs;
use crate::url::{classify_url, dedupe_urls, normalize_href, UrlClass};
use reqwest::Client;
use std::collections::{BTreeSet, HashSet, VecDeque};
use url::Url;

/// A page pending visitation
#[derive(Debug, Clone)]
struct FrontierEntry {
    /// The page URL
    url: Url,

    /// Number of page hops from the seed that discovered it
    depth: u32,
}

/// The three disjoint URL sets produced by a finished crawl
///
/// Each list is sorted and deduplicated, so two runs against an unchanged
/// site process downloads in identical order.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// Direct downloadable files, recognized by path suffix
    pub direct_files: Vec<String>,

    /// Google Drive share links, retrieved via gdown
    pub gdrive_files: Vec<String>,

    /// URLs that were fetched and parsed as markup
    pub pages: Vec<String>,
}

/// Breadth-first crawl over pages reachable from the seed URLs
///
/// State machine per URL: dequeued entries are fetched once; a markup
/// response expands child links, a resource response classifies the
/// visited URL itself, and any fetch failure drops the URL from the
/// traversal. The crawl terminates when the frontier drains.
pub struct CrawlSession {
    client: Client,
    frontier: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    direct_files: BTreeSet<String>,
    gdrive_files: BTreeSet<String>,
    pages: BTreeSet<String>,
    max_depth: u32,
}

impl CrawlSession {
    /// Creates a new session with all seeds enqueued at depth 0
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for every page fetch
    /// * `seeds` - Absolute seed URLs
    /// * `max_depth` - Page-hop budget; files are collected at any depth
    pub fn new(client: Client, seeds: Vec<Url>, max_depth: u32) -> Self {
        let frontier = seeds
            .into_iter()
            .map(|url| FrontierEntry { url, depth: 0 })
            .collect();

        Self {
            client,
            frontier,
            visited: HashSet::new(),
            direct_files: BTreeSet::new(),
            gdrive_files: BTreeSet::new(),
            pages: BTreeSet::new(),
            max_depth,
        }
    }

    /// Runs the crawl to completion and returns the classified URL sets
    ///
    /// Entries are processed in strict FIFO order, so all of depth `d` is
    /// drained before depth `d + 1` begins. A URL referenced from several
    /// pages is fetched at most once; later references are skipped at
    /// dequeue time.
    pub async fn run(mut self) -> CrawlOutcome {
        while let Some(entry) = self.frontier.pop_front() {
            let url_str = entry.url.as_str().to_string();

            if !self.visited.insert(url_str.clone()) {
                continue;
            }

            tracing::info!("Visiting page [depth {}]: {}", entry.depth, url_str);

            match fetch_page(&self.client, entry.url.as_str()).await {
                FetchOutcome::Network { error } => {
                    tracing::warn!("Fetch failed, dropping {}: {}", url_str, error);
                }

                FetchOutcome::HttpStatus { status_code } => {
                    tracing::warn!("HTTP {} for {}, dropping", status_code, url_str);
                }

                FetchOutcome::ResourceContent { content_type } => {
                    // The dequeued URL is itself a resource, not a page
                    tracing::debug!(
                        "Resource content ({}) at {}, classifying directly",
                        content_type,
                        url_str
                    );
                    match classify_url(&entry.url) {
                        UrlClass::Gdrive => {
                            self.gdrive_files.insert(url_str);
                        }
                        _ => {
                            self.direct_files.insert(url_str);
                        }
                    }
                }

                FetchOutcome::Page { body, .. } => {
                    self.pages.insert(url_str);
                    self.collect_child_links(&entry.url, entry.depth, &body);
                }
            }
        }

        tracing::info!(
            "Crawl complete: {} pages, {} direct files, {} gdrive links",
            self.pages.len(),
            self.direct_files.len(),
            self.gdrive_files.len()
        );

        CrawlOutcome {
            direct_files: self.direct_files.into_iter().collect(),
            gdrive_files: self.gdrive_files.into_iter().collect(),
            pages: self.pages.into_iter().collect(),
        }
    }

    /// Classifies the child links of a fetched page
    ///
    /// File and gdrive links are collected regardless of depth; page
    /// links are enqueued only while `depth < max_depth`. Links dropped
    /// by the depth budget are logged at debug level.
    fn collect_child_links(&mut self, base: &Url, depth: u32, body: &str) {
        let candidates = dedupe_urls(
            extract_hrefs(body)
                .iter()
                .filter_map(|href| normalize_href(base, href))
                .map(String::from),
        );

        for child_str in candidates {
            let child = match Url::parse(&child_str) {
                Ok(u) => u,
                Err(_) => continue,
            };

            match classify_url(&child) {
                UrlClass::Gdrive => {
                    self.gdrive_files.insert(child_str);
                }
                UrlClass::DataFile => {
                    self.direct_files.insert(child_str);
                }
                UrlClass::Page => {
                    if depth < self.max_depth {
                        self.frontier.push_back(FrontierEntry {
                            url: child,
                            depth: depth + 1,
                        });
                    } else {
                        tracing::debug!(
                            "Depth budget exhausted at depth {}, dropping {}",
                            depth,
                            child_str
                        );
                    }
                }
            }
        }
    }
}
