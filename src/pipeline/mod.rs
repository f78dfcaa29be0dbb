//! End-to-end run orchestration
//!
//! Wires the crawl session, the two download strategies, and the
//! manifest recorder into one sequential run: seed → crawl → download
//! everything discovered → append one block of manifest rows. Per-URL
//! failures are contained and recorded; only environment-level failures
//! (directories, manifest) abort the run.

use crate::config::Config;
use crate::crawler::{build_http_client, CrawlSession};
use crate::download::{download_direct, GdownClient, RetryPolicy};
use crate::manifest::{Category, ManifestRecord, ManifestWriter};
use crate::{HarvestError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Name of the manifest file under the output root
const MANIFEST_FILENAME: &str = "manifest.csv";

/// Subdirectory for downloaded files
const RAW_SUBDIR: &str = "raw";

/// Counts summarizing one completed run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Pages visited during the crawl
    pub pages: usize,

    /// Direct files downloaded (or skipped as present)
    pub direct_ok: usize,

    /// Direct files that failed after exhausting retries
    pub direct_failed: usize,

    /// Google Drive links downloaded
    pub gdrive_ok: usize,

    /// Google Drive links that failed
    pub gdrive_failed: usize,
}

impl RunSummary {
    /// Total manifest rows produced by the run
    pub fn manifest_rows(&self) -> usize {
        self.pages + self.direct_ok + self.direct_failed + self.gdrive_ok + self.gdrive_failed
    }
}

/// Runs the full pipeline for one configuration
///
/// The run always attempts every discovered URL and always appends a
/// manifest block reflecting exactly what was attempted, even if every
/// individual download fails.
///
/// # Arguments
///
/// * `config` - Validated run configuration
///
/// # Returns
///
/// * `Ok(RunSummary)` - Counts of what was visited and fetched
/// * `Err(HarvestError)` - Environment-level failure (directories,
///   manifest persistence, seed parsing)
pub async fn run(config: &Config) -> Result<RunSummary> {
    let root = PathBuf::from(&config.output.root_dir);
    let raw_dir = root.join(RAW_SUBDIR);
    ensure_dir(&root)?;
    ensure_dir(&raw_dir)?;

    let client = build_http_client(Duration::from_secs(config.crawl.timeout_secs))?;

    let seeds = config
        .crawl
        .seeds
        .iter()
        .map(|s| Url::parse(s))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    tracing::info!(
        "Starting crawl: {} seed(s), max depth {}",
        seeds.len(),
        config.crawl.max_depth
    );

    let session = CrawlSession::new(client.clone(), seeds, config.crawl.max_depth);
    let outcome = session.run().await;

    // One timestamp for every row of this run
    let run_timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();

    let mut summary = RunSummary {
        pages: outcome.pages.len(),
        ..Default::default()
    };

    let mut records: Vec<ManifestRecord> = outcome
        .pages
        .iter()
        .map(|page| ManifestRecord::visited(&run_timestamp, page))
        .collect();

    let policy = RetryPolicy::from_config(&config.download);
    for url in &outcome.direct_files {
        let report = download_direct(&client, url, &raw_dir, &policy).await;
        if report.ok {
            summary.direct_ok += 1;
        } else {
            summary.direct_failed += 1;
        }
        records.push(ManifestRecord::download(
            &run_timestamp,
            url,
            Category::File,
            &report,
        ));
    }

    let gdown = GdownClient::detect(&config.download.gdown_command).await;
    for url in &outcome.gdrive_files {
        let report = gdown.download(url, &raw_dir).await;
        if report.ok {
            summary.gdrive_ok += 1;
        } else {
            summary.gdrive_failed += 1;
        }
        records.push(ManifestRecord::download(
            &run_timestamp,
            url,
            Category::Gdrive,
            &report,
        ));
    }

    let manifest = ManifestWriter::new(root.join(MANIFEST_FILENAME));
    manifest.append(&records)?;

    tracing::info!(
        "Run complete: {} pages, {} direct ok, {} direct failed, {} gdrive ok, {} gdrive failed | manifest: {}",
        summary.pages,
        summary.direct_ok,
        summary.direct_failed,
        summary.gdrive_ok,
        summary.gdrive_failed,
        manifest.path().display()
    );

    Ok(summary)
}

/// Creates a directory (and parents), mapping failure to a fatal error
fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| HarvestError::CreateDir {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_row_count() {
        let summary = RunSummary {
            pages: 2,
            direct_ok: 3,
            direct_failed: 1,
            gdrive_ok: 0,
            gdrive_failed: 1,
        };
        assert_eq!(summary.manifest_rows(), 7);
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
