//! Download engine for discovered resources
//!
//! Two retrieval strategies share one outer contract: every call yields
//! exactly one [`DownloadReport`], whether the resource was fetched,
//! skipped as already present, or given up on after exhausting retries.
//! No partial or in-progress state is ever surfaced to the manifest.

mod direct;
mod gdrive;

use std::time::Duration;

pub use direct::{derive_filename, download_direct};
pub use gdrive::GdownClient;

/// Terminal outcome of one download call
#[derive(Debug, Clone)]
pub struct DownloadReport {
    /// Whether the resource ended up on disk (including skip-as-present)
    pub ok: bool,

    /// Where the file was (or would have been) saved
    pub saved_path: String,

    /// Size of the file on disk; 0 on failure
    pub bytes: u64,

    /// Free-text note naming the retrieval strategy and any distinction
    /// worth auditing ("reqwest", "gdown unavailable", ...)
    pub note: String,
}

impl DownloadReport {
    /// A failure report with no file on disk
    pub fn failed(saved_path: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            ok: false,
            saved_path: saved_path.into(),
            bytes: 0,
            note: note.into(),
        }
    }
}

/// Retry behavior for direct downloads
///
/// Attempt `n` (1-based) is followed by a sleep of `n × backoff` before
/// the next attempt; the final attempt's failure is terminal.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts
    pub max_retries: u32,

    /// Base backoff delay; scaled linearly by the attempt number
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Builds the policy from the download configuration section
    pub fn from_config(config: &crate::config::DownloadConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.retry_backoff_millis),
        }
    }
}
