//! Google Drive retrieval via the external gdown utility
//!
//! Share links on the Drive family of hosts sit behind interstitial
//! confirmation pages that a plain HTTP stream cannot traverse; the
//! gdown command-line tool handles them. The tool may be absent from the
//! runtime environment, so availability is probed once at startup and
//! checked before every dispatch — a missing tool is a per-URL hard
//! failure with its own note, never a retried network error.

use crate::download::DownloadReport;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Handle to the external gdown downloader
#[derive(Debug, Clone)]
pub struct GdownClient {
    command: String,
    available: bool,
}

impl GdownClient {
    /// Probes for the gdown command and records its availability
    ///
    /// The probe runs `<command> --version` and treats any spawn failure
    /// or non-zero exit as "not installed".
    ///
    /// # Arguments
    ///
    /// * `command` - Command name or path (configurable so tests can
    ///   substitute a stub)
    pub async fn detect(command: &str) -> Self {
        let available = Command::new(command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false);

        if available {
            tracing::debug!("gdown available as '{}'", command);
        } else {
            tracing::warn!(
                "gdown command '{}' not available; Google Drive downloads will fail",
                command
            );
        }

        Self {
            command: command.to_string(),
            available,
        }
    }

    /// Returns whether the gdown tool was found at startup
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Downloads a Google Drive share link into the target directory
    ///
    /// gdown runs with the target directory as its working directory so
    /// its own filename inference is preserved. The saved path is
    /// discovered by diffing the directory listing around the call; the
    /// reported size is measured on disk. There is no retry loop here —
    /// gdown manages its own retries, and a failed call is terminal.
    ///
    /// # Arguments
    ///
    /// * `url` - The share link
    /// * `target_dir` - Directory the file is saved into (must exist)
    pub async fn download(&self, url: &str, target_dir: &Path) -> DownloadReport {
        if !self.available {
            tracing::error!(
                "Cannot download {}: gdown command '{}' is not installed",
                url,
                self.command
            );
            return DownloadReport::failed("", "gdown unavailable");
        }

        tracing::info!("Downloading via gdown: {}", url);

        let before = list_entries(target_dir).await;

        let status = Command::new(&self.command)
            .arg(url)
            .current_dir(target_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Err(e) => {
                tracing::error!("Failed to launch gdown for {}: {}", url, e);
                DownloadReport::failed("", "gdown launch failed")
            }
            Ok(status) if !status.success() => {
                tracing::error!("gdown exited with {} for {}", status, url);
                DownloadReport::failed("", "gdown")
            }
            Ok(_) => {
                let after = list_entries(target_dir).await;
                match newest_addition(target_dir, &before, &after).await {
                    Some((path, bytes)) => {
                        let saved = path.display().to_string();
                        tracing::info!("gdown complete: {} ({} bytes)", saved, bytes);
                        DownloadReport {
                            ok: true,
                            saved_path: saved,
                            bytes,
                            note: "gdown".to_string(),
                        }
                    }
                    None => {
                        tracing::error!(
                            "gdown reported success for {} but produced no file",
                            url
                        );
                        DownloadReport::failed("", "gdown (no file produced)")
                    }
                }
            }
        }
    }
}

/// Lists the entry names of a directory, empty on error
async fn list_entries(dir: &Path) -> HashSet<OsString> {
    let mut names = HashSet::new();

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(e) => e,
        Err(_) => return names,
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        names.insert(entry.file_name());
    }

    names
}

/// Picks the largest file that appeared between the two listings
///
/// gdown may leave auxiliary files behind; the payload is taken to be
/// the largest new regular file. Returns its path and on-disk size.
async fn newest_addition(
    dir: &Path,
    before: &HashSet<OsString>,
    after: &HashSet<OsString>,
) -> Option<(PathBuf, u64)> {
    let mut best: Option<(PathBuf, u64)> = None;

    for name in after.difference(before) {
        let path = dir.join(name);
        let meta = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(_) => continue,
        };

        if !meta.is_file() {
            continue;
        }

        let size = meta.len();
        match &best {
            Some((_, current)) if *current >= size => {}
            _ => best = Some((path, size)),
        }
    }

    best
}
