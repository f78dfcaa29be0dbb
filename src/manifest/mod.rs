//! Append-only CSV manifest of visited pages and download outcomes
//!
//! The manifest is a log, not a snapshot: re-running the pipeline appends
//! a new block of rows and never touches prior content. The header row is
//! written only when the file is first created, and every row of one run
//! carries the same run timestamp so a run can be audited as a unit.

use crate::download::DownloadReport;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while recording the manifest
///
/// These are fatal to the run: there is no well-defined partial-success
/// mode when the audit trail itself cannot be written.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to open manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write manifest row: {0}")]
    Csv(#[from] csv::Error),
}

/// Row category: what kind of URL the row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A page that was crawled for links
    Page,
    /// A direct downloadable file
    File,
    /// A Google Drive share link
    Gdrive,
}

/// Row status: terminal outcome for the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Download succeeded (or was skipped as already present)
    Ok,
    /// Download failed after exhausting its strategy
    Fail,
    /// Page was visited during the crawl
    Visited,
}

/// One manifest row
#[derive(Debug, Clone, Serialize)]
pub struct ManifestRecord {
    pub timestamp: String,
    pub url: String,
    pub category: Category,
    pub status: Status,
    pub saved_path: String,
    pub bytes: Option<u64>,
    pub note: String,
}

impl ManifestRecord {
    /// Row for a page visited during the crawl
    pub fn visited(timestamp: &str, url: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            url: url.to_string(),
            category: Category::Page,
            status: Status::Visited,
            saved_path: String::new(),
            bytes: None,
            note: String::new(),
        }
    }

    /// Row for a terminal download outcome
    pub fn download(
        timestamp: &str,
        url: &str,
        category: Category,
        report: &DownloadReport,
    ) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            url: url.to_string(),
            category,
            status: if report.ok { Status::Ok } else { Status::Fail },
            saved_path: report.saved_path.clone(),
            bytes: Some(report.bytes),
            note: report.note.clone(),
        }
    }
}

/// Append-only writer for the manifest file
pub struct ManifestWriter {
    path: PathBuf,
}

impl ManifestWriter {
    /// Creates a writer for the manifest at the given path
    ///
    /// Nothing is opened until [`append`](Self::append) is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the manifest file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a block of rows, writing the header only on file creation
    ///
    /// Prior content is never rewritten or reordered.
    pub fn append(&self, records: &[ManifestRecord]) -> Result<(), ManifestError> {
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }
}
