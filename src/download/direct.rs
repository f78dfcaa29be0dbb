//! Streaming direct download with skip, retry, and partial-write safety
//!
//! Bytes are written to a `.part` temporary file as they arrive and the
//! file is renamed into place only after the stream completes, so the
//! skip rule can never mistake a truncated download for a finished one.

use crate::download::{DownloadReport, RetryPolicy};
use percent_encoding::percent_decode_str;
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Failure of a single download attempt
#[derive(Debug, Error)]
enum AttemptError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Derives a local filename from a URL
///
/// Takes the final path segment (percent-decoded; query string and
/// fragment never reach the path). When the path has no usable segment,
/// synthesizes a placeholder from the host and the current Unix time so
/// concurrent root-path downloads cannot collide on one name.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use harvestman::download::derive_filename;
///
/// let url = Url::parse("https://example.com/files/dams%20v1.zip?dl=1").unwrap();
/// assert_eq!(derive_filename(&url), "dams v1.zip");
/// ```
pub fn derive_filename(url: &Url) -> String {
    let path = url.path().trim_end_matches('/');
    let segment = path.rsplit('/').next().unwrap_or("");

    if !segment.is_empty() {
        return percent_decode_str(segment).decode_utf8_lossy().into_owned();
    }

    let host = match (url.host_str(), url.port()) {
        (Some(h), Some(p)) => format!("{}_{}", h, p),
        (Some(h), None) => h.to_string(),
        (None, _) => "unknown".to_string(),
    };

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    format!("download_{}_{}", host, now)
}

/// Downloads a direct file URL to the target directory
///
/// # Behavior
///
/// 1. Skip rule: a non-empty file already at the derived path is treated
///    as a completed download — no network call is issued.
/// 2. Otherwise a streaming GET writes chunks to `<name>.part`; on
///    completion the temp file is renamed into place and the byte count
///    is measured from disk (never from Content-Length).
/// 3. A failed attempt (network error, non-200, write error) sleeps
///    `attempt × backoff` and tries again, up to `policy.max_retries`
///    attempts; exhaustion yields `ok = false` with zero bytes.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to download
/// * `target_dir` - Directory the file is saved into (must exist)
/// * `policy` - Retry/backoff policy
pub async fn download_direct(
    client: &Client,
    url: &str,
    target_dir: &Path,
    policy: &RetryPolicy,
) -> DownloadReport {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(e) => {
            tracing::error!("Unparseable download URL {}: {}", url, e);
            return DownloadReport::failed("", "reqwest (bad url)");
        }
    };

    let filename = derive_filename(&parsed);
    let dest = target_dir.join(&filename);
    let dest_display = dest.display().to_string();

    // Skip rule: trust only non-empty files
    if let Ok(meta) = tokio::fs::metadata(&dest).await {
        if meta.is_file() && meta.len() > 0 {
            tracing::info!("Already present and non-empty, skipping: {}", dest_display);
            return DownloadReport {
                ok: true,
                saved_path: dest_display,
                bytes: meta.len(),
                note: "reqwest (already present)".to_string(),
            };
        }
    }

    tracing::info!("Downloading: {}", url);
    let part = target_dir.join(format!("{}.part", filename));

    for attempt in 1..=policy.max_retries {
        match stream_to_file(client, url, &part).await {
            Ok(written) => match finalize(&part, &dest).await {
                Ok(bytes) => {
                    tracing::info!(
                        "Download complete: {} ({} bytes)",
                        dest_display,
                        bytes
                    );
                    debug_assert_eq!(written, bytes);
                    return DownloadReport {
                        ok: true,
                        saved_path: dest_display,
                        bytes,
                        note: "reqwest".to_string(),
                    };
                }
                Err(e) => {
                    tracing::warn!("Attempt {} failed for {}: {}", attempt, url, e);
                }
            },
            Err(e) => {
                tracing::warn!("Attempt {} failed for {}: {}", attempt, url, e);
            }
        }

        if attempt < policy.max_retries {
            tokio::time::sleep(policy.backoff * attempt).await;
        }
    }

    tracing::error!(
        "Giving up on {} after {} attempts",
        url,
        policy.max_retries
    );
    DownloadReport::failed(dest_display, "reqwest")
}

/// Streams the response body into the temporary file
///
/// Chunks are written incrementally, bounding memory for arbitrarily
/// large files. Returns the number of bytes written.
async fn stream_to_file(client: &Client, url: &str, part: &Path) -> Result<u64, AttemptError> {
    let mut response = client.get(url).send().await?;

    if response.status() != StatusCode::OK {
        return Err(AttemptError::Status(response.status().as_u16()));
    }

    let mut file = tokio::fs::File::create(part).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

/// Renames the completed temp file into place and measures it on disk
async fn finalize(part: &Path, dest: &Path) -> Result<u64, std::io::Error> {
    tokio::fs::rename(part, dest).await?;
    let meta = tokio::fs::metadata(dest).await?;
    Ok(meta.len())
}
