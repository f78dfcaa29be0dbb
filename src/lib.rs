//! Harvestman: a crawl-then-fetch pipeline for public data resources
//!
//! This crate implements a breadth-first link crawler that discovers
//! downloadable data files on a seed page (and pages linked from it, up to a
//! bounded depth), then retrieves every discovered resource to local storage
//! while recording an append-only CSV manifest of what was fetched and how.

pub mod config;
pub mod crawler;
pub mod download;
pub mod manifest;
pub mod pipeline;
pub mod url;

use thiserror::Error;

/// Main error type for Harvestman operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Manifest error: {0}")]
    Manifest(#[from] manifest::ManifestError),

    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

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

/// Result type alias for Harvestman operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, CrawlSession};
pub use download::{DownloadReport, RetryPolicy};
pub use manifest::{Category, ManifestRecord, Status};
pub use crate::url::{classify_url, normalize_href, UrlClass};
