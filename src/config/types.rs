use serde::Deserialize;

/// Main configuration structure for Harvestman
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Seed URLs to start crawling from
    pub seeds: Vec<String>,

    /// Maximum number of page hops from a seed before child page links
    /// stop being enqueued (file links are collected at any depth)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Request timeout in seconds, applied to every network call
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Download behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Maximum attempts per direct download before giving up
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay between attempts; attempt N waits N times this
    #[serde(rename = "retry-backoff-millis", default = "default_backoff_millis")]
    pub retry_backoff_millis: u64,

    /// Command used for Google Drive downloads
    #[serde(rename = "gdown-command", default = "default_gdown_command")]
    pub gdown_command: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_backoff_millis: default_backoff_millis(),
            gdown_command: default_gdown_command(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root output directory; contains raw/, logs/ and the manifest
    #[serde(rename = "root-dir")]
    pub root_dir: String,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_millis() -> u64 {
    2000
}

fn default_gdown_command() -> String {
    "gdown".to_string()
}
