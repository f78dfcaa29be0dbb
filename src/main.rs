//! Harvestman main entry point
//!
//! Command-line interface for the crawl-then-fetch pipeline.

use anyhow::Context;
use clap::Parser;
use harvestman::config::{load_config_with_hash, Config};
use harvestman::pipeline;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Harvestman: a crawl-then-fetch pipeline for public data resources
///
/// Harvestman discovers downloadable data files on the configured seed
/// pages, follows links up to a bounded depth, downloads everything it
/// finds, and appends an audit manifest of the run.
#[derive(Parser, Debug)]
#[command(name = "harvestman")]
#[command(version)]
#[command(about = "Crawl seed pages and fetch the data files they link to", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without any network activity
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    // The log directory must exist before the subscriber can write to it;
    // inability to create it aborts the run
    let log_dir = PathBuf::from(&config.output.root_dir).join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join(format!(
        "harvestman_{}.log",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;

    setup_logging(cli.verbose, cli.quiet, log_file);

    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );
    tracing::info!("Logging to {}", log_path.display());

    let summary = pipeline::run(&config).await?;

    tracing::info!(
        "All done: {} manifest rows appended",
        summary.manifest_rows()
    );

    Ok(())
}

/// Sets up the logging subscriber: console plus a per-run log file
fn setup_logging(verbose: u8, quiet: bool, log_file: std::fs::File) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("harvestman=info,warn"),
            1 => EnvFilter::new("harvestman=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::sync::Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the run plan
fn handle_dry_run(config: &Config, config_hash: &str) {
    println!("=== Harvestman Dry Run ===\n");

    println!("Crawl:");
    println!("  Max depth: {}", config.crawl.max_depth);
    println!("  Timeout: {}s", config.crawl.timeout_secs);
    println!("  Seeds ({}):", config.crawl.seeds.len());
    for seed in &config.crawl.seeds {
        println!("    * {}", seed);
    }

    println!("\nDownload:");
    println!("  Max retries: {}", config.download.max_retries);
    println!(
        "  Retry backoff: {}ms per attempt",
        config.download.retry_backoff_millis
    );
    println!("  gdown command: {}", config.download.gdown_command);

    println!("\nOutput:");
    println!("  Root: {}", config.output.root_dir);
    println!("  Downloads: {}/raw", config.output.root_dir);
    println!("  Manifest: {}/manifest.csv", config.output.root_dir);
    println!("  Logs: {}/logs", config.output.root_dir);

    println!("\nConfig hash: {}", config_hash);
    println!("✓ Configuration is valid");
}
