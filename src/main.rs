//! Terrier main entry point
//!
//! This is the command-line interface for the Terrier crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use terrier::config::{load_config, Config};
use terrier::crawler::run_crawl;
use terrier::output::{load_statistics, print_statistics};
use terrier::storage::CrawlStore;
use tracing_subscriber::EnvFilter;

/// Terrier: a single-domain breadth-first archiving crawler
///
/// Terrier fetches one page at a time from a single host, deduplicates by
/// canonical URL and by content hash, logs discovered asset links, and keeps
/// a frontier snapshot so an interrupted crawl can resume.
#[derive(Parser, Debug)]
#[command(name = "terrier")]
#[command(version)]
#[command(about = "A single-domain breadth-first archiving crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (the environment is used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume an interrupted crawl (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Discard any frontier snapshot and restart from the seed
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Validate the configuration and print it without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Print statistics from the persisted crawl data and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("loading configuration from {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?
        }
        None => Config::from_env().context("failed to build configuration from environment")?,
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    if cli.stats {
        return handle_stats(&config);
    }

    if cli.fresh {
        tracing::info!("starting fresh crawl (discarding any frontier snapshot)");
    }

    run_crawl(config, cli.fresh).await.context("crawl failed")?;

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("terrier=info,warn"),
            1 => EnvFilter::new("terrier=debug,info"),
            2 => EnvFilter::new("terrier=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates the config and prints it
fn handle_dry_run(config: &Config) {
    println!("=== Terrier Dry Run ===\n");

    println!("Crawler:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Domain: {}", config.crawler.domain);
    let max_pages = if config.crawler.max_pages == 0 {
        "unlimited".to_string()
    } else {
        config.crawler.max_pages.to_string()
    };
    println!("  Max pages: {}", max_pages);
    println!("  Rate limit: {}s", config.crawler.rate_limit_seconds);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);

    println!("\nUser agent: {}", config.user_agent.header_value());

    println!("\nFetch:");
    println!("  Max attempts: {}", config.fetch.max_attempts);
    println!("  Backoff base: {}s", config.fetch.backoff_base_seconds);
    println!("  Retry statuses: {:?}", config.fetch.retry_statuses);

    println!("\nOutput:");
    println!("  Base dir: {}", config.output.base_dir);
    println!("  Checkpoint interval: {}", config.output.checkpoint_interval);

    println!("\nResume:");
    println!("  Requeue failed URLs: {}", config.resume.requeue_failed);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: reports from the persisted artifacts
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let store = CrawlStore::open(std::path::Path::new(&config.output.base_dir))
        .context("failed to open crawl data directory")?;

    let stats = load_statistics(&store).context("failed to read crawl data")?;
    print_statistics(&stats);

    Ok(())
}
