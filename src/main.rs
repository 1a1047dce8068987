//! Site-Mirror main entry point
//!
//! This is the command-line interface for the Site-Mirror recursive downloader.

use anyhow::Context;
use clap::Parser;
use site_mirror::config::{load_config_with_hash, parse_duration, validate, CrawlConfig};
use site_mirror::output::print_report;
use site_mirror::Scraper;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site-Mirror: a recursive site downloader
///
/// Site-Mirror downloads a website from a seed URL, follows same-host links
/// up to a maximum depth, fetches the stylesheets, scripts and images each
/// page uses, and rewrites references so the mirror browses offline.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version = "1.0.0")]
#[command(about = "A recursive site downloader", long_about = None)]
struct Cli {
    /// URL to mirror; `https://` is assumed when no scheme is given
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Maximum link depth to follow
    #[arg(short = 'd', long = "depth")]
    depth: Option<u32>,

    /// Output directory (defaults to the host name)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-request timeout, e.g. 10s, 500ms, 2m
    #[arg(short, long, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// User-Agent header to send
    #[arg(short = 'a', long)]
    user_agent: Option<String>,

    /// Ignore robots.txt
    #[arg(short = 'r', long)]
    ignore_robots: bool,

    /// Task queue bound; tasks discovered beyond it are dropped
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Path to a TOML configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be mirrored without downloading
    #[arg(long)]
    dry_run: bool,
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    parse_duration(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(config)
    } else {
        handle_mirror(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mirror=info,warn"),
            1 => EnvFilter::new("site_mirror=debug,info"),
            2 => EnvFilter::new("site_mirror=trace,debug"),
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

/// Layers command-line flags over the optional configuration file
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => CrawlConfig::default(),
    };

    if let Some(url) = &cli.url {
        config.start_url = url.clone();
    }
    if let Some(depth) = cli.depth {
        config.max_depth = depth;
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.user_agent = user_agent.clone();
    }
    if cli.ignore_robots {
        config.ignore_robots = true;
    }
    if let Some(capacity) = cli.queue_capacity {
        config.queue_capacity = capacity;
    }

    if config.start_url.trim().is_empty() {
        anyhow::bail!("No URL given: pass one on the command line or set start-url in the config file");
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: resolves the configuration and shows what would be mirrored
fn handle_dry_run(config: CrawlConfig) -> anyhow::Result<()> {
    let scraper = Scraper::new(config.clone()).context("Failed to prepare mirror")?;

    println!("=== Site-Mirror Dry Run ===\n");

    println!("Target:");
    println!("  Start URL: {}", scraper.seed());
    println!("  Host: {}", scraper.base_host());
    println!("  Path prefix: {}", scraper.scope_prefix());
    println!("  Output directory: {}", scraper.output_dir().display());

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.max_depth);
    println!("  Workers: {}", config.workers);
    println!("  Timeout: {:?}", config.timeout);
    println!("  User agent: {}", config.user_agent);
    println!("  Queue capacity: {}", config.queue_capacity);
    println!(
        "  Robots.txt: {}",
        if config.ignore_robots {
            "ignored"
        } else {
            "respected"
        }
    );

    println!("\nConfiguration is valid.");
    Ok(())
}

/// Runs the mirror until it completes or Ctrl-C is pressed
async fn handle_mirror(config: CrawlConfig) -> anyhow::Result<()> {
    let scraper = Scraper::new(config).context("Failed to prepare mirror")?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping workers");
            interrupt.cancel();
        }
    });

    let report = scraper
        .run(cancel)
        .await
        .context("Mirror failed to start")?;

    print_report(&report);
    Ok(())
}
