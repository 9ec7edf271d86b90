//! Driftnet main entry point
//!
//! This is the command-line interface for the driftnet crawl core.

use anyhow::Context;
use clap::Parser;
use driftnet::config::load_config;
use driftnet::crawler::run_crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Driftnet: a bounded same-domain crawler
///
/// Driftnet crawls same-domain pages starting from configured seeds,
/// extracts titles, descriptions, paragraphs, and links, and appends one
/// JSON record per page to the configured output file.
#[derive(Parser, Debug)]
#[command(name = "driftnet")]
#[command(version)]
#[command(about = "A bounded same-domain crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    tracing::info!(
        "Seeds: {}, budget: {} requests, concurrency: {}",
        config.crawl.seeds.len(),
        config.crawl.max_requests_per_crawl,
        config.crawl.max_concurrency
    );

    let stats = run_crawl(&config).await.context("crawl failed to start")?;

    println!(
        "Crawled {} pages ({} failed), wrote {} records to {}",
        stats.pages_crawled, stats.pages_failed, stats.records_written, config.output.records_path
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("driftnet=info,warn"),
            1 => EnvFilter::new("driftnet=debug,info"),
            2 => EnvFilter::new("driftnet=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &driftnet::config::Config) {
    println!("=== Driftnet Dry Run ===\n");

    println!("Crawl:");
    println!("  Max concurrency: {}", config.crawl.max_concurrency);
    println!(
        "  Max requests per crawl: {}",
        config.crawl.max_requests_per_crawl
    );
    println!("  Fetch timeout: {}s", config.crawl.fetch_timeout_secs);
    println!("  Max retries: {}", config.crawl.max_retries);

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);

    println!("\nOutput:");
    println!("  Records: {}", config.output.records_path);

    println!("\nSeeds ({}):", config.crawl.seeds.len());
    for seed in &config.crawl.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}
