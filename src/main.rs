//! Therapist Crawler main entry point
//!
//! This is the command-line interface for the therapist directory crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use therapist_crawler::config::{load_config_with_hash, Config};
use therapist_crawler::crawler::crawl;
use therapist_crawler::output::{print_statistics, CsvOutput};
use therapist_crawler::url::{listing_page_url, locality_url};
use tracing_subscriber::EnvFilter;

/// Therapist Crawler: a rate-limited directory crawler
///
/// Walks the paginated therapist listings of each configured locality,
/// extracts every profile and appends the records to one CSV file per
/// locality and run.
#[derive(Parser, Debug)]
#[command(name = "therapist-crawler")]
#[command(version)]
#[command(about = "A rate-limited therapist directory crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("therapist_crawler=info,warn"),
            1 => EnvFilter::new("therapist_crawler=debug,info"),
            2 => EnvFilter::new("therapist_crawler=trace,debug"),
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

/// Handles the --dry-run mode: shows the targets and their URLs
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Therapist Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Listing URL template: {}", config.crawler.listing_url_template);
    println!("  Category: {}", config.crawler.category);
    println!(
        "  Rate limit: {} requests per {}ms",
        config.crawler.rate_limit_calls, config.crawler.rate_limit_period_ms
    );
    if config.crawler.max_pages == 0 {
        println!("  Max pages: unlimited");
    } else {
        println!("  Max pages: {}", config.crawler.max_pages);
    }
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!(
        "  On missing required field: {:?}",
        config.crawler.on_missing_required_field
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    let sink = CsvOutput::for_current_run(&config.output.directory);

    println!("\nLocalities ({}):", config.localities.len());
    for target in config.targets() {
        let landing = locality_url(
            &config.crawler.listing_url_template,
            &target,
            &config.crawler.category,
        )
        .with_context(|| format!("Invalid listing URL for {}", target))?;

        println!("  - {}", target);
        println!("    * Landing: {}", landing);
        println!("    * Page 1: {}", listing_page_url(&landing, 1));
        println!("    * Output: {}", sink.path_for(&target).display());
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Localities: {}, rate limit: {} requests per {}ms",
        config.localities.len(),
        config.crawler.rate_limit_calls,
        config.crawler.rate_limit_period_ms
    );

    let stats = crawl(config).await.context("Crawl failed")?;

    print_statistics(&stats);
    println!("Scraping completed.");

    Ok(())
}
