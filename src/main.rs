//! Blog-Gleaner main entry point
//!
//! This is the command-line interface for the Blog-Gleaner blog archiver.

use anyhow::{Context, Result};
use blog_gleaner::config::{load_config_with_hash, resolve_start_urls, Config};
use blog_gleaner::crawler::run_crawl;
use blog_gleaner::output::parse_article_index;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Blog-Gleaner: a polite blog archiver
///
/// Blog-Gleaner crawls one blog breadth-first, extracts every article it
/// finds, files each article under its categories, and writes a summary
/// report of the run.
#[derive(Parser, Debug)]
#[command(name = "blog-gleaner")]
#[command(version = "1.0.0")]
#[command(about = "A polite blog archiver", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "list_urls")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "list_urls")]
    dry_run: bool,

    /// Override the configured page budget
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Print the article URLs listed in a summary report and exit
    #[arg(long, value_name = "REPORT", conflicts_with = "dry_run")]
    list_urls: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(report) = &cli.list_urls {
        return handle_list_urls(report);
    }

    let config_path = cli
        .config
        .as_deref()
        .context("a configuration file is required")?;

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", config_path.display());
    let mut config = match load_config_with_hash(config_path) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(max_pages) = cli.max_pages {
        anyhow::ensure!(max_pages >= 1, "--max-pages must be >= 1");
        config.crawler.page_budget = max_pages;
    }

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("blog_gleaner=info,warn"),
            1 => EnvFilter::new("blog_gleaner=debug,info"),
            2 => EnvFilter::new("blog_gleaner=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<()> {
    let start_urls = resolve_start_urls(config)?;

    println!("=== Blog-Gleaner Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Timeout: {}s", config.crawler.timeout_seconds);
    println!(
        "  Retries: {} (backoff base {}s, jitter up to {}s)",
        config.crawler.max_retries,
        config.crawler.base_backoff_seconds,
        config.crawler.backoff_jitter_seconds
    );
    println!(
        "  Delay between pages: {}-{}s",
        config.crawler.min_delay, config.crawler.max_delay
    );
    println!("  Page budget: {}", config.crawler.page_budget);

    println!("\nSite:");
    println!("  Domain: {}", config.site.domain);
    println!("  Content markers: {}", config.site.content_markers.join(", "));
    println!("  Exclude markers: {}", config.site.exclude_markers.join(", "));
    println!("  Listing params: {}", config.site.listing_params.join(", "));

    println!("\nOutput:");
    println!("  Articles: {}", config.output.base_dir);
    println!(
        "  All-articles folder: {}",
        Path::new(&config.output.base_dir)
            .join(&config.output.all_articles_dir)
            .display()
    );
    println!("  Summary: {}", config.output.summary_path);

    println!("\nStart URLs ({}):", start_urls.len());
    for url in &start_urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} start URLs", start_urls.len());

    Ok(())
}

/// Handles the --list-urls mode: prints the URLs of a summary's article index
fn handle_list_urls(report: &Path) -> Result<()> {
    let text = std::fs::read_to_string(report)
        .with_context(|| format!("Failed to read report {}", report.display()))?;

    let entries = parse_article_index(&text);
    tracing::info!("Found {} articles in {}", entries.len(), report.display());

    for entry in entries {
        println!("{}", entry.url);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> Result<()> {
    tracing::info!(
        "Crawling {} (page budget {})",
        config.site.domain,
        config.crawler.page_budget
    );

    let report = match run_crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl could not start: {}", e);
            return Err(e.into());
        }
    };

    println!("Articles found: {}", report.articles.len());
    println!("Pages visited: {}", report.pages_visited);
    println!("Pages processed: {}", report.pages_processed);
    if report.save_failures > 0 {
        println!("Articles with unsaved copies: {}", report.save_failures);
    }
    println!("Summary: {}", config.output.summary_path);

    Ok(())
}
