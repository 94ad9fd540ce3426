//! Course-Harvest main entry point
//!
//! This is the command-line interface for the Course-Harvest catalogue extractor.

use clap::Parser;
use course_harvest::config::{load_config_with_hash, parse_window_size, Config};
use course_harvest::output::print_statistics;
use course_harvest::scrape::run_scrape;
use course_harvest::RunOutcome;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the WebDriver endpoint
const WEBDRIVER_URL_ENV: &str = "WEBDRIVER_URL";

/// Course-Harvest: a course catalogue extractor
///
/// Course-Harvest fetches a university course listing (rendering it in a
/// headless browser when needed), follows every course link, and writes
/// each course's eligibility and fees into a JSON record file.
#[derive(Parser, Debug)]
#[command(name = "course-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A course catalogue extractor", long_about = None)]
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

    /// Validate config and show what would be scraped without any network access
    #[arg(long)]
    dry_run: bool,

    /// WebDriver endpoint for the headless browser (overrides config and WEBDRIVER_URL)
    #[arg(long, value_name = "URL")]
    webdriver_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    apply_webdriver_override(&mut config, cli.webdriver_url);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_scrape(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("course_harvest=info,warn"),
            1 => EnvFilter::new("course_harvest=debug,info"),
            2 => EnvFilter::new("course_harvest=trace,debug"),
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

/// Applies the WebDriver endpoint from the command line or environment
///
/// The command line wins over the environment, which wins over the config file.
fn apply_webdriver_override(config: &mut Config, cli_url: Option<String>) {
    let env_url = std::env::var(WEBDRIVER_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty());

    if let Some(url) = cli_url.or(env_url) {
        tracing::debug!("Using WebDriver endpoint {}", url);
        config.browser.webdriver_url = url;
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Course-Harvest Dry Run ===\n");

    println!("Target:");
    println!("  Listing page: {}", config.target.url);
    println!("  Base URL: {}", config.target.base_url);
    println!("  Link keyword: {}", config.target.link_keyword);

    println!("\nFetching:");
    println!("  User agent: {}", config.fetch.user_agent);
    println!("  Static timeout: {}s", config.fetch.static_timeout_secs);
    println!("  Detail timeout: {}s", config.fetch.detail_timeout_secs);
    println!("  Render timeout: {}s", config.fetch.render_timeout_secs);
    println!("  Polite delay: {}ms", config.fetch.polite_delay_ms);

    println!("\nBrowser:");
    println!("  WebDriver: {}", config.browser.webdriver_url);
    println!("  Headless: {}", config.browser.headless);
    match parse_window_size(&config.browser.window_size) {
        Ok((width, height)) => println!("  Window: {}x{}", width, height),
        Err(_) => println!("  Window: {}", config.browser.window_size),
    }

    println!("\nSections:");
    println!("  Element: <{}>", config.sections.element);
    println!("  Eligibility id pattern: {}", config.sections.eligibility_pattern);
    println!("  Fees id pattern: {}", config.sections.fees_pattern);

    println!("\nOutput:");
    println!(
        "  Record file: {}",
        std::path::Path::new(&config.output.data_dir)
            .join(&config.target.output_name)
            .display()
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {} for links containing {:?}",
        config.target.url,
        config.target.link_keyword
    );

    match run_scrape(config).await {
        Ok(RunOutcome::Completed {
            count,
            location,
            statistics,
        }) => {
            println!("✓ Saved {} courses to {}\n", count, location);
            print_statistics(&statistics);
            Ok(())
        }
        Ok(RunOutcome::Aborted(reason)) => {
            anyhow::bail!("run aborted while {}: {}", reason.stage(), reason)
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
