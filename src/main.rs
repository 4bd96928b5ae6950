//! Pagehoard main entry point
//!
//! This is the command-line interface for the pagehoard crawl service.

use anyhow::Context;
use clap::Parser;
use pagehoard::config::load_config_with_hash;
use pagehoard::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pagehoard: a polite, resumable archiving crawler
///
/// Pagehoard discovers, fetches, and archives pages reachable from a seed
/// URL, keeps the link graph in SQLite, and periodically re-visits stale
/// pages. It runs as a standing service until stopped.
#[derive(Parser, Debug)]
#[command(name = "pagehoard")]
#[command(version)]
#[command(about = "A polite, resumable archiving crawler", long_about = None)]
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
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    tracing::info!(
        "Starting crawl service: seed {}, {} workers, link cap {}",
        config.crawler.base_url,
        config.crawler.parallel_thread_count,
        config.crawler.max_link_limit
    );

    crawl(config).await.context("crawl service failed")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagehoard=info,warn"),
            1 => EnvFilter::new("pagehoard=debug,info"),
            2 => EnvFilter::new("pagehoard=trace,debug"),
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
