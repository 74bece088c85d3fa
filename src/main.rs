//! Curtsy command-line entry point
//!
//! Thin glue around the library: load a TOML config, build the HTTP
//! fetcher, crawl with the default link-following visitor.

use anyhow::Context;
use clap::Parser;
use curtsy::config::load_config;
use curtsy::{CrawlOptions, Crawler, HttpFetcher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Curtsy: a polite, embeddable web-crawl engine
#[derive(Parser, Debug)]
#[command(name = "curtsy")]
#[command(version)]
#[command(about = "Politely crawl the web from a set of seed URLs", long_about = None)]
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

    /// Validate the config and show what would be crawled, without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        print_plan(&config);
        return Ok(());
    }

    let fetcher = HttpFetcher::new(&config.user_agent_string())
        .context("failed to build HTTP client")?;

    let options = CrawlOptions {
        same_host_only: config.crawl.same_host_only,
        crawl_delay: config.crawl_delay(),
        worker_idle_ttl: config.worker_idle_ttl(),
        max_visits: config.crawl.max_visits,
        fetcher: Some(Arc::new(fetcher)),
        ..CrawlOptions::default()
    };

    let crawler = Crawler::new(options);
    crawler
        .run(&config.seeds)
        .await
        .context("crawl failed")?;

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("curtsy=info,warn"),
            1 => EnvFilter::new("curtsy=debug,info"),
            2 => EnvFilter::new("curtsy=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_plan(config: &curtsy::Config) {
    println!("Crawl plan:");
    println!("  Same host only: {}", config.crawl.same_host_only);
    println!("  Crawl delay: {:?}", config.crawl_delay());
    println!("  Worker idle TTL: {:?}", config.worker_idle_ttl());
    match config.crawl.max_visits {
        Some(max) => println!("  Max visits: {}", max),
        None => println!("  Max visits: unbounded"),
    }
    println!("  User agent: {}", config.user_agent_string());
    println!("  Seeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("    - {}", seed);
    }
}
