//! Formscout main entry point
//!
//! This is the command-line interface for the Formscout form harvester.

use anyhow::Context;
use clap::Parser;
use formscout::config::{load_or_default, Config};
use formscout::crawler::{Coordinator, RunReport};
use formscout::output::{load_statistics, print_statistics};
use formscout::storage::open_storage;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Formscout: a resumable HTML form harvester
///
/// Each run pulls the public bug-bounty scope lists, crawls domains that have
/// not been scanned yet, and stops at the first domain that yields forms.
/// Progress is kept between runs; once every domain has been scanned the
/// cycle starts over.
#[derive(Parser, Debug)]
#[command(name = "formscout")]
#[command(version)]
#[command(about = "A resumable HTML form harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show what the next run would crawl without crawling or writing
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show scan progress and result shard statistics and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_or_default(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Invalid default configuration".to_string(),
        })?;
    match config_hash {
        Some(hash) => tracing::info!("Configuration loaded (hash: {})", hash),
        None => tracing::info!("No configuration file given, using defaults"),
    }

    if cli.stats {
        handle_stats(&config)
    } else if cli.dry_run {
        handle_dry_run(config).await
    } else {
        handle_run(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("formscout=info,warn"),
            1 => EnvFilter::new("formscout=debug,info"),
            2 => EnvFilter::new("formscout=trace,debug"),
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

/// Handles the --dry-run mode: shows what the next run would attempt
async fn handle_dry_run(config: Config) -> anyhow::Result<()> {
    let coordinator = Coordinator::from_config(config)?;
    let plan = coordinator.plan().await;

    println!("=== Formscout Dry Run ===\n");
    println!("Scan state: {}", coordinator.state_path().display());
    println!("  Domains in feed: {}", plan.universe_size);
    println!("  Already scanned: {}", plan.scanned);
    println!("  Remaining: {}", plan.unscanned);
    println!();

    if plan.next_attempts.is_empty() {
        println!("Every domain has been scanned; the next run resets progress.");
    } else {
        println!(
            "Next run would attempt up to {} domain(s):",
            plan.next_attempts.len()
        );
        for domain in &plan.next_attempts {
            println!("  - {}", domain);
        }
    }

    Ok(())
}

/// Handles the --stats mode: shows progress from disk
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let stats = load_statistics(open_storage(), &config.output)
        .context("Failed to read result shards")?;
    print_statistics(&stats);
    Ok(())
}

/// Handles the main run
async fn handle_run(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Renderer: {:?}, attempt budget: {} domain(s), {} page(s) per domain",
        config.renderer.kind,
        config.crawler.max_domain_attempts,
        config.crawler.max_pages_per_domain
    );

    let coordinator = Coordinator::from_config(config)?;
    match coordinator.run_once().await {
        Ok(report) => {
            log_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

fn log_report(report: &RunReport) {
    if report.state_reset {
        tracing::info!(
            "All {} domain(s) were already scanned; progress reset for the next cycle",
            report.universe_size
        );
        return;
    }

    if let Some(shard) = &report.shard {
        tracing::info!(
            "Run complete: {} form(s) saved to {} after {} domain attempt(s)",
            report.forms_saved,
            shard.display(),
            report.domains_attempted
        );
    } else {
        tracing::info!(
            "Run complete: no forms found in {} domain attempt(s)",
            report.domains_attempted
        );
    }
    tracing::debug!("Attempted: {}", report.attempted.join(", "));
}
