//! Book-Harvest main entry point
//!
//! This is the command-line interface for the Book-Harvest catalogue scraper.

use anyhow::Context;
use book_harvest::config::{load_config, Config};
use book_harvest::output::exporters_for;
use book_harvest::Harvester;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Book-Harvest: a catalogue scraper for book listing sites
///
/// Book-Harvest walks every listing page of the catalogue, extracts the
/// attributes of each book from its detail page, and writes the cleaned
/// dataset to a CSV file and a SQLite table.
#[derive(Parser, Debug)]
#[command(name = "book-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A catalogue scraper for book listing sites", long_about = None)]
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

    /// Validate config and show what would be harvested without crawling
    #[arg(long)]
    dry_run: bool,

    /// Write the CSV file only, skip the database table
    #[arg(long)]
    csv_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        print_dry_run(&config, cli.csv_only);
        return Ok(());
    }

    let exporters = exporters_for(&config.output, cli.csv_only);
    let harvester = Harvester::with_exporters(config, exporters)?;

    match harvester.run().await {
        Ok(summary) => {
            tracing::info!("Harvest completed successfully ({} rows)", summary.rows);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("book_harvest=info,warn"),
            1 => EnvFilter::new("book_harvest=debug,info"),
            2 => EnvFilter::new("book_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn print_dry_run(config: &Config, csv_only: bool) {
    println!("=== Book-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Start page: {}", config.site.start_page);
    println!("  Max listing pages: {}", config.site.max_pages);
    println!("  Currency symbol: {}", config.site.currency_symbol);

    println!("\nRequest headers:");
    println!("  User-Agent: {}", config.http.user_agent);
    println!("  Accept-Language: {}", config.http.accept_language);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    if csv_only {
        println!("  Database: skipped (--csv-only)");
    } else {
        println!(
            "  Database: {} (table '{}')",
            config.output.database_path, config.output.table_name
        );
    }

    println!("\n✓ Configuration is valid");
}
