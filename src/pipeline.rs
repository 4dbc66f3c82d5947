//! Harvest pipeline - stage orchestration
//!
//! Runs the stages strictly in sequence:
//! link collection, detail extraction, dataset build, then each exporter.
//! Nothing is written until the dataset is fully built, so a failure in an
//! earlier stage leaves no partial output behind.

use crate::config::Config;
use crate::crawler::{build_http_client, collect_links, extract_books};
use crate::dataset::{build_dataset, BookDataset};
use crate::output::{exporters_for, DatasetExporter};
use crate::HarvestError;
use reqwest::Client;
use std::time::Instant;

/// Counts reported at the end of a harvest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Detail links found across all listing pages
    pub listing_links: usize,

    /// Detail pages skipped because the fetch failed
    pub fetch_failures: usize,

    /// Detail pages skipped because required fields were missing
    pub extract_failures: usize,

    /// Rows in the exported dataset
    pub rows: usize,
}

/// Main harvester structure
pub struct Harvester {
    config: Config,
    client: Client,
    exporters: Vec<Box<dyn DatasetExporter>>,
}

impl Harvester {
    /// Creates a harvester exporting to every configured sink
    ///
    /// # Arguments
    ///
    /// * `config` - The harvester configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let exporters = exporters_for(&config.output, false);
        Self::with_exporters(config, exporters)
    }

    /// Creates a harvester with an explicit list of exporters
    pub fn with_exporters(
        config: Config,
        exporters: Vec<Box<dyn DatasetExporter>>,
    ) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.http)?;
        Ok(Self {
            config,
            client,
            exporters,
        })
    }

    /// Crawls the catalogue and builds the dataset without exporting it
    ///
    /// # Returns
    ///
    /// * `Ok((BookDataset, HarvestSummary))` - The dataset and crawl counts
    /// * `Err(HarvestError)` - A fatal crawl or build error
    pub async fn scrape(&self) -> Result<(BookDataset, HarvestSummary), HarvestError> {
        tracing::info!("Collecting book links from {}", self.config.site.base_url);
        let links = collect_links(&self.client, &self.config.site).await?;

        tracing::info!("Extracting {} detail pages", links.len());
        let outcome = extract_books(&self.client, &self.config.site, &links).await?;

        let dataset = build_dataset(outcome.records, &self.config.site.currency_symbol)?;

        let summary = HarvestSummary {
            listing_links: links.len(),
            fetch_failures: outcome.fetch_failures,
            extract_failures: outcome.extract_failures,
            rows: dataset.len(),
        };

        Ok((dataset, summary))
    }

    /// Runs the whole pipeline: crawl, build, then every exporter in order
    pub async fn run(&self) -> Result<HarvestSummary, HarvestError> {
        let started = Instant::now();
        let (dataset, summary) = self.scrape().await?;

        for exporter in &self.exporters {
            tracing::debug!("Running {} exporter", exporter.name());
            exporter.export(&dataset)?;
        }

        tracing::info!(
            "Harvest finished in {:.1}s: {} rows from {} links ({} fetch failures, {} incomplete pages)",
            started.elapsed().as_secs_f64(),
            summary.rows,
            summary.listing_links,
            summary.fetch_failures,
            summary.extract_failures
        );

        Ok(summary)
    }
}

/// Runs a complete harvest with the configured exporters
///
/// This is the main entry point. It will:
/// 1. Walk every listing page and collect detail links
/// 2. Fetch each detail page and extract its book
/// 3. Build and clean the dataset
/// 4. Write it to the CSV file, then to the SQLite table
pub async fn harvest(config: Config) -> Result<HarvestSummary, HarvestError> {
    Harvester::new(config)?.run().await
}
