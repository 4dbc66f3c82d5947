//! Detail-page extraction
//!
//! Every field goes through the same extract-or-default policy. Optional
//! fields (title, category, rating) fall back to an empty value. The seven
//! info-table cells are required: if any is missing the whole book is skipped,
//! so a partial record never reaches the dataset.

use crate::config::SiteConfig;
use crate::crawler::fetcher::{catalogue_url, fetch_page, FetchResult};
use crate::crawler::listing::selector;
use crate::dataset::{BookRecord, Rating};
use crate::HarvestError;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Reasons a detail page yields no record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("product information table not found")]
    MissingInfoTable,

    #[error("product information table has no '{0}' cell")]
    MissingField(&'static str),

    #[error("{0}")]
    Selector(String),
}

/// Records extracted from a list of detail links, plus what was skipped
#[derive(Debug, Default)]
pub struct ExtractOutcome {
    /// One record per successfully processed link, in link order
    pub records: Vec<BookRecord>,

    /// Links whose page could not be fetched
    pub fetch_failures: usize,

    /// Links whose page lacked required fields
    pub extract_failures: usize,
}

/// Extracts one book from its detail page
///
/// # Fields
///
/// | Field | Source | Fallback |
/// |-------|--------|----------|
/// | title | `div.product_main h1` | `""` |
/// | rating | `div.product_main p.star-rating` class `One`..`Five` | `Unrated` without marker, `Missing` without node |
/// | category | third `ul.breadcrumb li` | `""` |
/// | UPC .. reviews | cells of `table.table-striped`, in order | none, record is rejected |
///
/// # Example
///
/// ```
/// use book_harvest::crawler::{parse_detail, ExtractError};
///
/// let err = parse_detail("<html><body><h1>No table</h1></body></html>").unwrap_err();
/// assert_eq!(err, ExtractError::MissingInfoTable);
/// ```
pub fn parse_detail(html: &str) -> Result<BookRecord, ExtractError> {
    let document = Html::parse_document(html);

    let main_panel = css("div.product_main")?;
    let title_selector = css("h1")?;
    let rating_selector = css("p.star-rating")?;
    let breadcrumb_selector = css("ul.breadcrumb li")?;
    let table_selector = css("table.table-striped")?;
    let cell_selector = css("tr td")?;

    let (title, rating) = match document.select(&main_panel).next() {
        Some(panel) => (
            panel
                .select(&title_selector)
                .next()
                .map(element_text)
                .unwrap_or_default(),
            extract_rating(panel, &rating_selector),
        ),
        None => (String::new(), Rating::Missing),
    };

    let category = document
        .select(&breadcrumb_selector)
        .nth(2)
        .map(element_text)
        .unwrap_or_default();

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ExtractError::MissingInfoTable)?;

    // One cell per row, always in this order
    let mut cells = table.select(&cell_selector).map(element_text);
    let mut next_cell =
        |field: &'static str| cells.next().ok_or(ExtractError::MissingField(field));

    let upc = next_cell("upc")?;
    let product_type = next_cell("product_type")?;
    let price_excl_tax = next_cell("price_excl_tax")?;
    let price_incl_tax = next_cell("price_incl_tax")?;
    let tax = next_cell("tax")?;
    let stock_text = next_cell("stock")?;
    let number_of_reviews = next_cell("number_of_reviews")?;

    Ok(BookRecord {
        upc,
        title,
        category,
        product_type,
        price_excl_tax,
        price_incl_tax,
        tax,
        stock_text,
        number_of_reviews,
        rating,
    })
}

fn css(pattern: &str) -> Result<Selector, ExtractError> {
    selector(pattern).map_err(ExtractError::Selector)
}

fn extract_rating(panel: ElementRef<'_>, rating_selector: &Selector) -> Rating {
    match panel.select(rating_selector).next() {
        Some(node) => node
            .value()
            .classes()
            .find_map(Rating::from_marker)
            .unwrap_or(Rating::Unrated),
        None => Rating::Missing,
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Fetches every detail link in order and extracts its book
///
/// Pages that cannot be fetched, or that lack required fields, are skipped and
/// counted; neither stops the run.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `config` - Site location, used to resolve the relative links
/// * `links` - Detail hrefs relative to the catalogue
///
/// # Returns
///
/// * `Ok(ExtractOutcome)` - Records in link order plus skip counts
/// * `Err(HarvestError)` - A link could not be resolved to a URL
pub async fn extract_books(
    client: &Client,
    config: &SiteConfig,
    links: &[String],
) -> Result<ExtractOutcome, HarvestError> {
    let catalogue = catalogue_url(&config.base_url)?;
    let mut outcome = ExtractOutcome::default();

    for (i, link) in links.iter().enumerate() {
        let url = catalogue.join(link)?;

        let body = match fetch_page(client, &url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::debug!("Fetched detail page {} (HTTP {})", final_url, status_code);
                body
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Skipping {}: HTTP {}", url, status_code);
                outcome.fetch_failures += 1;
                continue;
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Skipping {}: {}", url, error);
                outcome.fetch_failures += 1;
                continue;
            }
        };

        match parse_detail(&body) {
            Ok(record) => {
                tracing::debug!(
                    "[{}/{}] {} ({})",
                    i + 1,
                    links.len(),
                    record.title,
                    record.upc
                );
                outcome.records.push(record);
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", url, e);
                outcome.extract_failures += 1;
            }
        }
    }

    tracing::info!(
        "Extracted {} books ({} fetch failures, {} incomplete pages)",
        outcome.records.len(),
        outcome.fetch_failures,
        outcome.extract_failures
    );

    Ok(outcome)
}
