//! Listing-page link collection
//!
//! Walks the catalogue pagination from the configured start page and gathers
//! the relative detail-page link of every listed book, in page order and then
//! in-page order.

use crate::config::SiteConfig;
use crate::crawler::fetcher::{catalogue_url, fetch_page, FetchResult};
use crate::HarvestError;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Links found on one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Detail-page hrefs, relative to the catalogue, in DOM order
    pub links: Vec<String>,

    /// Href of the "next" pager item, if there is one
    pub next: Option<String>,
}

/// Parses a listing page
///
/// # Structure
///
/// - `ol.row` holds one item per book; the title anchor sits inside an `h3`
/// - `ul.pager` holds the pagination, with an optional `li.next > a`
///
/// Both containers are required. A page without them is not a listing page.
///
/// # Example
///
/// ```
/// use book_harvest::crawler::parse_listing;
///
/// let html = r#"<ol class="row"><li><h3><a href="book_1/index.html">Book</a></h3></li></ol>
///               <ul class="pager"><li class="next"><a href="page-2.html">next</a></li></ul>"#;
/// let page = parse_listing(html).unwrap();
/// assert_eq!(page.links, vec!["book_1/index.html"]);
/// assert_eq!(page.next.as_deref(), Some("page-2.html"));
/// ```
pub fn parse_listing(html: &str) -> Result<ListingPage, String> {
    let document = Html::parse_document(html);

    let list_selector = selector("ol.row")?;
    let title_link_selector = selector("h3 a[href]")?;
    let pager_selector = selector("ul.pager")?;
    let next_selector = selector("li.next a[href]")?;

    let list = document
        .select(&list_selector)
        .next()
        .ok_or_else(|| "listing container 'ol.row' not found".to_string())?;

    let links = list
        .select(&title_link_selector)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect();

    let pager = document
        .select(&pager_selector)
        .next()
        .ok_or_else(|| "pagination control 'ul.pager' not found".to_string())?;

    let next = pager
        .select(&next_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string());

    Ok(ListingPage { links, next })
}

pub(crate) fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector '{}': {:?}", css, e))
}

/// Collects the detail-page links of the whole catalogue
///
/// # Termination
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Page has no "next" link | Ok, all links so far |
/// | Listing page fetch fails (status or network) | Ok, all links so far |
/// | Page is not a listing page | HtmlParse error |
/// | More than `max_pages` pages needed | PageLimitExceeded error |
/// | "next" points at a page already visited | PaginationLoop error |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `config` - Site location and crawl bounds
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Relative detail links, page order then in-page order
/// * `Err(HarvestError)` - The catalogue could not be walked
pub async fn collect_links(
    client: &Client,
    config: &SiteConfig,
) -> Result<Vec<String>, HarvestError> {
    let catalogue = catalogue_url(&config.base_url)?;
    let mut page_url = catalogue.join(&config.start_page)?;
    let mut visited = HashSet::new();
    let mut links = Vec::new();
    let mut pages_fetched: u32 = 0;

    loop {
        if pages_fetched >= config.max_pages {
            return Err(HarvestError::PageLimitExceeded {
                max_pages: config.max_pages,
            });
        }
        visited.insert(page_url.to_string());

        let body = match fetch_page(client, &page_url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::debug!("Fetched listing page {} (HTTP {})", final_url, status_code);
                body
            }
            FetchResult::HttpError { status_code } => {
                tracing::info!(
                    "Listing page {} returned HTTP {}, ending crawl",
                    page_url,
                    status_code
                );
                break;
            }
            FetchResult::NetworkError { error } => {
                tracing::info!(
                    "Listing page {} unreachable ({}), ending crawl",
                    page_url,
                    error
                );
                break;
            }
        };
        pages_fetched += 1;

        let listing = parse_listing(&body).map_err(|message| HarvestError::HtmlParse {
            url: page_url.to_string(),
            message,
        })?;

        tracing::debug!(
            "Listing page {} yielded {} links",
            page_url,
            listing.links.len()
        );
        links.extend(listing.links);

        let Some(href) = listing.next else {
            break;
        };

        let next_url = page_url.join(&href)?;
        if visited.contains(next_url.as_str()) {
            return Err(HarvestError::PaginationLoop {
                url: next_url.to_string(),
            });
        }
        page_url = next_url;
    }

    tracing::info!(
        "Collected {} book links from {} listing pages",
        links.len(),
        pages_fetched
    );

    Ok(links)
}
