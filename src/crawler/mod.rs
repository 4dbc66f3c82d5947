//! Crawler module for catalogue fetching and extraction
//!
//! This module contains the two crawling stages, including:
//! - HTTP fetching with the configured request headers
//! - Listing-page link collection across the pagination
//! - Detail-page field extraction into typed records

mod detail;
mod fetcher;
mod listing;

pub use detail::{extract_books, parse_detail, ExtractError, ExtractOutcome};
pub use fetcher::{build_http_client, catalogue_url, fetch_page, FetchResult};
pub use listing::{collect_links, parse_listing, ListingPage};
