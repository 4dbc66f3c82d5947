//! Book-Harvest: a catalogue scraper for book listing sites
//!
//! This crate walks a paginated book catalogue, extracts the attributes of every
//! listed book, cleans them into a tabular dataset and writes that dataset to a
//! CSV file and a SQLite table.

pub mod config;
pub mod crawler;
pub mod dataset;
pub mod output;
pub mod pipeline;

use thiserror::Error;

/// Main error type for Book-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Pagination exceeded the limit of {max_pages} listing pages")]
    PageLimitExceeded { max_pages: u32 },

    #[error("Pagination loops back to an already visited page: {url}")]
    PaginationLoop { url: String },

    #[error("Dataset build error: {0}")]
    Build(#[from] dataset::BuildError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Book-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use dataset::{Book, BookDataset, BookRecord, Rating};
pub use pipeline::{harvest, HarvestSummary, Harvester};
