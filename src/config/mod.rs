//! Configuration module for Book-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) yields the
//! settings for the public books.toscrape.com catalogue.
//!
//! # Example
//!
//! ```no_run
//! use book_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawling catalogue at: {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
