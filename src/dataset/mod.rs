//! Dataset module for shaping extracted books into a table
//!
//! This module handles:
//! - The typed per-book record produced by the detail extractor
//! - Cleanup and type coercion of prices, tax and stock
//! - The ordered, `upc`-keyed table handed to the exporters

mod builder;
mod record;

pub use builder::{build_dataset, extract_stock, parse_price, strip_currency};
pub use record::{Book, BookRecord, Rating};

use thiserror::Error;

/// Errors raised while building the dataset
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Cannot coerce {field} of book {upc} to a number: '{value}'")]
    Coercion {
        upc: String,
        field: &'static str,
        value: String,
    },
}

/// Column names, in export order
pub const COLUMNS: [&str; 10] = [
    "upc",
    "title",
    "category",
    "product_type",
    "price_excl_tax",
    "price_incl_tax",
    "tax",
    "stock_text",
    "number_of_reviews",
    "rating",
];

/// Cleaned books in extraction order
///
/// `upc` is the declared index key. It is not enforced: if the catalogue lists
/// the same book twice, both rows are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDataset {
    pub rows: Vec<Book>,
}

impl BookDataset {
    /// Name of the index column
    pub const INDEX_KEY: &'static str = "upc";

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index values in row order
    pub fn index(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|book| book.upc.as_str())
    }
}
