//! Cleanup and type coercion of extracted records

use crate::dataset::record::{Book, BookRecord};
use crate::dataset::{BookDataset, BuildError};
use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("static regex"));

/// Builds the dataset from extracted records
///
/// Row order follows record order. Prices that are not numeric once the
/// currency symbol is stripped abort the build.
///
/// # Arguments
///
/// * `records` - Extracted records in visit order
/// * `currency_symbol` - Prefix stripped from prices and tax
///
/// # Returns
///
/// * `Ok(BookDataset)` - One row per record
/// * `Err(BuildError)` - A price could not be coerced
pub fn build_dataset(
    records: Vec<BookRecord>,
    currency_symbol: &str,
) -> Result<BookDataset, BuildError> {
    let rows = records
        .into_iter()
        .map(|record| clean_record(record, currency_symbol))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!("Built dataset with {} rows", rows.len());

    Ok(BookDataset { rows })
}

fn clean_record(record: BookRecord, currency_symbol: &str) -> Result<Book, BuildError> {
    let price_excl_tax = coerce_price(
        &record,
        "price_excl_tax",
        &record.price_excl_tax,
        currency_symbol,
    )?;
    let price_incl_tax = coerce_price(
        &record,
        "price_incl_tax",
        &record.price_incl_tax,
        currency_symbol,
    )?;
    let tax = strip_currency(&record.tax, currency_symbol).to_string();
    let stock = extract_stock(&record.stock_text);

    Ok(Book {
        upc: record.upc,
        title: record.title,
        category: record.category,
        product_type: record.product_type,
        price_excl_tax,
        price_incl_tax,
        tax,
        stock,
        number_of_reviews: record.number_of_reviews,
        rating: record.rating,
    })
}

fn coerce_price(
    record: &BookRecord,
    field: &'static str,
    value: &str,
    currency_symbol: &str,
) -> Result<f64, BuildError> {
    parse_price(value, currency_symbol).ok_or_else(|| BuildError::Coercion {
        upc: record.upc.clone(),
        field,
        value: value.to_string(),
    })
}

/// Removes one leading currency symbol, if present
pub fn strip_currency<'a>(text: &'a str, currency_symbol: &str) -> &'a str {
    let text = text.trim();
    text.strip_prefix(currency_symbol).unwrap_or(text).trim()
}

/// Parses a price cell such as `£51.77`
///
/// Text without the symbol is parsed as is, so coercing an already numeric
/// value gives the same number back.
pub fn parse_price(text: &str, currency_symbol: &str) -> Option<f64> {
    strip_currency(text, currency_symbol)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// First run of digits in an availability text, e.g. `In stock (22 available)`
pub fn extract_stock(text: &str) -> Option<i64> {
    DIGITS.find(text).and_then(|m| m.as_str().parse().ok())
}
