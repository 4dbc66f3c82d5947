//! Book records at the two stages of the pipeline
//!
//! `BookRecord` holds the raw cell text read from a detail page; `Book` is the
//! cleaned row that the exporters write.

/// Star rating of a book
///
/// Two "missing" states are kept apart: the rating node may be absent from the
/// page entirely, or present without any star marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    /// The `star-rating` node is not on the page
    Missing,
    /// The node exists but carries none of the five markers
    Unrated,
    /// One to five stars
    Stars(u8),
}

impl Rating {
    /// Maps a star-count class name (`One`..`Five`) to a rating
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "One" => Some(Self::Stars(1)),
            "Two" => Some(Self::Stars(2)),
            "Three" => Some(Self::Stars(3)),
            "Four" => Some(Self::Stars(4)),
            "Five" => Some(Self::Stars(5)),
            _ => None,
        }
    }

    /// Numeric value, `None` when the node was absent
    pub fn value(&self) -> Option<u8> {
        match self {
            Self::Missing => None,
            Self::Unrated => Some(0),
            Self::Stars(n) => Some(*n),
        }
    }

    /// Text of the CSV cell: empty, `0`, or the star count
    pub fn as_cell(&self) -> String {
        self.value().map(|v| v.to_string()).unwrap_or_default()
    }
}

/// Raw attributes of one book, as read from its detail page
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub upc: String,
    pub title: String,
    pub category: String,
    pub product_type: String,
    pub price_excl_tax: String,
    pub price_incl_tax: String,
    pub tax: String,
    pub stock_text: String,
    pub number_of_reviews: String,
    pub rating: Rating,
}

/// One cleaned dataset row
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub upc: String,
    pub title: String,
    pub category: String,
    pub product_type: String,
    pub price_excl_tax: f64,
    pub price_incl_tax: f64,
    /// Currency symbol stripped, not coerced
    pub tax: String,
    /// Units in stock, `None` when the availability text has no number
    pub stock: Option<i64>,
    pub number_of_reviews: String,
    pub rating: Rating,
}

impl Book {
    /// Cells of this row in `COLUMNS` order
    pub fn to_csv_record(&self) -> Vec<String> {
        vec![
            self.upc.clone(),
            self.title.clone(),
            self.category.clone(),
            self.product_type.clone(),
            format_price(self.price_excl_tax),
            format_price(self.price_incl_tax),
            self.tax.clone(),
            self.stock.map(|s| s.to_string()).unwrap_or_default(),
            self.number_of_reviews.clone(),
            self.rating.as_cell(),
        ]
    }
}

/// Prices keep a decimal point even when whole, e.g. `10.0`
fn format_price(value: f64) -> String {
    format!("{:?}", value)
}
