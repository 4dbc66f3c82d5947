//! Exporter trait and error types

use crate::dataset::BookDataset;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for dataset sinks
///
/// An exporter receives the finished dataset and writes all of it. It must not
/// modify the dataset.
pub trait DatasetExporter {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Writes the dataset
    ///
    /// # Returns
    ///
    /// The number of rows written
    fn export(&self, dataset: &BookDataset) -> OutputResult<usize>;
}
