//! Output module for persisting the book dataset
//!
//! This module handles:
//! - Writing the dataset to a CSV file
//! - Replacing a SQLite table with the dataset contents
//!
//! Both sinks are independent; either may run first.

mod csv_export;
mod sqlite_export;
mod traits;

pub use csv_export::{write_csv, CsvExporter};
pub use sqlite_export::{write_table, SqliteExporter};
pub use traits::{DatasetExporter, OutputError, OutputResult};

use crate::config::OutputConfig;

/// Builds the configured exporters, in the order they should run
///
/// # Arguments
///
/// * `config` - The output configuration
/// * `csv_only` - Leave out the database sink
pub fn exporters_for(config: &OutputConfig, csv_only: bool) -> Vec<Box<dyn DatasetExporter>> {
    let mut exporters: Vec<Box<dyn DatasetExporter>> =
        vec![Box::new(CsvExporter::new(&config.csv_path))];

    if !csv_only {
        exporters.push(Box::new(SqliteExporter::new(
            &config.database_path,
            &config.table_name,
        )));
    }

    exporters
}
