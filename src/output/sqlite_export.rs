//! SQLite exporter
//!
//! Replaces a named table with the dataset contents on every run. Column types
//! follow the in-memory types of each column; no key or constraint is declared.

use crate::dataset::{BookDataset, COLUMNS};
use crate::output::traits::{DatasetExporter, OutputResult};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// SQL type of each column, aligned with `COLUMNS`
const COLUMN_TYPES: [&str; 10] = [
    "TEXT",    // upc
    "TEXT",    // title
    "TEXT",    // category
    "TEXT",    // product_type
    "REAL",    // price_excl_tax
    "REAL",    // price_incl_tax
    "TEXT",    // tax
    "INTEGER", // stock_text
    "TEXT",    // number_of_reviews
    "INTEGER", // rating
];

/// Writes the dataset into a SQLite database file
pub struct SqliteExporter {
    database_path: PathBuf,
    table_name: String,
}

impl SqliteExporter {
    /// Creates a new SQLite exporter
    ///
    /// # Arguments
    ///
    /// * `database_path` - Path to the SQLite database file
    /// * `table_name` - Table dropped and recreated on export
    pub fn new(database_path: impl AsRef<Path>, table_name: &str) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
            table_name: table_name.to_string(),
        }
    }
}

impl DatasetExporter for SqliteExporter {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn export(&self, dataset: &BookDataset) -> OutputResult<usize> {
        let mut conn = Connection::open(&self.database_path)?;
        let rows = write_table(&mut conn, &self.table_name, dataset)?;
        tracing::info!(
            "Replaced table '{}' in {} with {} rows",
            self.table_name,
            self.database_path.display(),
            rows
        );
        Ok(rows)
    }
}

/// Drops and recreates `table` and inserts every row, in one transaction
///
/// Missing stock and a missing rating node are stored as NULL. The table name
/// must be a plain identifier; configuration validation guarantees that.
pub fn write_table(
    conn: &mut Connection,
    table: &str,
    dataset: &BookDataset,
) -> OutputResult<usize> {
    let column_defs = COLUMNS
        .iter()
        .zip(COLUMN_TYPES)
        .map(|(name, ty)| format!("\"{}\" {}", name, ty))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=COLUMNS.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS \"{table}\";
         CREATE TABLE \"{table}\" ({column_defs});"
    ))?;

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO \"{table}\" VALUES ({placeholders})"
        ))?;

        for book in &dataset.rows {
            stmt.execute(params![
                book.upc,
                book.title,
                book.category,
                book.product_type,
                book.price_excl_tax,
                book.price_incl_tax,
                book.tax,
                book.stock,
                book.number_of_reviews,
                book.rating.value(),
            ])?;
        }
    }

    tx.commit()?;
    Ok(dataset.len())
}
