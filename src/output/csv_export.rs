//! CSV exporter
//!
//! Writes a header row of the dataset columns followed by one row per book, in
//! dataset order. The index is a regular column; no extra index column is added.

use crate::dataset::{BookDataset, COLUMNS};
use crate::output::traits::{DatasetExporter, OutputResult};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the dataset to a comma-delimited UTF-8 file
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serializes the dataset into any writer
pub fn write_csv<W: Write>(writer: W, dataset: &BookDataset) -> OutputResult<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS)?;

    for book in &dataset.rows {
        wtr.write_record(book.to_csv_record())?;
    }

    wtr.flush()?;
    Ok(dataset.len())
}

impl DatasetExporter for CsvExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn export(&self, dataset: &BookDataset) -> OutputResult<usize> {
        let file = std::fs::File::create(&self.path)?;
        let rows = write_csv(file, dataset)?;
        tracing::info!("Wrote {} rows to {}", rows, self.path.display());
        Ok(rows)
    }
}
