//! Tabular input handling
//!
//! Transactions and exchange rates both arrive as columnar files. Parquet is
//! the default layout; files ending in `.csv` go through the CSV reader.

pub mod dates;
pub mod fx;

use crate::error::{EdaError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// On-disk layout of an input table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Parquet,
    Csv,
}

impl TableFormat {
    /// Pick the reader from the file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => TableFormat::Csv,
            _ => TableFormat::Parquet,
        }
    }
}

/// Read a whole table into memory.
///
/// Fails with [`EdaError::FileNotFound`] before touching the reader when the
/// path does not resolve.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(EdaError::FileNotFound(path.to_path_buf()));
    }

    let df = match TableFormat::from_path(path) {
        TableFormat::Parquet => {
            let file = File::open(path)?;
            ParquetReader::new(file).finish()?
        }
        TableFormat::Csv => CsvReader::from_path(path)?
            .has_header(true)
            .infer_schema(Some(1000))
            .finish()?,
    };

    log::debug!("Read {} with schema {:?}", path.display(), df.schema());
    Ok(df)
}

/// Load the transaction record set
pub fn load_transactions(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    log::info!("Loading transactions from {}", path.display());

    let df = read_table(path)?;
    log::info!(
        "Loaded {} transactions with {} columns",
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Check whether a frame carries a column
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|column| *column == name)
}

/// Fetch a column that must be present, naming the table in the error
pub fn require_column<'a>(df: &'a DataFrame, name: &str, table: &str) -> Result<&'a Series> {
    if !has_column(df, name) {
        return Err(EdaError::missing_column(name, table));
    }
    Ok(df.column(name)?)
}
