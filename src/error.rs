//! Error types for fraud-eda

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fraud-eda
#[derive(Error, Debug)]
pub enum EdaError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Missing required column '{column}' in {table}")]
    MissingColumn { column: String, table: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Data error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EdaError {
    pub fn missing_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        EdaError::MissingColumn {
            column: column.into(),
            table: table.into(),
        }
    }
}

/// Result type alias for fraud-eda operations
pub type Result<T> = std::result::Result<T, EdaError>;
