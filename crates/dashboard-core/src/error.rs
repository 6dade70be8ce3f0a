use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// All errors produced by the strike dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input (bad quoting, ragged rows, ...).
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A column required by the pipeline is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A launch timestamp could not be parsed as a calendar date.
    #[error("Invalid launch timestamp at row {row}: {value:?}")]
    InvalidTimestamp { row: usize, value: String },

    /// A launched/destroyed cell is empty or not an integer.
    #[error("Invalid {column} count at row {row}: {value:?}")]
    InvalidCount {
        row: usize,
        column: String,
        value: String,
    },

    /// Summing the counts of one day or month left the `i64` range.
    #[error("Count total overflows at {date}")]
    CountOverflow { date: NaiveDate },

    /// No dataset file could be located by the configured source.
    #[error("Dataset not found: {0}")]
    DatasetNotFound(PathBuf),

    /// A dataset archive could not be opened or its CSV member extracted.
    #[error("Failed to read archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Tables were requested before the dataset was fetched.
    #[error("Dataset has not been loaded yet")]
    NotLoaded,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The export document could not be serialised.
    #[error("Failed to serialize JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
