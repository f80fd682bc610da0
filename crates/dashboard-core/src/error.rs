use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// All errors produced by the bike-rental dashboard.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// No candidate location yielded a parseable dataset.
    #[error("Dataset '{dataset}' not found (tried {} location(s))", .candidates.len())]
    DataNotFound {
        dataset: String,
        candidates: Vec<PathBuf>,
    },

    /// An integer category code (or label) outside the known enumeration.
    #[error("Unknown {field} category: {value}")]
    UnknownCategory { field: &'static str, value: String },

    /// A date-range filter whose start lies after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A date string did not match any recognised format.
    #[error("Invalid date format: {0}")]
    DateParse(String),

    /// A single row violates the record schema (hour range, count totals).
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// A table's header does not carry the expected columns.
    #[error("Schema mismatch: {0}")]
    Schema(String),

    /// A CSV document could not be read or decoded.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed or written.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    /// Errors that reject one row but leave the rest of the table usable.
    pub fn is_row_level(&self) -> bool {
        matches!(self, DashboardError::DateParse(_) | DashboardError::InvalidRow(_))
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
