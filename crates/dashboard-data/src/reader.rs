//! CSV dataset discovery and loading.
//!
//! Each logical dataset is looked up across an ordered list of candidate
//! directories; the first file that opens with the expected header wins.

use std::fs::File;
use std::path::{Path, PathBuf};

use dashboard_core::models::{RawDayRecord, RawHourRecord, DAY_COLUMNS, HOUR_COLUMNS};
use dashboard_core::{DashboardError, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Directories searched when the caller supplies none, in order.
pub const DEFAULT_DATA_DIRS: &[&str] = &["submission/data/archive", "data/archive"];

// ── DatasetKind ───────────────────────────────────────────────────────────────

/// The two logical datasets the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Day,
    Hour,
}

impl DatasetKind {
    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::Day => "day",
            DatasetKind::Hour => "hour",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            DatasetKind::Day => "day.csv",
            DatasetKind::Hour => "hour.csv",
        }
    }

    /// Columns the header row must contain.
    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            DatasetKind::Day => DAY_COLUMNS,
            DatasetKind::Hour => HOUR_COLUMNS,
        }
    }
}

// ── LoadedTable ───────────────────────────────────────────────────────────────

/// Rows read from one candidate file.
#[derive(Debug, Clone)]
pub struct LoadedTable<T> {
    /// The file the rows came from.
    pub source: PathBuf,
    pub rows: Vec<T>,
    /// Rows that could not be decoded and were skipped.
    pub rejected: usize,
}

// ── DataLoader ────────────────────────────────────────────────────────────────

/// Ordered candidate directories for the `day` and `hour` datasets.
#[derive(Debug, Clone)]
pub struct DataLoader {
    dirs: Vec<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIRS.iter().map(PathBuf::from).collect())
    }
}

impl DataLoader {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Default candidates with `dir` tried first.
    pub fn with_preferred_dir(dir: PathBuf) -> Self {
        let mut loader = Self::default();
        loader.dirs.insert(0, dir);
        loader
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Candidate file paths for `kind`, in probe order.
    pub fn candidate_paths(&self, kind: DatasetKind) -> Vec<PathBuf> {
        self.dirs.iter().map(|d| d.join(kind.file_name())).collect()
    }

    pub fn load_days(&self) -> Result<LoadedTable<RawDayRecord>> {
        self.load(DatasetKind::Day)
    }

    pub fn load_hours(&self) -> Result<LoadedTable<RawHourRecord>> {
        self.load(DatasetKind::Hour)
    }

    /// Try every candidate in order and return the first usable table.
    ///
    /// Fails with [`DashboardError::DataNotFound`] once all candidates are
    /// exhausted.
    pub fn load<T: DeserializeOwned>(&self, kind: DatasetKind) -> Result<LoadedTable<T>> {
        let candidates = self.candidate_paths(kind);

        for path in &candidates {
            if !path.is_file() {
                debug!("{} dataset: no file at {}", kind.name(), path.display());
                continue;
            }
            match read_table(path, kind) {
                Ok(table) => {
                    info!(
                        "Loaded {} dataset from {} ({} rows, {} rejected)",
                        kind.name(),
                        path.display(),
                        table.rows.len(),
                        table.rejected
                    );
                    return Ok(table);
                }
                Err(e) => {
                    warn!(
                        "Skipping {} candidate {}: {}",
                        kind.name(),
                        path.display(),
                        e
                    );
                }
            }
        }

        Err(DashboardError::DataNotFound {
            dataset: kind.name().to_string(),
            candidates,
        })
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Read a single CSV file, checking its header against the dataset schema.
fn read_table<T: DeserializeOwned>(path: &Path, kind: DatasetKind) -> Result<LoadedTable<T>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let headers = reader.headers()?.clone();
    let missing: Vec<&str> = kind
        .required_columns()
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::Schema(format!(
            "missing column(s): {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    let mut rejected = 0usize;

    for (line, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                rejected += 1;
                // Header is line 1, so data row `line` sits on line `line + 2`.
                warn!("{}:{}: rejected row: {}", path.display(), line + 2, e);
            }
        }
    }

    Ok(LoadedTable {
        source: path.to_path_buf(),
        rows,
        rejected,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
