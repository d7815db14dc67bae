//! Dataset loading service
//!
//! Reads a delimited text file into records.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{Record, Value};
use crate::infrastructure::traits::FileSystem;

/// How cells of a dataset file are split and interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFormat {
    pub delimiter: u8,
    /// Cell contents that read as a missing value
    pub missing_values: Vec<String>,
}

impl Default for DatasetFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing_values: vec!["".into(), "N/A".into()],
        }
    }
}

impl DatasetFormat {
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        if !settings.delimiter.is_ascii() {
            return Err(ApplicationError::Config {
                message: format!("delimiter must be ASCII, got '{}'", settings.delimiter),
            });
        }
        Ok(Self {
            delimiter: settings.delimiter as u8,
            missing_values: settings.missing_values.clone(),
        })
    }
}

/// Parsed dataset: header columns plus one record per row.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: PathBuf,
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Service for loading datasets from disk.
pub struct DatasetService {
    fs: Arc<dyn FileSystem>,
    format: DatasetFormat,
}

impl DatasetService {
    pub fn new(fs: Arc<dyn FileSystem>, format: DatasetFormat) -> Self {
        Self { fs, format }
    }

    /// Load and parse the dataset at `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Dataset> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::DatasetNotFound(path.to_path_buf()));
        }
        if !self.fs.is_file(path) {
            return Err(ApplicationError::InvalidDataset {
                path: path.to_path_buf(),
                message: "not a file".to_string(),
            });
        }

        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read dataset", path)?;
        let dataset = parse_dataset(&content, path, &self.format)?;
        debug!(
            "loaded {} records with {} columns from {}",
            dataset.len(),
            dataset.columns.len(),
            path.display()
        );
        Ok(dataset)
    }
}

/// Parse delimited text with a header row.
///
/// Every row must have as many cells as the header. `source` only names the
/// input in error messages.
pub fn parse_dataset(content: &str, source: &Path, format: &DatasetFormat) -> ApplicationResult<Dataset> {
    let invalid = |message: String| ApplicationError::InvalidDataset {
        path: source.to_path_buf(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| invalid(format!("header: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        // header is line 1
        let row = row.map_err(|e| invalid(format!("row {}: {}", idx + 2, e)))?;
        let record: Record = columns
            .iter()
            .zip(row.iter())
            .map(|(column, cell)| (column.clone(), Value::parse(cell, &format.missing_values)))
            .collect();
        records.push(record);
    }

    Ok(Dataset {
        source: source.to_path_buf(),
        columns,
        records,
    })
}
