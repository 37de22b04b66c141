//! Input sheet loading
//!
//! Provisioning sheets come in two flavours, chosen by file extension:
//! - `.csv`  -> delimited text, first record is the header row
//! - `.xlsx` -> first worksheet of a workbook, first row is the header row
//!
//! Every data row becomes a [`Row`] keyed by the header text of its column.

pub mod delimited;
pub mod excel;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// One data row of an input sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    /// 1-based line (CSV) or row (XLSX) number in the source file, header included
    pub line: usize,
    cells: HashMap<String, String>,
}

impl Row {
    pub fn new(line: usize, cells: HashMap<String, String>) -> Self {
        Self { line, cells }
    }

    /// Cell text for a header, `None` when the sheet has no such column
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Xlsx,
}

impl InputFormat {
    /// Detect format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|os| os.to_str())
            .unwrap_or_default();

        match ext.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(LoadError::UnsupportedFormat {
                extension: ext.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Csv => write!(f, "CSV"),
            InputFormat::Xlsx => write!(f, "XLSX"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file format '.{extension}', use .csv or .xlsx")]
    UnsupportedFormat { extension: String },

    #[error("file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to read input file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Load every data row of the sheet at `path`, in file order
pub fn load_rows(path: &Path) -> Result<Vec<Row>, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let format = InputFormat::from_path(path)?;
    log::debug!("Reading {} input from {}", format, path.display());

    let rows = match format {
        InputFormat::Csv => delimited::read_csv(path),
        InputFormat::Xlsx => excel::read_xlsx(path),
    }
    .map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
