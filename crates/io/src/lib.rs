//! `quizkey-io` — spreadsheet export reading.
//!
//! Normalizes CSV/TSV and Excel-family files to one shape: a header row plus
//! string rows. Column semantics live upstream; this crate knows nothing
//! about questions or answers.

use std::fmt;
use std::path::Path;

pub mod csv;
pub mod xlsx;

/// A sheet as headers + string rows. Row cells keep their worksheet order;
/// trailing empty cells are preserved as empty strings where the source
/// format provides them.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum IoError {
    Read { path: String, message: String },
    Parse { path: String, message: String },
    SheetNotFound { path: String, sheet: String },
    UnknownFormat { path: String },
    EmptySheet { path: String, sheet: String },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Parse { path, message } => write!(f, "cannot parse {path}: {message}"),
            Self::SheetNotFound { path, sheet } => {
                write!(f, "{path}: no sheet named '{sheet}'")
            }
            Self::UnknownFormat { path } => {
                write!(f, "{path}: unrecognized extension (expected csv, tsv, xlsx, xls, xlsb, or ods)")
            }
            Self::EmptySheet { path, sheet } => {
                write!(f, "{path}: sheet '{sheet}' has no header row")
            }
        }
    }
}

impl std::error::Error for IoError {}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Read one sheet of a spreadsheet file, dispatching on extension.
///
/// `sheet` selects a worksheet by name for Excel-family files (first sheet
/// when `None`); it is ignored for CSV/TSV, which have only one.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" | "txt" => csv::import(path),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => xlsx::import(path, sheet),
        _ => Err(IoError::UnknownFormat { path: path.display().to_string() }),
    }
}
