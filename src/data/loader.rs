use std::path::Path;

use csv::StringRecord;
use thiserror::Error;

use super::model::CoefficientValue;

/// Zero-based column holding the coefficient history.
pub const COEFFICIENT_COLUMN: usize = 2;

// ---------------------------------------------------------------------------
// Per-file errors
// ---------------------------------------------------------------------------

/// Why a single case file contributed no record.
#[derive(Debug, Error)]
pub enum CaseFileError {
    /// No rows, or fewer than three columns.
    #[error("Empty or malformed (expected at least 3 columns)")]
    Malformed { rows: usize, columns: usize },

    /// A row wider than the first one.
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    Ragged {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// I/O, UTF-8 or CSV syntax failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Read a headerless case file and return its final coefficient
/// (last row, third column).
///
/// The table width is taken from the first row. Later rows may be shorter
/// (missing cells) but not wider. Blank lines are ignored.
pub fn load_final_coefficient(path: &Path) -> Result<CoefficientValue, CaseFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut columns: Option<usize> = None;
    let mut rows = 0usize;
    let mut last: Option<StringRecord> = None;

    for result in reader.records() {
        let record = result?;
        let expected = *columns.get_or_insert(record.len());
        if record.len() > expected {
            return Err(CaseFileError::Ragged {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected,
                found: record.len(),
            });
        }
        rows += 1;
        last = Some(record);
    }

    let columns = columns.unwrap_or(0);
    match last {
        Some(record) if columns > COEFFICIENT_COLUMN => Ok(record
            .get(COEFFICIENT_COLUMN)
            .map(CoefficientValue::parse)
            .unwrap_or(CoefficientValue::Missing)),
        _ => Err(CaseFileError::Malformed { rows, columns }),
    }
}
