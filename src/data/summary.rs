use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use super::model::{CaseRecord, SummaryTable};

pub const SUMMARY_FILE_NAME: &str = "summary_coefficients_lift_drag.csv";

/// Write the summary table to `<output_dir>/summary_coefficients_lift_drag.csv`
/// with a `Coefficient_Type,Re,AoA,Final_Coefficient` header.
///
/// Creates `output_dir` if needed and overwrites an existing file.
pub fn write_summary(table: &SummaryTable, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let path = output_dir.join(SUMMARY_FILE_NAME);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    // An empty table still gets its header.
    if table.is_empty() {
        writer.write_record(["Coefficient_Type", "Re", "AoA", "Final_Coefficient"])?;
    }
    for record in table.records() {
        writer
            .serialize(record)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer.flush().context("flushing summary CSV")?;

    info!("Wrote {} record(s) to {}", table.len(), path.display());
    Ok(path)
}

/// Read a summary table previously written by [`write_summary`].
pub fn read_summary(path: &Path) -> Result<SummaryTable> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;

    let records = reader
        .deserialize::<CaseRecord>()
        .enumerate()
        .map(|(row, result)| result.with_context(|| format!("summary CSV row {row}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(SummaryTable::from_records(records))
}
