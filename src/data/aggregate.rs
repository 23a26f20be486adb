use std::fmt;

use log::{debug, warn};

use super::discovery::CaseFile;
use super::loader::{load_final_coefficient, CaseFileError};
use super::model::{CaseRecord, SummaryTable};

/// A case file that matched the naming convention but yielded no record.
#[derive(Debug)]
pub struct SkippedFile {
    pub file_name: String,
    pub error: CaseFileError,
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            CaseFileError::Malformed { .. } => {
                write!(f, "Skipping file {}: {}.", self.file_name, self.error)
            }
            other => write!(f, "Error processing file {}: {other}", self.file_name),
        }
    }
}

/// Result of folding every discovered case file.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub table: SummaryTable,
    pub skipped: Vec<SkippedFile>,
}

/// Extract each file's final coefficient into the summary table, in the
/// order given. A failing file is recorded in `skipped` and never stops
/// the fold.
pub fn aggregate(files: &[CaseFile]) -> Aggregation {
    files.iter().fold(Aggregation::default(), extract_and_append)
}

fn extract_and_append(acc: Aggregation, file: &CaseFile) -> Aggregation {
    let Aggregation { table, mut skipped } = acc;
    match load_final_coefficient(&file.path) {
        Ok(value) => {
            debug!("{}: final coefficient {value}", file.file_name);
            let record = CaseRecord {
                coefficient_type: file.coefficient_type,
                reynolds_number: file.reynolds_number,
                angle_of_attack: file.angle_of_attack,
                final_coefficient: value,
            };
            Aggregation {
                table: table.with_record(record),
                skipped,
            }
        }
        Err(error) => {
            match &error {
                CaseFileError::Malformed { rows, columns } => warn!(
                    "{}: {rows} row(s) x {columns} column(s), need at least 3 columns",
                    file.file_name
                ),
                other => warn!("{}: {other}", file.file_name),
            }
            skipped.push(SkippedFile {
                file_name: file.file_name.clone(),
                error,
            });
            Aggregation { table, skipped }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::discovery::discover_case_files;
    use crate::data::model::{CoefficientType, CoefficientValue};
    use tempfile::TempDir;

    #[test]
    fn test_single_drag_file_yields_one_record() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("drag_Re100000_aoa5.csv"),
            "0,0.0,1.0\n1,0.1,2.5\n",
        )
        .unwrap();

        let files = discover_case_files(dir.path()).unwrap();
        let agg = aggregate(&files);

        assert!(agg.skipped.is_empty());
        assert_eq!(
            agg.table.records(),
            &[CaseRecord {
                coefficient_type: CoefficientType::Drag,
                reynolds_number: 100_000,
                angle_of_attack: 5,
                final_coefficient: CoefficientValue::Number(2.5),
            }]
        );
    }

    #[test]
    fn test_bad_file_is_isolated() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("drag_Re1_aoa0.csv"), "1,2\n").unwrap();
        std::fs::write(dir.path().join("drag_Re1_aoa2.csv"), "1,2,3\n1,2,3,4\n").unwrap();
        std::fs::write(dir.path().join("lift_Re1_aoa0.csv"), "1,2,0.7\n").unwrap();

        let files = discover_case_files(dir.path()).unwrap();
        let agg = aggregate(&files);

        assert_eq!(agg.table.len(), 1);
        assert_eq!(agg.skipped.len(), 2);
        assert_eq!(
            agg.skipped[0].to_string(),
            "Skipping file drag_Re1_aoa0.csv: Empty or malformed (expected at least 3 columns)."
        );
        assert!(agg.skipped[1]
            .to_string()
            .starts_with("Error processing file drag_Re1_aoa2.csv: "));
    }

    #[test]
    fn test_duplicate_keys_are_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lift_Re10_aoa1.csv");
        std::fs::write(&path, "0,0,0.4\n").unwrap();
        let file = crate::data::discovery::classify(&path).unwrap();

        let agg = aggregate(&[file.clone(), file]);
        assert_eq!(agg.table.len(), 2);
    }

    #[test]
    fn test_no_files_is_empty() {
        let agg = aggregate(&[]);
        assert!(agg.table.is_empty());
        assert!(agg.skipped.is_empty());
    }
}
