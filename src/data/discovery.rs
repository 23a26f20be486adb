use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use log::{debug, warn};
use regex::Regex;

use super::model::CoefficientType;

// ---------------------------------------------------------------------------
// File name classification
// ---------------------------------------------------------------------------

/// A case file whose name follows `{drag|lift}_Re<digits>_aoa<digits>.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFile {
    pub path: PathBuf,
    pub file_name: String,
    pub coefficient_type: CoefficientType,
    pub reynolds_number: u64,
    pub angle_of_attack: i64,
}

fn case_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(drag|lift)_Re(\d+)_aoa(\d+)\.csv").expect("regex is valid")
    })
}

/// Classify a file name. Only the start of the name is matched, so anything
/// after the `.csv` of the convention is ignored. Returns `None` for names
/// that do not follow the convention, including digit runs too large to decode.
pub fn classify(path: &Path) -> Option<CaseFile> {
    let file_name = path.file_name()?.to_str()?;
    let caps = case_name_regex().captures(file_name)?;

    let coefficient_type = caps[1].parse::<CoefficientType>().ok()?;
    let reynolds_number = caps[2].parse::<u64>().ok()?;
    let angle_of_attack = caps[3].parse::<i64>().ok()?;

    Some(CaseFile {
        path: path.to_path_buf(),
        file_name: file_name.to_string(),
        coefficient_type,
        reynolds_number,
        angle_of_attack,
    })
}

// ---------------------------------------------------------------------------
// Directory scan
// ---------------------------------------------------------------------------

/// Glob `<dir>/*.csv` and keep the files that classify as case files,
/// sorted by file name so runs are reproducible across platforms.
///
/// A missing directory simply yields no files.
pub fn discover_case_files(dir: &Path) -> Result<Vec<CaseFile>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join("*.csv");
    let pattern = pattern.to_string_lossy();

    let mut paths: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern {pattern}"))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Unreadable directory entry: {e}");
                None
            }
        })
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let files: Vec<CaseFile> = paths.iter().filter_map(|p| classify(p)).collect();
    debug!(
        "{} csv file(s) in {}, {} match the case naming convention",
        paths.len(),
        dir.display(),
        files.len()
    );
    Ok(files)
}
