use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::chart::{render_chart, ChartConfig, ChartKind};
use crate::color::ColorMap;
use crate::data::aggregate::{aggregate, Aggregation, SkippedFile};
use crate::data::discovery::discover_case_files;
use crate::data::filter::{coefficient_series, lift_to_drag_series, merge_polar};
use crate::data::model::{CoefficientType, SummaryTable};
use crate::data::summary::{read_summary, write_summary};

/// Printed when no case file produced a record.
pub const NO_DATA_GUIDANCE: &str = "\
ERROR: No data was successfully processed. Check that:
1. Your input files are in the specified directory.
2. Filenames match '(drag|lift)_Re<number>_aoa<number>.csv'.
3. Files contain data with at least 3 columns.";

// ---------------------------------------------------------------------------
// Configuration and outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub chart: ChartConfig,
    /// Write the summary table only.
    pub skip_plots: bool,
}

#[derive(Debug)]
pub struct RunReport {
    pub summary_path: PathBuf,
    pub records: usize,
    pub charts: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// Nothing was extracted; no output was written.
    NoData { skipped: Vec<SkippedFile> },
    Completed(RunReport),
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Discover → extract → persist → render.
pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    let files = discover_case_files(&config.input_dir)?;
    info!(
        "Found {} case file(s) in {}",
        files.len(),
        config.input_dir.display()
    );

    let Aggregation { table, skipped } = aggregate(&files);
    if table.is_empty() {
        return Ok(RunOutcome::NoData { skipped });
    }
    info!(
        "Extracted {} record(s), skipped {} file(s)",
        table.len(),
        skipped.len()
    );

    let summary_path = write_summary(&table, &config.output_dir)?;
    let charts = if config.skip_plots {
        Vec::new()
    } else {
        render_all(&table, &config.output_dir, &config.chart)?
    };

    Ok(RunOutcome::Completed(RunReport {
        summary_path,
        records: table.len(),
        charts,
        skipped,
    }))
}

/// Re-render the charts from a previously written summary table.
///
/// Returns `None` when the table holds no records.
pub fn replot(
    summary_csv: &Path,
    output_dir: &Path,
    chart: &ChartConfig,
) -> Result<Option<Vec<PathBuf>>> {
    let table = read_summary(summary_csv)?;
    if table.is_empty() {
        return Ok(None);
    }
    info!(
        "Loaded {} record(s) from {}",
        table.len(),
        summary_csv.display()
    );
    render_all(&table, output_dir, chart).map(Some)
}

/// Drag, lift and L/D charts, skipping any with no data.
pub fn render_all(
    table: &SummaryTable,
    output_dir: &Path,
    chart: &ChartConfig,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let colors = ColorMap::new(&table.reynolds_numbers());
    let merged = merge_polar(table);
    for row in &merged {
        debug!(
            "Re {} AoA {}: Cl {} / Cd {} = {}",
            row.reynolds_number, row.angle_of_attack, row.cl, row.cd, row.l_over_d
        );
    }

    let views = [
        (ChartKind::Drag, coefficient_series(table, CoefficientType::Drag)),
        (ChartKind::Lift, coefficient_series(table, CoefficientType::Lift)),
        (ChartKind::LiftToDrag, lift_to_drag_series(&merged)),
    ];

    let mut written = Vec::new();
    for (kind, series) in &views {
        if let Some(path) = render_chart(*kind, series, &colors, output_dir, chart)
            .with_context(|| format!("rendering {}", kind.file_name()))?
        {
            written.push(path);
        }
    }
    Ok(written)
}
