use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use plotters::prelude::*;

use crate::color::ColorMap;
use crate::data::filter::Series;

const X_LABEL: &str = "Angle of Attack, α (deg)";
const FONT: &str = "sans-serif";

// ---------------------------------------------------------------------------
// Chart descriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
}

/// The three polar charts written next to the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Drag,
    Lift,
    LiftToDrag,
}

impl ChartKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::Drag => "drag_coefficient_vs_aoa.png",
            ChartKind::Lift => "lift_coefficient_vs_aoa.png",
            ChartKind::LiftToDrag => "LD_vs_aoa.png",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            ChartKind::Drag => "Drag Coefficient, Cd",
            ChartKind::Lift => "Lift Coefficient, Cl",
            ChartKind::LiftToDrag => "Lift-to-Drag Ratio, L/D",
        }
    }

    pub fn marker(self) -> Marker {
        match self {
            ChartKind::Drag => Marker::Circle,
            ChartKind::Lift => Marker::Square,
            ChartKind::LiftToDrag => Marker::Triangle,
        }
    }
}

/// Raster size of every chart, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        // 8 x 6 in at 100 dpi
        Self {
            width: 800,
            height: 600,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render one chart into `output_dir`, one line per series.
///
/// Returns `Ok(None)` without touching the filesystem when `series` is empty.
/// Non-finite values are not drawn and break the line they belong to.
pub fn render_chart(
    kind: ChartKind,
    series: &[Series],
    colors: &ColorMap,
    output_dir: &Path,
    config: &ChartConfig,
) -> Result<Option<PathBuf>> {
    if series.is_empty() {
        return Ok(None);
    }

    let path = output_dir.join(kind.file_name());
    let (x_range, y_range) = axis_ranges(series);
    let corner = best_legend_corner(&finite_points(series), &x_range, &y_range);

    {
        let root = BitMapBackend::new(&path, (config.width, config.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(55)
            .y_label_area_size(75)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(X_LABEL)
            .y_desc(kind.y_label())
            .axis_desc_style((FONT, 18))
            .label_style((FONT, 15))
            .draw()?;

        for s in series {
            let color = colors.color_for(s.reynolds_number);

            for segment in finite_segments(&s.points) {
                chart.draw_series(LineSeries::new(segment, color.stroke_width(2)))?;
            }

            let points: Vec<(f64, f64)> = finite_segments(&s.points).concat();
            if points.is_empty() {
                continue;
            }

            let anno = match kind.marker() {
                Marker::Circle => chart.draw_series(
                    points.iter().map(|&c| Circle::new(c, 5, color.filled())),
                )?,
                Marker::Square => chart.draw_series(points.iter().map(|&c| {
                    EmptyElement::at(c) + Rectangle::new([(-4, -4), (4, 4)], color.filled())
                }))?,
                Marker::Triangle => chart.draw_series(
                    points.iter().map(|&c| TriangleMarker::new(c, 6, color.filled())),
                )?,
            };
            anno.label(s.label()).legend(move |(x, y)| {
                PathElement::new(vec![(x - 10, y), (x + 10, y)], color.stroke_width(2))
            });
        }

        chart
            .configure_series_labels()
            .position(corner.into())
            .border_style(&TRANSPARENT)
            .background_style(&WHITE.mix(0.8))
            .label_font((FONT, 15))
            .draw()?;

        root.present()
            .with_context(|| format!("writing {}", path.display()))?;
    }

    info!("Wrote {}", path.display());
    Ok(Some(path))
}

/// Runs of consecutive finite points, as plot coordinates.
fn finite_segments(points: &[(i64, f64)]) -> Vec<Vec<(f64, f64)>> {
    points
        .split(|&(_, y)| !y.is_finite())
        .filter(|run| !run.is_empty())
        .map(|run| run.iter().map(|&(x, y)| (x as f64, y)).collect())
        .collect()
}

fn finite_points(series: &[Series]) -> Vec<(f64, f64)> {
    series
        .iter()
        .flat_map(|s| finite_segments(&s.points).concat())
        .collect()
}

/// Data bounds of all finite points with a 5 % margin on each side.
fn axis_ranges(series: &[Series]) -> (Range<f64>, Range<f64>) {
    let points = finite_points(series);
    if points.is_empty() {
        return (0.0..1.0, 0.0..1.0);
    }

    let bounds = |values: Vec<f64>| {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        padded(min, max)
    };
    (
        bounds(points.iter().map(|p| p.0).collect()),
        bounds(points.iter().map(|p| p.1).collect()),
    )
}

fn padded(min: f64, max: f64) -> Range<f64> {
    let span = max - min;
    let pad = if span > f64::EPSILON {
        span * 0.05
    } else if min.abs() > f64::EPSILON {
        min.abs() * 0.05
    } else {
        0.5
    };
    (min - pad)..(max + pad)
}

// ---------------------------------------------------------------------------
// Legend placement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendCorner {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

impl From<LegendCorner> for SeriesLabelPosition {
    fn from(corner: LegendCorner) -> Self {
        match corner {
            LegendCorner::UpperRight => SeriesLabelPosition::UpperRight,
            LegendCorner::UpperLeft => SeriesLabelPosition::UpperLeft,
            LegendCorner::LowerLeft => SeriesLabelPosition::LowerLeft,
            LegendCorner::LowerRight => SeriesLabelPosition::LowerRight,
        }
    }
}

/// Pick the plot corner covering the fewest data points. Each corner spans
/// 40 % of the axis range in both directions; ties go to the earlier corner
/// in upper-right, upper-left, lower-left, lower-right order.
pub fn best_legend_corner(
    points: &[(f64, f64)],
    x_range: &Range<f64>,
    y_range: &Range<f64>,
) -> LegendCorner {
    let normalise = |v: f64, r: &Range<f64>| {
        let span = r.end - r.start;
        if span > 0.0 {
            (v - r.start) / span
        } else {
            0.5
        }
    };
    let in_corner = |corner: LegendCorner, (x, y): (f64, f64)| {
        let (nx, ny) = (normalise(x, x_range), normalise(y, y_range));
        let right = nx >= 0.6;
        let left = nx <= 0.4;
        let upper = ny >= 0.6;
        let lower = ny <= 0.4;
        match corner {
            LegendCorner::UpperRight => upper && right,
            LegendCorner::UpperLeft => upper && left,
            LegendCorner::LowerLeft => lower && left,
            LegendCorner::LowerRight => lower && right,
        }
    };

    [
        LegendCorner::UpperRight,
        LegendCorner::UpperLeft,
        LegendCorner::LowerLeft,
        LegendCorner::LowerRight,
    ]
    .into_iter()
    .min_by_key(|&corner| points.iter().filter(|&&p| in_corner(corner, p)).count())
    .unwrap_or(LegendCorner::UpperRight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    #[test]
    fn test_chart_kinds() {
        assert_eq!(ChartKind::Drag.file_name(), "drag_coefficient_vs_aoa.png");
        assert_eq!(ChartKind::Lift.file_name(), "lift_coefficient_vs_aoa.png");
        assert_eq!(ChartKind::LiftToDrag.file_name(), "LD_vs_aoa.png");
        assert_eq!(ChartKind::Drag.marker(), Marker::Circle);
        assert_eq!(ChartKind::Lift.marker(), Marker::Square);
        assert_eq!(ChartKind::LiftToDrag.marker(), Marker::Triangle);
    }

    #[test]
    fn test_empty_series_is_noop() {
        let dir = TempDir::new().unwrap();
        let colors = ColorMap::new(&BTreeSet::new());
        let out = render_chart(
            ChartKind::Drag,
            &[],
            &colors,
            dir.path(),
            &ChartConfig::default(),
        )
        .unwrap();
        assert!(out.is_none());
        assert!(!dir.path().join("drag_coefficient_vs_aoa.png").exists());
    }

    #[test]
    fn test_finite_segments_break_on_nan() {
        let segments = finite_segments(&[
            (0, 1.0),
            (2, 2.0),
            (4, f64::NAN),
            (6, f64::INFINITY),
            (8, 3.0),
        ]);
        assert_eq!(segments, vec![vec![(0.0, 1.0), (2.0, 2.0)], vec![(8.0, 3.0)]]);
        assert!(finite_segments(&[(0, f64::NAN)]).is_empty());
    }

    #[test]
    fn test_axis_ranges_pad_data() {
        let series = vec![Series {
            reynolds_number: 1,
            points: vec![(0, 0.0), (10, 1.0), (12, f64::NAN)],
        }];
        let (x, y) = axis_ranges(&series);
        assert!((x.start + 0.5).abs() < 1e-9 && (x.end - 10.5).abs() < 1e-9);
        assert!((y.start + 0.05).abs() < 1e-9 && (y.end - 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_axis_ranges_single_point() {
        let series = vec![Series {
            reynolds_number: 1,
            points: vec![(0, 2.0)],
        }];
        let (x, y) = axis_ranges(&series);
        assert!(x.start < 0.0 && x.end > 0.0);
        assert!(y.start < 2.0 && y.end > 2.0);
    }

    #[test]
    fn test_legend_avoids_crowded_corner() {
        let x = 0.0..10.0;
        let y = 0.0..10.0;
        // Rising curve: lower-left and upper-right are occupied.
        let rising: Vec<(f64, f64)> = (0..=10).map(|i| (i as f64, i as f64)).collect();
        assert_eq!(best_legend_corner(&rising, &x, &y), LegendCorner::UpperLeft);

        let everywhere_but_lower_right = vec![(9.0, 9.0), (1.0, 9.0), (1.0, 1.0)];
        assert_eq!(
            best_legend_corner(&everywhere_but_lower_right, &x, &y),
            LegendCorner::LowerRight
        );

        assert_eq!(best_legend_corner(&[], &x, &y), LegendCorner::UpperRight);
    }
}
