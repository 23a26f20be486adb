use std::collections::BTreeMap;

use super::model::{CaseRecord, CoefficientType, MergedPolarTable, PolarRow, SummaryTable};

// ---------------------------------------------------------------------------
// Subset views
// ---------------------------------------------------------------------------

/// Records of one coefficient type, in table order.
pub fn of_type(table: &SummaryTable, ty: CoefficientType) -> Vec<&CaseRecord> {
    table
        .records()
        .iter()
        .filter(|r| r.coefficient_type == ty)
        .collect()
}

/// Inner-join lift and drag records on (Re, AoA) and compute `L_over_D`.
///
/// Rows follow lift-record order. A condition with several drag or lift
/// records yields one row per pair, like a relational join.
pub fn merge_polar(table: &SummaryTable) -> MergedPolarTable {
    let drag = of_type(table, CoefficientType::Drag);
    let lift = of_type(table, CoefficientType::Lift);

    lift.iter()
        .flat_map(|l| {
            drag.iter()
                .filter(move |d| {
                    d.reynolds_number == l.reynolds_number
                        && d.angle_of_attack == l.angle_of_attack
                })
                .map(move |d| {
                    PolarRow::new(
                        l.reynolds_number,
                        l.angle_of_attack,
                        l.final_coefficient.clone(),
                        d.final_coefficient.clone(),
                    )
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-Reynolds series
// ---------------------------------------------------------------------------

/// One curve: points `(AoA, value)` for a single Reynolds number.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub reynolds_number: u64,
    pub points: Vec<(i64, f64)>,
}

impl Series {
    pub fn label(&self) -> String {
        format!("Re = {}", self.reynolds_number)
    }
}

/// Group `(Re, AoA, value)` triples into series ordered by ascending Re, each
/// with points ordered by ascending AoA. Equal AoA keep their input order.
pub fn group_by_reynolds<I>(points: I) -> Vec<Series>
where
    I: IntoIterator<Item = (u64, i64, f64)>,
{
    let mut grouped: BTreeMap<u64, Vec<(i64, f64)>> = BTreeMap::new();
    for (re, aoa, value) in points {
        grouped.entry(re).or_default().push((aoa, value));
    }

    grouped
        .into_iter()
        .map(|(reynolds_number, mut points)| {
            points.sort_by_key(|&(aoa, _)| aoa);
            Series {
                reynolds_number,
                points,
            }
        })
        .collect()
}

/// Final coefficient vs AoA for every record of one type.
pub fn coefficient_series(table: &SummaryTable, ty: CoefficientType) -> Vec<Series> {
    group_by_reynolds(of_type(table, ty).into_iter().map(|r| {
        (
            r.reynolds_number,
            r.angle_of_attack,
            r.final_coefficient.as_f64(),
        )
    }))
}

/// L/D vs AoA for every merged row.
pub fn lift_to_drag_series(merged: &MergedPolarTable) -> Vec<Series> {
    group_by_reynolds(
        merged
            .iter()
            .map(|row| (row.reynolds_number, row.angle_of_attack, row.l_over_d)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CoefficientValue;

    fn record(ty: CoefficientType, re: u64, aoa: i64, v: f64) -> CaseRecord {
        CaseRecord {
            coefficient_type: ty,
            reynolds_number: re,
            angle_of_attack: aoa,
            final_coefficient: CoefficientValue::Number(v),
        }
    }

    #[test]
    fn test_of_type_keeps_order() {
        let table = SummaryTable::from_records(vec![
            record(CoefficientType::Drag, 2, 0, 0.1),
            record(CoefficientType::Lift, 2, 0, 0.5),
            record(CoefficientType::Drag, 1, 0, 0.2),
        ]);
        let drag = of_type(&table, CoefficientType::Drag);
        assert_eq!(drag.len(), 2);
        assert_eq!(drag[0].reynolds_number, 2);
        assert_eq!(drag[1].reynolds_number, 1);
    }

    #[test]
    fn test_merge_computes_ratio() {
        let table = SummaryTable::from_records(vec![
            record(CoefficientType::Drag, 100_000, 4, 0.5),
            record(CoefficientType::Lift, 100_000, 4, 1.5),
        ]);
        let merged = merge_polar(&table);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].reynolds_number, 100_000);
        assert_eq!(merged[0].angle_of_attack, 4);
        assert_eq!(merged[0].l_over_d, 3.0);
    }

    #[test]
    fn test_merge_is_inner_join() {
        let table = SummaryTable::from_records(vec![
            record(CoefficientType::Drag, 100_000, 4, 0.5),
            record(CoefficientType::Lift, 100_000, 4, 1.5),
            record(CoefficientType::Drag, 100_000, 8, 0.7),
            record(CoefficientType::Lift, 200_000, 8, 1.1),
        ]);
        let merged = merge_polar(&table);
        assert_eq!(merged.len(), 1);
        assert!(merged
            .iter()
            .all(|r| (r.reynolds_number, r.angle_of_attack) == (100_000, 4)));
    }

    #[test]
    fn test_merge_duplicates_pair_up() {
        let table = SummaryTable::from_records(vec![
            record(CoefficientType::Drag, 1, 0, 0.5),
            record(CoefficientType::Drag, 1, 0, 0.25),
            record(CoefficientType::Lift, 1, 0, 1.0),
        ]);
        let ratios: Vec<f64> = merge_polar(&table).iter().map(|r| r.l_over_d).collect();
        assert_eq!(ratios, vec![2.0, 4.0]);
    }

    #[test]
    fn test_series_sorted_regardless_of_input_order() {
        let series = group_by_reynolds(vec![
            (500_000, 8, 0.8),
            (100_000, 4, 0.4),
            (500_000, -2, -0.2),
            (100_000, 0, 0.0),
            (500_000, 2, 0.2),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].reynolds_number, 100_000);
        assert_eq!(series[0].points, vec![(0, 0.0), (4, 0.4)]);
        assert_eq!(series[1].reynolds_number, 500_000);
        assert_eq!(series[1].points, vec![(-2, -0.2), (2, 0.2), (8, 0.8)]);
        assert_eq!(series[1].label(), "Re = 500000");
    }

    #[test]
    fn test_numeric_not_lexicographic_re_order() {
        let series = group_by_reynolds(vec![(90, 0, 1.0), (1000, 0, 1.0), (200, 0, 1.0)]);
        let order: Vec<u64> = series.iter().map(|s| s.reynolds_number).collect();
        assert_eq!(order, vec![90, 200, 1000]);
    }

    #[test]
    fn test_coefficient_series_uses_nan_for_text() {
        let table = SummaryTable::from_records(vec![CaseRecord {
            coefficient_type: CoefficientType::Lift,
            reynolds_number: 1,
            angle_of_attack: 0,
            final_coefficient: CoefficientValue::Text("x".into()),
        }]);
        let series = coefficient_series(&table, CoefficientType::Lift);
        assert!(series[0].points[0].1.is_nan());
        assert!(coefficient_series(&table, CoefficientType::Drag).is_empty());
    }
}
