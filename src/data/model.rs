use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// CoefficientType – which force coefficient a case file tracks
// ---------------------------------------------------------------------------

/// Drag or lift, as encoded in the case file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoefficientType {
    Drag,
    Lift,
}

impl CoefficientType {
    pub fn as_str(self) -> &'static str {
        match self {
            CoefficientType::Drag => "drag",
            CoefficientType::Lift => "lift",
        }
    }
}

impl fmt::Display for CoefficientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoefficientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drag" => Ok(CoefficientType::Drag),
            "lift" => Ok(CoefficientType::Lift),
            other => Err(format!("unknown coefficient type '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// CoefficientValue – the raw final cell of a case file
// ---------------------------------------------------------------------------

/// The value found in the last row, third column of a case file.
///
/// The cell is not validated: anything that does not parse as a float is
/// carried verbatim as `Text`, and an absent/empty cell is `Missing`.
#[derive(Debug, Clone, PartialEq)]
pub enum CoefficientValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CoefficientValue {
    /// Interpret a raw CSV cell.
    pub fn parse(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return CoefficientValue::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => CoefficientValue::Number(v),
            Err(_) => CoefficientValue::Text(cell.to_string()),
        }
    }

    /// Numeric view used by ratios and charts; non-numbers become NaN.
    pub fn as_f64(&self) -> f64 {
        match self {
            CoefficientValue::Number(v) => *v,
            CoefficientValue::Text(_) | CoefficientValue::Missing => f64::NAN,
        }
    }
}

impl fmt::Display for CoefficientValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoefficientValue::Number(v) => write!(f, "{v}"),
            CoefficientValue::Text(s) => write!(f, "{s}"),
            CoefficientValue::Missing => Ok(()),
        }
    }
}

// NaN is written as an empty cell so it reads back as `Missing`.
impl Serialize for CoefficientValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CoefficientValue::Number(v) if v.is_nan() => serializer.serialize_str(""),
            CoefficientValue::Number(v) => serializer.serialize_f64(*v),
            CoefficientValue::Text(s) => serializer.serialize_str(s),
            CoefficientValue::Missing => serializer.serialize_str(""),
        }
    }
}

impl<'de> Deserialize<'de> for CoefficientValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(CoefficientValue::parse(&raw))
    }
}

// ---------------------------------------------------------------------------
// CaseRecord – one row of the summary table
// ---------------------------------------------------------------------------

/// One successfully parsed case file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "Coefficient_Type")]
    pub coefficient_type: CoefficientType,
    #[serde(rename = "Re")]
    pub reynolds_number: u64,
    #[serde(rename = "AoA")]
    pub angle_of_attack: i64,
    #[serde(rename = "Final_Coefficient")]
    pub final_coefficient: CoefficientValue,
}

// ---------------------------------------------------------------------------
// SummaryTable – all records in discovery order
// ---------------------------------------------------------------------------

/// Insertion-ordered collection of [`CaseRecord`]s. Duplicate keys are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    records: Vec<CaseRecord>,
}

impl SummaryTable {
    pub fn from_records(records: Vec<CaseRecord>) -> Self {
        SummaryTable { records }
    }

    /// Append a record, returning the extended table.
    pub fn with_record(mut self, record: CaseRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every Reynolds number present, ascending.
    pub fn reynolds_numbers(&self) -> BTreeSet<u64> {
        self.records.iter().map(|r| r.reynolds_number).collect()
    }
}

// ---------------------------------------------------------------------------
// Merged polar table – drag and lift joined on (Re, AoA)
// ---------------------------------------------------------------------------

/// One flow condition for which both a lift and a drag record exist.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarRow {
    pub reynolds_number: u64,
    pub angle_of_attack: i64,
    pub cl: CoefficientValue,
    pub cd: CoefficientValue,
    /// `Cl / Cd` with plain IEEE division (zero drag gives ±inf or NaN).
    pub l_over_d: f64,
}

impl PolarRow {
    pub fn new(
        reynolds_number: u64,
        angle_of_attack: i64,
        cl: CoefficientValue,
        cd: CoefficientValue,
    ) -> Self {
        let l_over_d = cl.as_f64() / cd.as_f64();
        PolarRow {
            reynolds_number,
            angle_of_attack,
            cl,
            cd,
            l_over_d,
        }
    }
}

pub type MergedPolarTable = Vec<PolarRow>;
