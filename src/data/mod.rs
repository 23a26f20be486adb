/// Data layer: case discovery, extraction, tabulation and persistence.
///
/// Architecture:
/// ```text
///  <input_dir>/*.csv
///        │
///        ▼
///   ┌───────────┐
///   │ discovery │  glob + name regex → CaseFile (type, Re, AoA)
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │  loader   │  headerless CSV → final coefficient (last row, col 2)
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  fold → SummaryTable + skipped files
///   └───────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌─────────┐   ┌──────────┐
///   │ summary │   │  filter  │  drag/lift views, (Re, AoA) join, series
///   └─────────┘   └──────────┘
/// ```

pub mod aggregate;
pub mod discovery;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
