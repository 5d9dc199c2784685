/// Data layer: core types, loading, reshaping, windowing and gap filling.
///
/// Architecture:
/// ```text
///  wide .csv  (Timestamp.2011, 2011, Timestamp.2012, 2012, ...)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  validate YearSchema, coerce NA → None  → WideYearTable
///   └──────────┘
///        │                              │
///        ▼                              ▼
///   ┌──────────┐                 ┌──────────────┐
///   │ reshape   │  → LongSeries  │ year column   │  (single-year path)
///   └──────────┘                 └──────────────┘
///        │                              │
///        ▼                              ▼
///   ┌──────────┐                 ┌──────────┐   ┌─────────────┐
///   │  filter   │  DateWindow    │  filter   │ → │ interpolate  │
///   └──────────┘                 └──────────┘   └─────────────┘
/// ```

pub mod filter;
pub mod interpolate;
pub mod loader;
pub mod model;
pub mod reshape;
