/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordSet (tenure derived at load)
///   └──────────┘
///        │            ┌───────┐
///        ├────────────│ cache │  reuse until the source file changes
///        ▼            └───────┘
///   ┌──────────────┐
///   │  RecordSet    │  Vec<Employee>, distinct titles / ZIPs
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  count, means, totals, grouped counts
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod summary;
