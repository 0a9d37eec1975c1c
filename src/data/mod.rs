/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SoyDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ SoyDataset  │  Vec<StateRecord>, filter domains
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐       ┌────────────┐
///   │  filter   │ ───▶ │ aggregate   │  per-state sums + grand totals
///   └──────────┘       └────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
