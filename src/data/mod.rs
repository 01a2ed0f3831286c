/// Data layer: core types, loading, filtering and summary statistics.
///
/// Architecture:
/// ```text
///  bundled CSV / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → Dataset (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Penguin>, species / island domains, shared via Arc
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ FilterEngine  │  FilterState → cached FilteredView (row indices)
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  row count, mean bill length / depth
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod stats;
