/// Data layer: core types, loading, and querying.
///
/// Architecture:
/// ```text
///   time window ("30" / "90" / "180" / other)
///        │
///        ▼
///   ┌──────────┐
///   │  worker   │  background thread, tags each request with a sequence number
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  SnapshotResolver: window → ProblemCollection (.json / .csv / .parquet)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ ProblemCollection │  immutable Vec<ProblemRecord> for one window
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  search → difficulty → sort → ordered indices
///   └──────────┘
/// ```
pub mod loader;
pub mod model;
pub mod query;
pub mod sample;
pub mod worker;
