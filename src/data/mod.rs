/// Data layer: core types, loading, and the filter → aggregate → reshape pipeline.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file once → Arc<Dataset>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category set + year interval → &Record
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  mean per (year, category), zero-filled grid
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ reshape  │  grid → (year, category, emissions) rows
///   └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod reshape;
