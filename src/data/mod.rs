//! Data layer: core types, loading, cleaning, filtering, and aggregation.
//!
//! ```text
//!  .xlsx / CSV dir / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  read the Projects and Countries sheets → RawTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ cleaner   │  coerce, drop, rename, canonicalize → ProjectTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  scope to the selected country → CountryScope
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  counts, breakdowns, ranking, trend → DashboardSummary
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod cleaner;
pub mod filter;
pub mod loader;
pub mod model;
