//! Data pipeline and session layer for a hydrogen-production projects
//! dashboard.
//!
//! The crate loads a spreadsheet of project records plus a country-code
//! lookup, cleans the records, optionally scopes them to one country, and
//! computes the metrics, breakdowns, rankings, and time series a dashboard
//! renders. Rendering itself lives outside the crate: a UI drives a
//! [`DashboardSession`] and receives immutable [`session::DashboardView`]s.
//!
//! ```no_run
//! use h2_dashboard::DashboardSession;
//!
//! # fn main() -> Result<(), h2_dashboard::DataError> {
//! let mut session = DashboardSession::new("hydrogen_projects.xlsx");
//! let global = session.current_view()?;
//! let norway = session.select_country("Norway")?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod data;
pub mod error;
pub mod session;

pub use cache::DatasetCache;
pub use data::aggregate::DashboardSummary;
pub use data::filter::{CountryScope, CountrySelection};
pub use data::loader::Dataset;
pub use data::model::{CountryLookup, ProjectRecord, ProjectTable, Status};
pub use error::DataError;
pub use session::{DashboardSession, DashboardView, ViewScope};
