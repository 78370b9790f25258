use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cache::DatasetCache;
use crate::data::aggregate::DashboardSummary;
use crate::data::filter::{self, CountryScope, CountrySelection, NO_SELECTION};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// View model handed across the presentation boundary
// ---------------------------------------------------------------------------

/// What the dashboard shows for one interaction.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub scope: ViewScope,
    /// `None` only when the scope is [`ViewScope::NoDataForCountry`].
    pub summary: Option<DashboardSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViewScope {
    /// No country chosen; whole dataset.
    Global,
    /// One country's rows.
    Country { name: String, code: String },
    /// The chosen country has no rows; the dashboard stays up and prompts
    /// for another choice.
    NoDataForCountry { name: String },
}

/// Source facts for the page footer.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub source: PathBuf,
    pub project_rows: usize,
    pub countries: usize,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One user's dashboard session. Owns the source path, the load cache, and
/// the current country selection; every interaction runs the whole pipeline
/// (cache → filter → aggregate) and yields a fresh [`DashboardView`].
///
/// The selection is ordinary request-scoped state threaded through each
/// call; nothing here is global or shared.
pub struct DashboardSession {
    source: PathBuf,
    cache: DatasetCache,
    selection: CountrySelection,
}

impl DashboardSession {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        DashboardSession::with_cache(source, DatasetCache::default())
    }

    /// Build with a caller-configured cache (custom TTL).
    pub fn with_cache(source: impl Into<PathBuf>, cache: DatasetCache) -> Self {
        DashboardSession {
            source: source.into(),
            cache,
            selection: CountrySelection::Global,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn selection(&self) -> &CountrySelection {
        &self.selection
    }

    /// Handle selector input (`-` means global) and recompute the view.
    pub fn select_country(&mut self, input: &str) -> Result<DashboardView, DataError> {
        self.selection = CountrySelection::parse(input);
        self.current_view()
    }

    /// Compute the view for the current selection, loading through the cache.
    pub fn current_view(&mut self) -> Result<DashboardView, DataError> {
        let dataset = self.cache.load(&self.source)?;
        let scope = filter::filter_by_country(&dataset.projects, &self.selection, &dataset.countries);
        Ok(match scope {
            CountryScope::Global(table) => DashboardView {
                scope: ViewScope::Global,
                summary: Some(DashboardSummary::compute(&table)),
            },
            CountryScope::Country { name, code, table } => DashboardView {
                scope: ViewScope::Country { name, code },
                summary: Some(DashboardSummary::compute(&table)),
            },
            CountryScope::NoData { name } => DashboardView {
                scope: ViewScope::NoDataForCountry { name },
                summary: None,
            },
        })
    }

    /// Entries for the country selector: the no-selection sentinel followed
    /// by the lookup's names in sheet order.
    pub fn country_options(&mut self) -> Result<Vec<String>, DataError> {
        let dataset = self.cache.load(&self.source)?;
        let mut options = Vec::with_capacity(dataset.countries.len() + 1);
        options.push(NO_SELECTION.to_string());
        options.extend(dataset.countries.names().iter().cloned());
        Ok(options)
    }

    /// Facts about the loaded source for the page footer.
    pub fn dataset_info(&mut self) -> Result<DatasetInfo, DataError> {
        let dataset = self.cache.load(&self.source)?;
        Ok(DatasetInfo {
            source: self.source.clone(),
            project_rows: dataset.projects.len(),
            countries: dataset.countries.len(),
        })
    }

    /// Drop the cached dataset; the next interaction re-reads the source.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::path::Path;

    fn write_source(dir: &Path) {
        let mut projects = fs::File::create(dir.join("Projects.csv")).unwrap();
        writeln!(
            projects,
            "Number,Project Name,Country,Status,Technology,Announced Size,Date online,kt H2/y,IEA zero-carbon estimated normalized capacity[nm³ H₂/hour]"
        )
        .unwrap();
        writeln!(projects, "1,Alpha,NOR,FID,ALK,50,2025-03-01,10.0,1200").unwrap();
        writeln!(projects, "2,Beta,NOR,Operational,PEM,50-100,2021-06-01,25.5,800").unwrap();
        writeln!(projects, "3,Gamma,AUS,Operational,ALK,,2020-01-15,0.0,").unwrap();
        let mut countries = fs::File::create(dir.join("Countries.csv")).unwrap();
        writeln!(countries, "Country,ISO-3 Code").unwrap();
        writeln!(countries, "Norway,NOR").unwrap();
        writeln!(countries, "Australia,AUS").unwrap();
        writeln!(countries, "Chile,CHL").unwrap();
    }

    #[test]
    fn global_view_covers_all_rows() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());
        let mut session = DashboardSession::new(dir.path());

        let view = session.current_view().unwrap();
        assert_eq!(view.scope, ViewScope::Global);
        let summary = view.summary.unwrap();
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.operational_count, Some(2));
        assert_eq!(summary.under_construction_count, Some(1));
    }

    #[test]
    fn selecting_a_country_scopes_the_view() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());
        let mut session = DashboardSession::new(dir.path());

        let view = session.select_country("Norway").unwrap();
        assert_eq!(
            view.scope,
            ViewScope::Country {
                name: "Norway".into(),
                code: "NOR".into()
            }
        );
        assert_eq!(view.summary.unwrap().total_count, 2);

        // back to global via the sentinel
        let view = session.select_country("-").unwrap();
        assert_eq!(view.scope, ViewScope::Global);
    }

    #[test]
    fn country_without_rows_yields_no_data_view() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());
        let mut session = DashboardSession::new(dir.path());

        let view = session.select_country("Chile").unwrap();
        assert_eq!(
            view.scope,
            ViewScope::NoDataForCountry {
                name: "Chile".into()
            }
        );
        assert!(view.summary.is_none());
    }

    #[test]
    fn country_options_start_with_the_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());
        let mut session = DashboardSession::new(dir.path());

        let options = session.country_options().unwrap();
        assert_eq!(options, ["-", "Norway", "Australia", "Chile"]);
    }

    #[test]
    fn dataset_info_reports_row_counts() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());
        let mut session = DashboardSession::new(dir.path());

        let info = session.dataset_info().unwrap();
        assert_eq!(info.project_rows, 3);
        assert_eq!(info.countries, 3);
    }

    #[test]
    fn missing_source_is_a_blocking_error() {
        let mut session = DashboardSession::new("/nonexistent/source.xlsx");
        assert!(session.current_view().is_err());
    }

    #[test]
    fn view_serializes_for_the_presentation_layer() {
        let dir = tempfile::tempdir().unwrap();
        write_source(dir.path());
        let mut session = DashboardSession::new(dir.path());

        let view = session.select_country("Norway").unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["scope"]["Country"]["code"], "NOR");
        let breakdown = json["summary"]["status_breakdown"].as_array().unwrap();
        assert!(breakdown
            .iter()
            .any(|share| share["status"] == "Under Construction"));
    }
}
