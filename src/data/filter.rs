use log::debug;

use super::model::{CountryLookup, ProjectTable};

// ---------------------------------------------------------------------------
// Country selection: one request-scoped parameter per interaction
// ---------------------------------------------------------------------------

/// Selector sentinel for "no country chosen".
pub const NO_SELECTION: &str = "-";

/// The user's country choice for one interaction. Threaded through the
/// pipeline explicitly; never ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountrySelection {
    Global,
    Country(String),
}

impl CountrySelection {
    /// Parse selector input; `-` or blank means the global view.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || input == NO_SELECTION {
            CountrySelection::Global
        } else {
            CountrySelection::Country(input.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Scoping the table to a selection
// ---------------------------------------------------------------------------

/// Result of scoping the project table to a country selection.
#[derive(Debug, Clone)]
pub enum CountryScope {
    /// No selection; the whole table.
    Global(ProjectTable),
    /// Rows for one country, original order kept.
    Country {
        name: String,
        code: String,
        table: ProjectTable,
    },
    /// The selection resolves to no rows: either the name is unknown to the
    /// lookup or its code never occurs in the data. A distinct state, not an
    /// empty table, so the dashboard prompts for another choice instead of
    /// rendering zeros.
    NoData { name: String },
}

impl CountryScope {
    pub fn table(&self) -> Option<&ProjectTable> {
        match self {
            CountryScope::Global(table) | CountryScope::Country { table, .. } => Some(table),
            CountryScope::NoData { .. } => None,
        }
    }
}

/// Scope `table` to `selection`. The input table is never mutated; a country
/// scope holds a new table with the matching rows.
pub fn filter_by_country(
    table: &ProjectTable,
    selection: &CountrySelection,
    countries: &CountryLookup,
) -> CountryScope {
    let name = match selection {
        CountrySelection::Global => return CountryScope::Global(table.clone()),
        CountrySelection::Country(name) => name,
    };

    let Some(code) = countries.code(name) else {
        debug!("'{name}' is not in the country lookup");
        return CountryScope::NoData { name: name.clone() };
    };

    let records: Vec<_> = table
        .records
        .iter()
        .filter(|record| record.country.as_deref() == Some(code))
        .cloned()
        .collect();

    if records.is_empty() {
        debug!("no rows with country code {code} ({name})");
        return CountryScope::NoData { name: name.clone() };
    }

    CountryScope::Country {
        name: name.clone(),
        code: code.to_string(),
        table: ProjectTable::new(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ProjectRecord, Status};

    fn record(country: &str) -> ProjectRecord {
        ProjectRecord {
            number: "1".into(),
            project_name: Some("P".into()),
            country: Some(country.into()),
            status: Some(Status::Operational),
            technology: None,
            announced_size: None,
            date_online: None,
            capacity_kt_y: None,
            normalized_capacity: None,
        }
    }

    fn lookup() -> CountryLookup {
        CountryLookup::from_pairs([
            ("Norway".to_string(), "NOR".to_string()),
            ("Australia".to_string(), "AUS".to_string()),
        ])
    }

    fn table() -> ProjectTable {
        ProjectTable::new(vec![record("AUS"), record("AUS"), record("CHL")])
    }

    #[test]
    fn sentinel_parses_to_global() {
        assert_eq!(CountrySelection::parse("-"), CountrySelection::Global);
        assert_eq!(CountrySelection::parse("  "), CountrySelection::Global);
        assert_eq!(
            CountrySelection::parse("Norway"),
            CountrySelection::Country("Norway".into())
        );
    }

    #[test]
    fn global_selection_returns_full_table() {
        let scope = filter_by_country(&table(), &CountrySelection::Global, &lookup());
        match scope {
            CountryScope::Global(t) => assert_eq!(t.len(), 3),
            other => panic!("unexpected scope: {other:?}"),
        }
    }

    #[test]
    fn country_selection_keeps_matching_rows() {
        let base = table();
        let selection = CountrySelection::Country("Australia".into());
        let scope = filter_by_country(&base, &selection, &lookup());
        assert_eq!(scope.table().map(ProjectTable::len), Some(2));
        match scope {
            CountryScope::Country { name, code, table } => {
                assert_eq!(name, "Australia");
                assert_eq!(code, "AUS");
                // scoped count matches a direct count over the base table
                let direct = base
                    .records
                    .iter()
                    .filter(|r| r.country.as_deref() == Some("AUS"))
                    .count();
                assert_eq!(table.len(), direct);
            }
            other => panic!("unexpected scope: {other:?}"),
        }
    }

    #[test]
    fn country_with_no_rows_is_no_data_not_empty_table() {
        // Norway is in the lookup, but no row carries NOR
        let selection = CountrySelection::Country("Norway".into());
        let scope = filter_by_country(&table(), &selection, &lookup());
        assert!(matches!(scope, CountryScope::NoData { name } if name == "Norway"));
    }

    #[test]
    fn unknown_country_name_is_no_data() {
        let selection = CountrySelection::Country("Atlantis".into());
        let scope = filter_by_country(&table(), &selection, &lookup());
        assert!(matches!(scope, CountryScope::NoData { name } if name == "Atlantis"));
    }
}
