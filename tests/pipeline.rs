//! End-to-end pipeline checks against an on-disk CSV sheet directory.

use std::fs;
use std::io::Write;
use std::path::Path;

use h2_dashboard::{DashboardSession, DataError, Status, ViewScope};

fn write_sheet(path: &Path, lines: &[&str]) {
    let mut file = fs::File::create(path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
}

const PROJECTS_HEADER: &str = "Number,Project Name,Country,Status,Technology,Announced Size,Date online,kt H2/y,IEA zero-carbon estimated normalized capacity[nm³ H₂/hour]";

fn write_default_source(dir: &Path) {
    write_sheet(
        &dir.join("Projects.csv"),
        &[
            PROJECTS_HEADER,
            "1,Aurora H2,NOR,Operational,ALK,20,2021-06-01,10.0,1200",
            "2,Fjord Green,NOR,FID,PEM,50-100,2025-03-01,25.5,800.5",
            "3,Outback Hydrogen,AUS,FID/Construction,ALK,,,40.0,2100",
            "4,Pilbara Sun,AUS,Operational,PEM,300,2020-01-15,0.0,",
            "5,Atacama Wind,CHL,Unknown,ALK,,,5.0,300",
            // filler row: no Number, must vanish during cleaning
            ",Ghost Project,NOR,Concept,,,,,",
        ],
    );
    write_sheet(
        &dir.join("Countries.csv"),
        &[
            "Country,ISO-3 Code",
            "Norway,NOR",
            "Australia,AUS",
            "Chile,CHL",
            "Germany,DEU",
        ],
    );
}

#[test]
fn global_view_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_default_source(dir.path());
    let mut session = DashboardSession::new(dir.path());

    let view = session.current_view().unwrap();
    assert_eq!(view.scope, ViewScope::Global);
    let summary = view.summary.unwrap();

    // the Ghost row is gone
    assert_eq!(summary.total_count, 5);

    // FID and FID/Construction merged; Unknown became Other
    let uc = summary.status_share(Status::UnderConstruction).unwrap();
    assert_eq!(uc.count, 2);
    assert!(summary.status_share(Status::Other).is_some());
    assert_eq!(summary.operational_count, Some(2));
    assert_eq!(summary.under_construction_count, Some(2));

    assert_eq!(summary.capacity_total, 80.5);
    assert_eq!(summary.capacity_max, Some(40.0));

    // ALK 3, PEM 2
    assert_eq!(summary.top_technologies[0].technology, "ALK");
    assert_eq!(summary.top_technologies[0].count, 3);
    assert_eq!(summary.top_technologies[1].technology, "PEM");

    // two dated operational projects, ascending
    let trend: Vec<_> = summary.trend_points().collect();
    assert_eq!(trend.len(), 2);
    assert!(trend[0].0 < trend[1].0);
}

#[test]
fn country_filter_matches_direct_count() {
    let dir = tempfile::tempdir().unwrap();
    write_default_source(dir.path());
    let mut session = DashboardSession::new(dir.path());

    let view = session.select_country("Australia").unwrap();
    match view.scope {
        ViewScope::Country { code, .. } => assert_eq!(code, "AUS"),
        other => panic!("unexpected scope: {other:?}"),
    }
    assert_eq!(view.summary.unwrap().total_count, 2);
}

#[test]
fn lookup_only_country_is_a_no_data_state() {
    let dir = tempfile::tempdir().unwrap();
    write_default_source(dir.path());
    let mut session = DashboardSession::new(dir.path());

    let view = session.select_country("Germany").unwrap();
    assert_eq!(
        view.scope,
        ViewScope::NoDataForCountry {
            name: "Germany".into()
        }
    );
    assert!(view.summary.is_none());

    // the session stays usable afterwards
    let view = session.select_country("-").unwrap();
    assert_eq!(view.scope, ViewScope::Global);
}

#[test]
fn missing_expected_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(
        &dir.path().join("Projects.csv"),
        &["Number,Project Name,Country", "1,Alpha,NOR"],
    );
    write_sheet(&dir.path().join("Countries.csv"), &["Country,ISO-3 Code", "Norway,NOR"]);

    let mut session = DashboardSession::new(dir.path());
    let err = session.current_view().unwrap_err();
    assert!(matches!(err, DataError::ColumnMissing { .. }));
}

#[test]
fn unconvertible_capacity_aborts_the_load() {
    let dir = tempfile::tempdir().unwrap();
    write_sheet(
        &dir.path().join("Projects.csv"),
        &[
            PROJECTS_HEADER,
            "1,Alpha,NOR,Operational,ALK,20,2021-06-01,10.0,about 1200",
        ],
    );
    write_sheet(&dir.path().join("Countries.csv"), &["Country,ISO-3 Code", "Norway,NOR"]);

    let mut session = DashboardSession::new(dir.path());
    let err = session.current_view().unwrap_err();
    assert!(matches!(err, DataError::TypeConversion { .. }));
}

#[test]
fn json_source_loads_like_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("projects.json");
    fs::write(
        &path,
        r#"{
  "projects": [
    {"Number": 1, "Project Name": "Aurora H2", "Country": "NOR", "Status": "FID",
     "Technology": "ALK", "Announced Size": 20, "Date online": "2021-06-01",
     "kt H2/y": 10.0, "IEA zero-carbon estimated normalized capacity[nm³ H₂/hour]": 1200},
    {"Number": 2, "Project Name": "Pilbara Sun", "Country": "AUS", "Status": "Operational",
     "Technology": "PEM", "Announced Size": "300", "Date online": null,
     "kt H2/y": 25.5, "IEA zero-carbon estimated normalized capacity[nm³ H₂/hour]": null}
  ],
  "countries": [
    {"Country": "Norway", "ISO-3 Code": "NOR"},
    {"Country": "Australia", "ISO-3 Code": "AUS"}
  ]
}"#,
    )
    .unwrap();

    let mut session = DashboardSession::new(&path);
    let summary = session.current_view().unwrap().summary.unwrap();
    assert_eq!(summary.total_count, 2);
    assert_eq!(summary.under_construction_count, Some(1));
    assert_eq!(summary.capacity_total, 35.5);
}
