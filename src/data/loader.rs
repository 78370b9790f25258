use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use chrono::NaiveDate;
use log::info;
use serde_json::Value as JsonValue;

use crate::error::DataError;

use super::cleaner;
use super::model::{
    CellValue, CountryLookup, ProjectTable, RawRow, RawTable, COUNTRIES_SHEET, COUNTRY_NAME_COL,
    EXPECTED_COUNTRY_COLUMNS, EXPECTED_PROJECT_COLUMNS, ISO3_CODE_COL, PROJECTS_SHEET,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// The loaded and cleaned dataset: the project table plus the country-code
/// lookup. Built once per source read and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub projects: ProjectTable,
    pub countries: CountryLookup,
}

/// Load the two source sheets, verify their columns, and clean the project
/// rows. Dispatch by source shape:
///
/// * `.xlsx` / `.xlsm` – workbook with `Projects` and `Countries` sheets
/// * directory         – per-sheet CSV exports `Projects.csv` and `Countries.csv`
/// * `.json`           – `{ "projects": [{...}, ...], "countries": [{...}, ...] }`
///   with one object per row, keyed by column name
///
/// Reading is the only side effect; caching lives in [`crate::cache`].
pub fn load_dataset(path: &Path) -> Result<Dataset, DataError> {
    let (projects_raw, countries_raw) = load_sheets(path)?;

    check_columns(PROJECTS_SHEET, &projects_raw, EXPECTED_PROJECT_COLUMNS)?;
    check_columns(COUNTRIES_SHEET, &countries_raw, EXPECTED_COUNTRY_COLUMNS)?;

    let projects = cleaner::clean(projects_raw)?;
    let countries = country_lookup(&countries_raw);

    info!(
        "loaded {} project rows and {} countries from {}",
        projects.len(),
        countries.len(),
        path.display()
    );
    Ok(Dataset {
        projects,
        countries,
    })
}

/// Read the two raw sheets without cleaning.
pub fn load_sheets(path: &Path) -> Result<(RawTable, RawTable), DataError> {
    if path.is_dir() {
        return load_csv_dir(path);
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "xlsx" | "xlsm" => load_workbook(path),
        "json" => load_json(path),
        _ => Err(DataError::UnsupportedSource(path.to_path_buf())),
    }
}

fn check_columns(sheet: &str, table: &RawTable, expected: &[&str]) -> Result<(), DataError> {
    for column in expected {
        if !table.has_column(column) {
            return Err(DataError::ColumnMissing {
                sheet: sheet.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn country_lookup(table: &RawTable) -> CountryLookup {
    let pairs = table.rows.iter().filter_map(|row| {
        let name = row.get(COUNTRY_NAME_COL)?.to_text()?;
        let code = row.get(ISO3_CODE_COL)?.to_text()?;
        Some((name, code))
    });
    CountryLookup::from_pairs(pairs)
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path) -> Result<(RawTable, RawTable), DataError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| DataError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;
    let projects = sheet_to_table(&mut workbook, PROJECTS_SHEET, path)?;
    let countries = sheet_to_table(&mut workbook, COUNTRIES_SHEET, path)?;
    Ok((projects, countries))
}

fn sheet_to_table(
    workbook: &mut Xlsx<BufReader<File>>,
    sheet: &str,
    path: &Path,
) -> Result<RawTable, DataError> {
    let range = workbook.worksheet_range(sheet).map_err(|source| match source {
        XlsxError::WorksheetNotFound(_) => DataError::SheetMissing(sheet.to_string()),
        source => DataError::Workbook {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Ok(RawTable::default()),
    };

    let mut table = RawTable::new(headers);
    for row in rows {
        let mut out = RawRow::new();
        for (i, cell) in row.iter().enumerate() {
            let Some(name) = table.columns.get(i) else {
                continue;
            };
            let value = convert_cell(cell);
            if !value.is_empty() {
                out.insert(name.clone(), value);
            }
        }
        table.rows.push(out);
    }
    Ok(table)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.trim().to_string()),
        Data::Float(v) => CellValue::Float(*v),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => CellValue::Date(dt.date()),
            None => CellValue::Empty,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => parse_iso_date(s),
    }
}

fn parse_iso_date(s: &str) -> CellValue {
    let date_part = s.get(..10).unwrap_or(s);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(d) => CellValue::Date(d),
        Err(_) => CellValue::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: one file per sheet inside the given directory, header row
/// first. Cell types are inferred per field, matching the loose typing of
/// workbook cells.
fn load_csv_dir(dir: &Path) -> Result<(RawTable, RawTable), DataError> {
    let projects = read_csv_sheet(&dir.join(format!("{PROJECTS_SHEET}.csv")))?;
    let countries = read_csv_sheet(&dir.join(format!("{COUNTRIES_SHEET}.csv")))?;
    Ok((projects, countries))
}

fn read_csv_sheet(path: &Path) -> Result<RawTable, DataError> {
    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = RawTable::new(headers);
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let mut row = RawRow::new();
        for (i, field) in record.iter().enumerate() {
            let Some(name) = table.columns.get(i) else {
                continue;
            };
            let value = infer_cell(field);
            if !value.is_empty() {
                row.insert(name.clone(), value);
            }
        }
        table.rows.push(row);
    }
    Ok(table)
}

fn infer_cell(field: &str) -> CellValue {
    let field = field.trim();
    if field.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = field.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(v) = field.parse::<f64>() {
        return CellValue::Float(v);
    }
    if let Ok(d) = NaiveDate::parse_from_str(field, "%Y-%m-%d") {
        return CellValue::Date(d);
    }
    if field == "true" || field == "false" {
        return CellValue::Bool(field == "true");
    }
    CellValue::Text(field.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON shape (records-oriented, one object per row):
///
/// ```json
/// {
///   "projects":  [{ "Number": 1, "Project Name": "...", ... }, ...],
///   "countries": [{ "Country": "Norway", "ISO-3 Code": "NOR" }, ...]
/// }
/// ```
fn load_json(path: &Path) -> Result<(RawTable, RawTable), DataError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let projects = json_sheet(&root, "projects", path)?;
    let countries = json_sheet(&root, "countries", path)?;
    Ok((projects, countries))
}

fn json_sheet(root: &JsonValue, key: &str, path: &Path) -> Result<RawTable, DataError> {
    let records = root
        .get(key)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| DataError::SheetMissing(key.to_string()))?;

    let mut table = RawTable::default();
    for (i, record) in records.iter().enumerate() {
        let obj = record.as_object().ok_or_else(|| DataError::Malformed {
            path: path.to_path_buf(),
            detail: format!("'{key}' row {i} is not an object"),
        })?;

        let mut row = RawRow::new();
        for (column, value) in obj {
            if !table.has_column(column) {
                table.columns.push(column.clone());
            }
            let value = json_cell(value);
            if !value.is_empty() {
                row.insert(column.clone(), value);
            }
        }
        table.rows.push(row);
    }
    Ok(table)
}

fn json_cell(value: &JsonValue) -> CellValue {
    match value {
        JsonValue::Null => CellValue::Empty,
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(v) = n.as_f64() {
                CellValue::Float(v)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::String(s) if s.trim().is_empty() => CellValue::Empty,
        JsonValue::String(s) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            Ok(d) => CellValue::Date(d),
            Err(_) => CellValue::Text(s.trim().to_string()),
        },
        other => CellValue::Text(other.to_string()),
    }
}
