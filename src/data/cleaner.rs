use log::debug;

use crate::error::DataError;

use super::model::{
    CellValue, ProjectRecord, ProjectTable, RawRow, RawTable, Status, ANNOUNCED_SIZE_COL,
    CAPACITY_COL, COUNTRY_COL, DATE_ONLINE_COL, NORMALIZED_CAPACITY_COL,
    NORMALIZED_CAPACITY_SHORT_COL, NUMBER_COL, PROJECT_NAME_COL, STATUS_COL, TECHNOLOGY_COL,
};

// ---------------------------------------------------------------------------
// Cleaning pipeline
// ---------------------------------------------------------------------------

/// Clean the raw Projects sheet and type its rows.
///
/// Each step consumes its input and returns a new table, so a transformation
/// can never silently turn into a no-op on a shared view. Steps, in order:
///
/// 1. coerce `Announced Size` cells to text (the source mixes numbers and
///    ranges like `50-100`)
/// 2. drop columns that are empty in every row
/// 3. drop rows whose `Number` identifier is empty
/// 4. coerce the normalized-capacity column to float, failing on a
///    non-numeric, non-empty cell
/// 5. rename the normalized-capacity column to its short form
/// 6. canonicalize status synonyms
///
/// After step 3 every surviving row carries a `Number`, which typing relies
/// on.
pub fn clean(raw: RawTable) -> Result<ProjectTable, DataError> {
    let table = coerce_to_text(raw, ANNOUNCED_SIZE_COL);
    let table = drop_empty_columns(table);
    let table = drop_rows_without(table, NUMBER_COL);
    let table = coerce_to_float(table, NORMALIZED_CAPACITY_COL)?;
    let table = rename_column(table, NORMALIZED_CAPACITY_COL, NORMALIZED_CAPACITY_SHORT_COL);
    let table = canonicalize_status(table);
    Ok(typed_records(table))
}

/// Step 1: hold every value of the column as text, whatever its source type.
fn coerce_to_text(mut table: RawTable, column: &str) -> RawTable {
    for row in &mut table.rows {
        if let Some(cell) = row.remove(column) {
            if let Some(text) = cell.to_text() {
                row.insert(column.to_string(), CellValue::Text(text));
            }
        }
    }
    table
}

/// Step 2: drop columns that carry no value in any row.
fn drop_empty_columns(mut table: RawTable) -> RawTable {
    let keep: Vec<String> = table
        .columns
        .iter()
        .filter(|column| {
            table
                .rows
                .iter()
                .any(|row| row.get(*column).is_some_and(|cell| !cell.is_empty()))
        })
        .cloned()
        .collect();

    let dropped = table.columns.len() - keep.len();
    if dropped > 0 {
        debug!("dropping {dropped} empty columns");
        for row in &mut table.rows {
            row.retain(|name, _| keep.iter().any(|c| c == name));
        }
    }
    table.columns = keep;
    table
}

/// Step 3: a row without its identifier is filler, not a project.
fn drop_rows_without(mut table: RawTable, column: &str) -> RawTable {
    let before = table.len();
    table
        .rows
        .retain(|row| row.get(column).is_some_and(|cell| !cell.is_empty()));
    let dropped = before - table.len();
    if dropped > 0 {
        debug!("dropping {dropped} rows without '{column}'");
    }
    table
}

/// Step 4: the column must be numeric. Text that parses as a number is
/// accepted; anything else non-empty is a conversion error, never a silent
/// drop.
fn coerce_to_float(mut table: RawTable, column: &str) -> Result<RawTable, DataError> {
    for (i, row) in table.rows.iter_mut().enumerate() {
        let coerced = match row.get(column) {
            None | Some(CellValue::Empty) | Some(CellValue::Float(_)) => continue,
            Some(CellValue::Int(n)) => CellValue::Float(*n as f64),
            Some(CellValue::Text(s)) => match s.trim().parse::<f64>() {
                Ok(v) => CellValue::Float(v),
                Err(_) => {
                    return Err(DataError::TypeConversion {
                        column: column.to_string(),
                        row: i,
                        value: s.clone(),
                    })
                }
            },
            Some(other) => {
                return Err(DataError::TypeConversion {
                    column: column.to_string(),
                    row: i,
                    value: other.to_string(),
                })
            }
        };
        row.insert(column.to_string(), coerced);
    }
    Ok(table)
}

/// Step 5.
fn rename_column(mut table: RawTable, from: &str, to: &str) -> RawTable {
    for column in &mut table.columns {
        if column == from {
            *column = to.to_string();
        }
    }
    for row in &mut table.rows {
        if let Some(cell) = row.remove(from) {
            row.insert(to.to_string(), cell);
        }
    }
    table
}

/// Step 6: merge status synonyms into the canonical vocabulary. The mapping
/// lives in [`Status::from_label`] alone, so applying this step twice yields
/// the same table.
fn canonicalize_status(mut table: RawTable) -> RawTable {
    for row in &mut table.rows {
        let canonical = match row.get(STATUS_COL) {
            Some(CellValue::Text(label)) => {
                let canonical = Status::from_label(label).label();
                (canonical != label).then_some(canonical)
            }
            _ => None,
        };
        if let Some(canonical) = canonical {
            row.insert(STATUS_COL.to_string(), CellValue::Text(canonical.to_string()));
        }
    }
    table
}

/// Type the cleaned rows. Cell-level misses (blank name, missing date) stay
/// `None`; only the `Number` identifier is guaranteed by step 3.
fn typed_records(table: RawTable) -> ProjectTable {
    let records = table
        .rows
        .into_iter()
        .map(|row| ProjectRecord {
            number: text_cell(&row, NUMBER_COL).unwrap_or_default(),
            project_name: text_cell(&row, PROJECT_NAME_COL),
            country: text_cell(&row, COUNTRY_COL),
            status: text_cell(&row, STATUS_COL).map(|label| Status::from_label(&label)),
            technology: text_cell(&row, TECHNOLOGY_COL),
            announced_size: text_cell(&row, ANNOUNCED_SIZE_COL),
            date_online: row.get(DATE_ONLINE_COL).and_then(CellValue::as_date),
            capacity_kt_y: row.get(CAPACITY_COL).and_then(CellValue::as_f64),
            normalized_capacity: row
                .get(NORMALIZED_CAPACITY_SHORT_COL)
                .and_then(CellValue::as_f64),
        })
        .collect();
    ProjectTable::new(records)
}

fn text_cell(row: &RawRow, column: &str) -> Option<String> {
    row.get(column).and_then(CellValue::to_text)
}
