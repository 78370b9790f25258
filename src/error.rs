use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Pipeline error taxonomy
// ---------------------------------------------------------------------------

/// Errors raised while loading or cleaning the source data.
///
/// Every variant is fatal for the load that raised it: the session reports it
/// as a blocking message instead of rendering a partial dashboard. An unknown
/// country selection is deliberately *not* an error; see
/// [`CountryScope::NoData`](crate::data::filter::CountryScope).
#[derive(Debug, Error)]
pub enum DataError {
    /// Source file unreadable.
    #[error("cannot read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Workbook missing or not parseable as a spreadsheet.
    #[error("cannot open workbook {}: {}", .path.display(), .source)]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    /// CSV sheet export missing or malformed.
    #[error("cannot read {}: {}", .path.display(), .source)]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// JSON export not parseable.
    #[error("cannot parse {}: {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON export parsed but does not have the expected shape.
    #[error("malformed source {}: {}", .path.display(), .detail)]
    Malformed { path: PathBuf, detail: String },

    /// A required sheet is absent from the workbook.
    #[error("source has no sheet named '{0}'")]
    SheetMissing(String),

    /// A sheet is present but lacks an expected column. Column names must
    /// match the source exactly; a renamed column is treated as missing.
    #[error("sheet '{sheet}' is missing expected column '{column}'")]
    ColumnMissing { sheet: String, column: String },

    /// Path is neither a workbook, a CSV sheet directory, nor a JSON export.
    #[error("unsupported source {}: expected an .xlsx workbook, a directory of CSV sheets, or a .json export", .0.display())]
    UnsupportedSource(PathBuf),

    /// A cell in a numeric column holds a value that cannot be converted.
    /// Rows are never silently dropped over this; totals would drift.
    #[error("column '{column}', row {row}: cannot convert '{value}' to a number")]
    TypeConversion {
        column: String,
        row: usize,
        value: String,
    },
}
