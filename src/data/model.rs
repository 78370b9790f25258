use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Sheet and column vocabulary of the source workbook
// ---------------------------------------------------------------------------

pub const PROJECTS_SHEET: &str = "Projects";
pub const COUNTRIES_SHEET: &str = "Countries";

pub const NUMBER_COL: &str = "Number";
pub const PROJECT_NAME_COL: &str = "Project Name";
pub const COUNTRY_COL: &str = "Country";
pub const STATUS_COL: &str = "Status";
pub const TECHNOLOGY_COL: &str = "Technology";
pub const ANNOUNCED_SIZE_COL: &str = "Announced Size";
pub const DATE_ONLINE_COL: &str = "Date online";
pub const CAPACITY_COL: &str = "kt H2/y";
pub const NORMALIZED_CAPACITY_COL: &str =
    "IEA zero-carbon estimated normalized capacity[nm³ H₂/hour]";
/// Short name the normalized-capacity column is renamed to during cleaning.
pub const NORMALIZED_CAPACITY_SHORT_COL: &str = "Zero-carbon norm. capacity[nm³ H₂/hour]";

pub const COUNTRY_NAME_COL: &str = "Country";
pub const ISO3_CODE_COL: &str = "ISO-3 Code";

/// Columns the Projects sheet must carry, by exact name.
pub const EXPECTED_PROJECT_COLUMNS: &[&str] = &[
    NUMBER_COL,
    PROJECT_NAME_COL,
    COUNTRY_COL,
    STATUS_COL,
    TECHNOLOGY_COL,
    ANNOUNCED_SIZE_COL,
    DATE_ONLINE_COL,
    CAPACITY_COL,
    NORMALIZED_CAPACITY_COL,
];

/// Columns the Countries sheet must carry, by exact name.
pub const EXPECTED_COUNTRY_COLUMNS: &[&str] = &[COUNTRY_NAME_COL, ISO3_CODE_COL];

// ---------------------------------------------------------------------------
// CellValue – a single cell of a raw sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the mixed dtypes of the source
/// spreadsheet. Cleaning narrows these down before rows are typed.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the cell as text; `None` for an empty cell. This is the
    /// coercion applied to free-text/number hybrid columns.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            other => Some(other.to_string()),
        }
    }

    /// Numeric reading of the cell, without parsing text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Empty => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – one sheet as loaded, before cleaning
// ---------------------------------------------------------------------------

/// One row of a raw sheet: column name → cell. Absent keys read as empty.
pub type RawRow = BTreeMap<String, CellValue>;

/// A raw sheet: ordered column names plus rows. Column and row order follow
/// the source.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        RawTable {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Status – canonical project lifecycle vocabulary
// ---------------------------------------------------------------------------

/// Lifecycle stage of a project. Raw labels enter through [`Status::from_label`],
/// which merges the synonym spellings found in the source data; labels outside
/// the vocabulary fall back to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Status {
    Concept,
    #[serde(rename = "Feasibility study")]
    FeasibilityStudy,
    #[serde(rename = "Under Construction")]
    UnderConstruction,
    Demonstration,
    Operational,
    Decommissioned,
    Other,
}

impl Status {
    /// Map a raw status label to its canonical form. Idempotent: every
    /// canonical label maps to itself.
    pub fn from_label(label: &str) -> Status {
        match label.trim() {
            "Concept" => Status::Concept,
            "Feasibility study" | "Feasibility Study" => Status::FeasibilityStudy,
            "Under Construction" | "Under construction" | "FID" | "FID/Construction" => {
                Status::UnderConstruction
            }
            "Demonstration" | "DEMO" => Status::Demonstration,
            "Operational" => Status::Operational,
            "Decommissioned" => Status::Decommissioned,
            // "Other", "Unknown", "Other/Unknown", and anything unrecognized
            _ => Status::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::Concept => "Concept",
            Status::FeasibilityStudy => "Feasibility study",
            Status::UnderConstruction => "Under Construction",
            Status::Demonstration => "Demonstration",
            Status::Operational => "Operational",
            Status::Decommissioned => "Decommissioned",
            Status::Other => "Other",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ProjectRecord / ProjectTable – the cleaned dataset
// ---------------------------------------------------------------------------

/// One hydrogen-production project, typed after cleaning. The `number`
/// identifier is guaranteed present; everything else may be blank in the
/// source.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRecord {
    /// Source row identifier, kept in display form.
    pub number: String,
    pub project_name: Option<String>,
    /// ISO-3 country code.
    pub country: Option<String>,
    pub status: Option<Status>,
    pub technology: Option<String>,
    /// Free-text/number hybrid, always held as text.
    pub announced_size: Option<String>,
    /// Absent for future or unknown commissioning dates.
    pub date_online: Option<NaiveDate>,
    /// Capacity in kt H2/year.
    pub capacity_kt_y: Option<f64>,
    /// Zero-carbon normalized capacity in nm³ H2/hour.
    pub normalized_capacity: Option<f64>,
}

/// The cleaned project table. Immutable after loading; filtering derives a
/// new table rather than mutating this one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectTable {
    pub records: Vec<ProjectRecord>,
}

impl ProjectTable {
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        ProjectTable { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CountryLookup – display name ↔ ISO-3 code
// ---------------------------------------------------------------------------

/// Country display name → ISO-3 code, keeping the sheet order of names for
/// the selector list.
#[derive(Debug, Clone, Default)]
pub struct CountryLookup {
    names: Vec<String>,
    code_by_name: BTreeMap<String, String>,
}

impl CountryLookup {
    /// Build from (name, code) pairs in sheet order. A duplicated name keeps
    /// its first position and its last code.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut lookup = CountryLookup::default();
        for (name, code) in pairs {
            if lookup.code_by_name.insert(name.clone(), code).is_none() {
                lookup.names.push(name);
            }
        }
        lookup
    }

    pub fn code(&self, name: &str) -> Option<&str> {
        self.code_by_name.get(name).map(String::as_str)
    }

    /// Display names in sheet order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
