use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

//==============================================================================
// Parsed schedule
//==============================================================================

/// One person's row of the roster: their subgroup, name and the shift per date.
///
/// Within one parse every record carries the same set of date keys (the header
/// row), although any value may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    #[serde(alias = "subcargo", default)]
    pub subgroup: String,
    #[serde(alias = "nombre", default)]
    pub name: String,
    /// date key -> shift code
    #[serde(alias = "turnos", default)]
    pub shifts: BTreeMap<String, String>,
}

impl ShiftRecord {
    pub fn new(subgroup: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            subgroup: subgroup.into(),
            name: name.into(),
            shifts: BTreeMap::new(),
        }
    }

    /// Builder-style helper, mostly for tests and fixtures
    pub fn with_shift(mut self, date: impl Into<String>, code: impl Into<String>) -> Self {
        self.shifts.insert(date.into(), code.into());
        self
    }

    /// Shift on `date`, empty when the date is absent
    pub fn shift_on(&self, date: &str) -> &str {
        self.shifts.get(date).map(String::as_str).unwrap_or("")
    }
}

/// Result of one upload + parse cycle. Replaces the previous result wholesale.
///
/// Serialized with the field names of the parse endpoint body, which is also
/// the shape stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseResult {
    #[serde(rename = "data", alias = "records", default)]
    pub records: Vec<ShiftRecord>,
    #[serde(rename = "sheetName", default)]
    pub sheet_name: String,
    #[serde(rename = "sheets", default)]
    pub available_sheets: Vec<String>,
}

impl ParseResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//==============================================================================
// Shift codes
//==============================================================================

/// Known shift vocabulary. Codes are stored as free-form strings; this is the
/// classification used for styling, with `Other` as the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftCode {
    Am,
    Pm,
    Libre,
    Vac,
    Full,
    Empty,
    Other,
}

impl ShiftCode {
    pub fn classify(code: &str) -> Self {
        match code {
            "AM" => ShiftCode::Am,
            "PM" => ShiftCode::Pm,
            "LIBRE" => ShiftCode::Libre,
            "VAC" => ShiftCode::Vac,
            "FULL" => ShiftCode::Full,
            "" => ShiftCode::Empty,
            _ => ShiftCode::Other,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, ShiftCode::Empty | ShiftCode::Other)
    }

    /// Display colour (RGB). Unknown and empty codes share the neutral default.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            ShiftCode::Am => (0x3B, 0x82, 0xF6),
            ShiftCode::Pm => (0xF5, 0x9E, 0x0B),
            ShiftCode::Libre => (0x10, 0xB9, 0x81),
            ShiftCode::Vac => (0xEF, 0x44, 0x44),
            ShiftCode::Full => (0x8B, 0x5C, 0xF6),
            ShiftCode::Empty | ShiftCode::Other => (0x64, 0x74, 0x8B),
        }
    }
}

//==============================================================================
// Filters and selection
//==============================================================================

/// Shift filter offered to the user. Closed set; see [`FilterMode::parse_lenient`]
/// for how free-form input is mapped onto it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterMode {
    #[default]
    All,
    Libre,
    Am,
    Pm,
    VacFull,
}

impl FilterMode {
    /// Does a shift code pass this filter?
    pub fn matches(self, code: &str) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Libre => code == "LIBRE",
            FilterMode::Am => code == "AM",
            FilterMode::Pm => code == "PM",
            FilterMode::VacFull => code == "VAC" || code == "FULL",
        }
    }

    /// Wire token (`ALL`, `VAC_FULL`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "ALL",
            FilterMode::Libre => "LIBRE",
            FilterMode::Am => "AM",
            FilterMode::Pm => "PM",
            FilterMode::VacFull => "VAC_FULL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "Todos",
            FilterMode::Libre => "Solo LIBRE",
            FilterMode::Am => "Solo AM",
            FilterMode::Pm => "Solo PM",
            FilterMode::VacFull => "Solo VAC/FULL",
        }
    }

    /// Unknown tokens fall back to `All`.
    pub fn parse_lenient(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "ALL" => Ok(FilterMode::All),
            "LIBRE" => Ok(FilterMode::Libre),
            "AM" => Ok(FilterMode::Am),
            "PM" => Ok(FilterMode::Pm),
            "VAC_FULL" => Ok(FilterMode::VacFull),
            other => Err(format!("unknown filter mode '{}'", other)),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A clicked cell: drives the companion lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCell {
    pub date: String,
    pub shift_code: String,
    pub subgroup: String,
    pub name: String,
}

/// Ephemeral UI state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub filter: FilterMode,
    pub selected: Option<SelectedCell>,
}

impl ViewState {
    pub fn new(search: impl Into<String>, filter: FilterMode) -> Self {
        Self {
            search: search.into(),
            filter,
            selected: None,
        }
    }

    pub fn with_selection(mut self, selected: SelectedCell) -> Self {
        self.selected = Some(selected);
        self
    }
}
