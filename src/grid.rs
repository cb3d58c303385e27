//! Raw decoded grid: rows of loosely-typed cells, anchored at A1.

use calamine::{Data, Range};

/// A single decoded cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

/// Ordered rows of ordered cells. Rows may be ragged.
pub type Grid = Vec<Vec<Cell>>;

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// String coercion used for names, subgroups and shift cells.
    ///
    /// Falsy values (empty text, `0`, `false`) coerce to the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if *n == 0.0 || n.is_nan() => String::new(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(false) => String::new(),
            Cell::Bool(true) => "true".to_string(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Bool(*b),
            // Date-formatted cells keep their serial so the normalizer formats them
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(_) => Cell::Empty,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

/// Convert a worksheet range into a grid whose first row/column is A1.
///
/// Calamine trims leading empty rows/columns from a range; the two-header-row
/// convention is positional, so the grid is padded back to the sheet origin.
pub fn grid_from_range(range: &Range<Data>) -> Grid {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };

    (0..=end_row)
        .map(|row| {
            (0..=end_col)
                .map(|col| {
                    range
                        .get_value((row, col))
                        .map(Cell::from)
                        .unwrap_or(Cell::Empty)
                })
                .collect()
        })
        .collect()
}

/// Build a grid from string literals, `""` meaning an empty cell. Handy for tests.
pub fn grid_from_strs(rows: &[&[&str]]) -> Grid {
    rows.iter()
        .map(|row| row.iter().map(|s| Cell::from(*s)).collect())
        .collect()
}
