use serde::Serialize;
use std::fmt;

use crate::constants::{FALSE_TOKENS, MISSING_VALUE_TOKENS, TRUE_TOKENS};

/// One value of a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Inferred type of a whole column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Infer a column type from its cells
    ///
    /// Booleans and integers only keep their type when nothing is missing;
    /// a missing value turns integers into floats and booleans into text.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let (mut ints, mut floats, mut bools, mut texts, mut missing) = (0, 0, 0, 0, 0);
        for cell in cells {
            match cell {
                Cell::Missing => missing += 1,
                Cell::Int(_) => ints += 1,
                Cell::Float(_) => floats += 1,
                Cell::Bool(_) => bools += 1,
                Cell::Text(_) => texts += 1,
            }
        }

        let present = ints + floats + bools + texts;
        if present == 0 {
            return Self::Float;
        }
        if texts > 0 || (bools > 0 && bools != present) {
            return Self::Text;
        }
        if bools > 0 {
            return if missing == 0 { Self::Boolean } else { Self::Text };
        }
        if floats == 0 && missing == 0 {
            Self::Integer
        } else {
            Self::Float
        }
    }
}

impl Cell {
    /// Read a raw text field: missing tokens, booleans, integers, floats, then text
    pub fn parse(raw: &str) -> Self {
        if MISSING_VALUE_TOKENS.contains(&raw) {
            return Self::Missing;
        }
        if TRUE_TOKENS.contains(&raw) {
            return Self::Bool(true);
        }
        if FALSE_TOKENS.contains(&raw) {
            return Self::Bool(false);
        }

        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::Int(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if !f.is_nan() => Self::Float(f),
            _ => Self::Text(raw.to_string()),
        }
    }

    /// Text that only honors the missing-value tokens (spreadsheet string cells)
    pub fn text(raw: &str) -> Self {
        if MISSING_VALUE_TOKENS.contains(&raw) {
            Self::Missing
        } else {
            Self::Text(raw.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Field text for CSV output; missing values are empty
    pub fn to_field(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Coerce the cell to the representation of its column
    pub(crate) fn normalize(self, kind: ColumnType) -> Self {
        match (kind, self) {
            (_, Self::Missing) => Self::Missing,
            (ColumnType::Float, Self::Int(i)) => Self::Float(i as f64),
            (ColumnType::Text, cell @ Self::Text(_)) => cell,
            (ColumnType::Text, cell) => Self::Text(cell.to_field()),
            (_, cell) => cell,
        }
    }

    /// Hashable identity used for duplicate detection
    pub(crate) fn key(&self) -> CellKey {
        match self {
            Self::Missing => CellKey::Missing,
            Self::Int(i) => CellKey::Int(*i),
            // -0.0 and 0.0 compare equal
            Self::Float(f) if *f == 0.0 => CellKey::Float(0),
            Self::Float(f) => CellKey::Float(f.to_bits()),
            Self::Bool(b) => CellKey::Bool(*b),
            Self::Text(s) => CellKey::Text(s.clone()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "NaN"),
            other => write!(f, "{}", other.to_field()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CellKey {
    Missing,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(String),
}

/// Integral floats keep one decimal ("4.0") so they read back as floats
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
