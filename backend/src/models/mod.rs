//! Domain models for the mortality dashboard.
//!
//! - [`Cell`] - Raw spreadsheet value
//! - [`Role`] - Semantic meaning a source column is mapped to
//! - [`Record`] - One mortality event with its resolved attributes

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Cell
// =============================================================================

/// A raw value read from the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing value.
    Empty,
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Anything else, kept as text.
    Text(String),
}

impl Cell {
    /// Infer a cell from delimited text: empty, integer, float or text.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Cell::Int(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Cell::Float(f),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Integer conversion: integers as-is, finite floats truncated toward
    /// zero, text parsed after trimming. Anything else is `None`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Cell::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Exact code lookup: integers, or floats with no fractional part.
    /// Text is never a code.
    pub fn as_code(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Numeric conversion for coordinates.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) if f.is_finite() => Some(*f),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Text rendering; integral floats lose their `.0` so that a code read
    /// as `1010.0` still reads `1010`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
            Cell::Float(f) => Some(f.to_string()),
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

// =============================================================================
// Role
// =============================================================================

/// Semantic role of a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    CauseCode,
    CauseDescription,
    Municipality,
    Department,
    Month,
    Year,
    Sex,
    Latitude,
    Longitude,
    AgeGroup,
}

impl Role {
    /// Every role, in resolution order.
    pub const ALL: [Role; 10] = [
        Role::CauseCode,
        Role::CauseDescription,
        Role::Municipality,
        Role::Department,
        Role::Month,
        Role::Year,
        Role::Sex,
        Role::Latitude,
        Role::Longitude,
        Role::AgeGroup,
    ];

    /// Roles that must resolve before anything is computed.
    pub const REQUIRED: [Role; 4] = [Role::CauseCode, Role::Municipality, Role::Month, Role::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CauseCode => "cause-code",
            Role::CauseDescription => "cause-description",
            Role::Municipality => "municipality",
            Role::Department => "department",
            Role::Month => "month",
            Role::Year => "year",
            Role::Sex => "sex",
            Role::Latitude => "latitude",
            Role::Longitude => "longitude",
            Role::AgeGroup => "age-group",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Record
// =============================================================================

/// One mortality event. Attributes whose column is absent, or whose cell is
/// empty, are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub cause_code: Option<String>,
    pub cause_description: Option<String>,
    pub municipality: Option<String>,
    pub department: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub month: Option<i64>,
    pub year: Option<i64>,
    pub sex: Option<i64>,
    /// Kept raw; the age-group classifier decides what it means.
    pub age_group: Cell,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            cause_code: None,
            cause_description: None,
            municipality: None,
            department: None,
            latitude: None,
            longitude: None,
            month: None,
            year: None,
            sex: None,
            age_group: Cell::Empty,
        }
    }
}
