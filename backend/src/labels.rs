//! Derived labels: sex, age-group category and month name.
//!
//! All three are static lookup tables; every input maps to a label, so
//! classification never fails. Unusable codes degrade to a sentinel label.

use chrono::Month;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Cell;

/// Label for any code outside the known tables.
pub const NOT_SPECIFIED: &str = "Not specified";

// =============================================================================
// Sex
// =============================================================================

/// Sex label derived from the numeric sex code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SexLabel {
    Male,
    Female,
    Indeterminate,
    Unknown,
}

impl SexLabel {
    /// 1 → Male, 2 → Female, 3 → Indeterminate, anything else → Unknown.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => SexLabel::Male,
            Some(2) => SexLabel::Female,
            Some(3) => SexLabel::Indeterminate,
            _ => SexLabel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SexLabel::Male => "Male",
            SexLabel::Female => "Female",
            SexLabel::Indeterminate => "Indeterminate",
            SexLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SexLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Age group
// =============================================================================

/// Inclusive code ranges and their labels. Disjoint, covering 0..=29.
pub const AGE_GROUPS: [(i64, i64, &str); 11] = [
    (0, 4, "Neonatal mortality"),
    (5, 6, "Infant mortality"),
    (7, 8, "Early childhood"),
    (9, 10, "Childhood"),
    (11, 11, "Adolescence"),
    (12, 13, "Youth"),
    (14, 16, "Early adulthood"),
    (17, 19, "Middle adulthood"),
    (20, 24, "Old age"),
    (25, 28, "Longevity / Centenarians"),
    (29, 29, "Unknown age"),
];

/// Classify a raw age-group cell.
///
/// Non-integer and missing values, as well as integers outside every range,
/// yield [`NOT_SPECIFIED`].
pub fn classify_age_group(cell: &Cell) -> &'static str {
    match cell.as_integer() {
        Some(code) => classify_age_code(code),
        None => NOT_SPECIFIED,
    }
}

/// Classify an integer age-group code.
pub fn classify_age_code(code: i64) -> &'static str {
    AGE_GROUPS
        .iter()
        .find(|(lo, hi, _)| (*lo..=*hi).contains(&code))
        .map(|(_, _, label)| *label)
        .unwrap_or(NOT_SPECIFIED)
}

// =============================================================================
// Month
// =============================================================================

/// English month name for 1..=12, [`NOT_SPECIFIED`] otherwise.
pub fn month_name(month: Option<i64>) -> &'static str {
    month
        .and_then(|m| u8::try_from(m).ok())
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or(NOT_SPECIFIED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_labels() {
        assert_eq!(SexLabel::from_code(Some(1)), SexLabel::Male);
        assert_eq!(SexLabel::from_code(Some(2)), SexLabel::Female);
        assert_eq!(SexLabel::from_code(Some(3)), SexLabel::Indeterminate);
        assert_eq!(SexLabel::from_code(Some(99)), SexLabel::Unknown);
        assert_eq!(SexLabel::from_code(None), SexLabel::Unknown);
        assert_eq!(SexLabel::Female.to_string(), "Female");
    }

    #[test]
    fn test_every_code_in_exactly_one_range() {
        for code in 0..=29 {
            let hits = AGE_GROUPS
                .iter()
                .filter(|(lo, hi, _)| (*lo..=*hi).contains(&code))
                .count();
            assert_eq!(hits, 1, "code {code}");
            assert_ne!(classify_age_code(code), NOT_SPECIFIED);
        }
    }

    #[test]
    fn test_out_of_domain_codes() {
        assert_eq!(classify_age_group(&Cell::Int(30)), NOT_SPECIFIED);
        assert_eq!(classify_age_group(&Cell::Int(-1)), NOT_SPECIFIED);
        assert_eq!(classify_age_group(&Cell::Text("abc".into())), NOT_SPECIFIED);
        assert_eq!(classify_age_group(&Cell::Empty), NOT_SPECIFIED);
    }

    #[test]
    fn test_range_boundaries() {
        assert_eq!(classify_age_code(0), "Neonatal mortality");
        assert_eq!(classify_age_code(4), "Neonatal mortality");
        assert_eq!(classify_age_code(5), "Infant mortality");
        assert_eq!(classify_age_code(11), "Adolescence");
        assert_eq!(classify_age_code(28), "Longevity / Centenarians");
        assert_eq!(classify_age_code(29), "Unknown age");
        // Text and float codes convert like integers
        assert_eq!(classify_age_group(&Cell::Text(" 7 ".into())), "Early childhood");
        assert_eq!(classify_age_group(&Cell::Float(9.0)), "Childhood");
    }

    #[test]
    fn test_classification_is_stable() {
        let cell = Cell::Int(17);
        assert_eq!(classify_age_group(&cell), classify_age_group(&cell));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(Some(1)), "January");
        assert_eq!(month_name(Some(12)), "December");
        assert_eq!(month_name(Some(13)), NOT_SPECIFIED);
        assert_eq!(month_name(Some(0)), NOT_SPECIFIED);
        assert_eq!(month_name(None), NOT_SPECIFIED);
    }
}
