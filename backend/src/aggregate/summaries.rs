//! The seven summary transforms.
//!
//! Each one is a pure function of the [`Dataset`]: it reads the records,
//! groups and counts them, and returns its rows. None of them shares state
//! with another, so they can run in any order.

use serde::{Deserialize, Serialize};

use super::group::{count_by, sort_ascending, sort_descending, Coord};
use crate::dataset::Dataset;
use crate::error::{AggregateError, AggregateResult};
use crate::labels::{classify_age_group, month_name, SexLabel};
use crate::models::Role;

/// Cause-code prefix for homicides by firearm discharge.
pub const HOMICIDE_PREFIX: &str = "X95";

/// Rows kept in the homicide ranking.
pub const HOMICIDE_TOP: usize = 5;

/// Rows kept in the low-mortality ranking.
pub const LOW_MORTALITY_BOTTOM: usize = 10;

/// Rows kept in the causes table.
pub const CAUSES_TOP: usize = 10;

// =============================================================================
// Row types
// =============================================================================

/// Deaths per (department, latitude, longitude).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicTotal {
    pub department: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub total: usize,
}

/// Deaths per municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityCount {
    pub municipality: Option<String>,
    pub total: usize,
}

/// Deaths per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    pub month: Option<i64>,
    pub month_name: String,
    pub total: usize,
}

/// Deaths per (cause code, cause description).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseCount {
    #[serde(rename = "Code")]
    pub code: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    pub total: usize,
}

/// Deaths per (department, sex).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SexDepartmentCount {
    pub department: Option<String>,
    pub sex: SexLabel,
    pub total: usize,
}

/// Deaths per age-group category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroupCount {
    pub age_group: String,
    pub total: usize,
}

fn require(dataset: &Dataset, summary: &'static str, roles: &[Role]) -> AggregateResult<()> {
    match roles.iter().find(|role| !dataset.mapping().contains(**role)) {
        Some(role) => Err(AggregateError::UnresolvedRole { summary, role: *role }),
        None => Ok(()),
    }
}

// =============================================================================
// Transforms
// =============================================================================

/// Deaths per (department, latitude, longitude); every record counted once.
pub fn geographic_totals(dataset: &Dataset) -> AggregateResult<Vec<GeographicTotal>> {
    require(dataset, "geographic", &[Role::Department, Role::Latitude, Role::Longitude])?;

    let groups = count_by(dataset.records().iter().map(|r| {
        (r.department.clone(), r.latitude.map(Coord), r.longitude.map(Coord))
    }));

    Ok(groups
        .into_iter()
        .map(|((department, lat, lon), total)| GeographicTotal {
            department,
            latitude: lat.map(|c| c.0),
            longitude: lon.map(|c| c.0),
            total,
        })
        .collect())
}

/// Top municipalities by deaths whose cause code starts with `X95`.
pub fn homicide_ranking(dataset: &Dataset) -> AggregateResult<Vec<CityCount>> {
    require(dataset, "homicides", &[Role::CauseCode, Role::Municipality])?;

    let mut groups = count_by(
        dataset
            .records()
            .iter()
            .filter(|r| {
                r.cause_code
                    .as_deref()
                    .is_some_and(|code| code.starts_with(HOMICIDE_PREFIX))
            })
            .map(|r| r.municipality.clone()),
    );
    sort_descending(&mut groups);
    groups.truncate(HOMICIDE_TOP);

    Ok(into_city_counts(groups))
}

/// Deaths per month, ascending by month number.
pub fn monthly_totals(dataset: &Dataset) -> AggregateResult<Vec<MonthlyTotal>> {
    require(dataset, "monthly", &[Role::Month])?;

    let groups = count_by(dataset.records().iter().map(|r| r.month));

    Ok(groups
        .into_iter()
        .map(|(month, total)| MonthlyTotal {
            month,
            month_name: month_name(month).to_string(),
            total,
        })
        .collect())
}

/// The municipalities with the fewest deaths.
pub fn low_mortality_ranking(dataset: &Dataset) -> AggregateResult<Vec<CityCount>> {
    require(dataset, "low-mortality", &[Role::Municipality])?;

    let mut groups = count_by(dataset.records().iter().map(|r| r.municipality.clone()));
    sort_ascending(&mut groups);
    groups.truncate(LOW_MORTALITY_BOTTOM);

    Ok(into_city_counts(groups))
}

/// The most frequent (cause code, description) pairs.
pub fn top_causes(dataset: &Dataset) -> AggregateResult<Vec<CauseCount>> {
    require(dataset, "causes", &[Role::CauseCode, Role::CauseDescription])?;

    let mut groups = count_by(
        dataset
            .records()
            .iter()
            .map(|r| (r.cause_code.clone(), r.cause_description.clone())),
    );
    sort_descending(&mut groups);
    groups.truncate(CAUSES_TOP);

    Ok(groups
        .into_iter()
        .map(|((code, description), total)| CauseCount { code, description, total })
        .collect())
}

/// Deaths per (department, sex label), for a stacked bar per department.
pub fn sex_by_department(dataset: &Dataset) -> AggregateResult<Vec<SexDepartmentCount>> {
    require(dataset, "sex-by-department", &[Role::Department, Role::Sex])?;

    let groups = count_by(
        dataset
            .records()
            .iter()
            .map(|r| (r.department.clone(), SexLabel::from_code(r.sex))),
    );

    Ok(groups
        .into_iter()
        .map(|((department, sex), total)| SexDepartmentCount { department, sex, total })
        .collect())
}

/// Deaths per age-group category, largest first.
pub fn age_group_histogram(dataset: &Dataset) -> AggregateResult<Vec<AgeGroupCount>> {
    require(dataset, "age-groups", &[Role::AgeGroup])?;

    let mut groups = count_by(dataset.records().iter().map(|r| classify_age_group(&r.age_group)));
    sort_descending(&mut groups);

    Ok(groups
        .into_iter()
        .map(|(label, total)| AgeGroupCount {
            age_group: label.to_string(),
            total,
        })
        .collect())
}

fn into_city_counts(groups: Vec<(Option<String>, usize)>) -> Vec<CityCount> {
    groups
        .into_iter()
        .map(|(municipality, total)| CityCount { municipality, total })
        .collect()
}
