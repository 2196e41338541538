//! Aggregation module.
//!
//! - Group: count-by and stable sort primitives
//! - Summaries: the seven independent summary transforms
//!
//! [`Summaries::compute`] runs all seven over a [`Dataset`] and keeps the
//! results together with the display labels the rendering layer needs.

pub mod group;
pub mod summaries;

pub use summaries::*;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::dataset::Dataset;
use crate::error::{AggregateResult, DashboardResult};

/// Names of the seven summaries, as used by the API and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryName {
    Geographic,
    Homicides,
    Monthly,
    LowMortality,
    Causes,
    SexByDepartment,
    AgeGroups,
}

impl SummaryName {
    pub const ALL: [SummaryName; 7] = [
        SummaryName::Geographic,
        SummaryName::Homicides,
        SummaryName::Monthly,
        SummaryName::LowMortality,
        SummaryName::Causes,
        SummaryName::SexByDepartment,
        SummaryName::AgeGroups,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryName::Geographic => "geographic",
            SummaryName::Homicides => "homicides",
            SummaryName::Monthly => "monthly",
            SummaryName::LowMortality => "low-mortality",
            SummaryName::Causes => "causes",
            SummaryName::SexByDepartment => "sex-by-department",
            SummaryName::AgeGroups => "age-groups",
        }
    }

    /// Section heading on the dashboard page.
    pub fn title(&self) -> &'static str {
        match self {
            SummaryName::Geographic => "Total deaths by department in Colombia (2019)",
            SummaryName::Homicides => "The 5 most violent cities (homicides, X95 codes)",
            SummaryName::Monthly => "Total deaths per month",
            SummaryName::LowMortality => "The 10 cities with the lowest mortality",
            SummaryName::Causes => "The 10 main causes of death in Colombia",
            SummaryName::SexByDepartment => "Total deaths by sex and department",
            SummaryName::AgeGroups => "Distribution by age group",
        }
    }
}

impl fmt::Display for SummaryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SummaryName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("Unknown summary: {}", s))
    }
}

/// Display labels handed to the rendering layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLabels {
    pub department: &'static str,
    pub total: &'static str,
    pub sex: &'static str,
    pub code: &'static str,
    pub description: &'static str,
    pub age_group: &'static str,
    pub month: &'static str,
    pub municipality: &'static str,
    pub homicides: &'static str,
}

impl Default for DisplayLabels {
    fn default() -> Self {
        Self {
            department: "Department",
            total: "Total of deaths",
            sex: "Sex",
            code: "Code",
            description: "Description",
            age_group: "Age group",
            month: "Month",
            municipality: "City / Municipality",
            homicides: "Total of homicides",
        }
    }
}

/// The seven summary tables.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summaries {
    pub geographic: Vec<GeographicTotal>,
    pub homicides: Vec<CityCount>,
    pub monthly: Vec<MonthlyTotal>,
    pub low_mortality: Vec<CityCount>,
    pub causes: Vec<CauseCount>,
    pub sex_by_department: Vec<SexDepartmentCount>,
    pub age_groups: Vec<AgeGroupCount>,
    pub labels: DisplayLabels,
}

impl Summaries {
    /// Run every transform over the dataset.
    pub fn compute(dataset: &Dataset) -> AggregateResult<Self> {
        let summaries = Self {
            geographic: geographic_totals(dataset)?,
            homicides: homicide_ranking(dataset)?,
            monthly: monthly_totals(dataset)?,
            low_mortality: low_mortality_ranking(dataset)?,
            causes: top_causes(dataset)?,
            sex_by_department: sex_by_department(dataset)?,
            age_groups: age_group_histogram(dataset)?,
            labels: DisplayLabels::default(),
        };

        for name in SummaryName::ALL {
            info!(summary = %name, rows = summaries.row_count(name), "summary computed");
        }
        Ok(summaries)
    }

    pub fn row_count(&self, name: SummaryName) -> usize {
        match name {
            SummaryName::Geographic => self.geographic.len(),
            SummaryName::Homicides => self.homicides.len(),
            SummaryName::Monthly => self.monthly.len(),
            SummaryName::LowMortality => self.low_mortality.len(),
            SummaryName::Causes => self.causes.len(),
            SummaryName::SexByDepartment => self.sex_by_department.len(),
            SummaryName::AgeGroups => self.age_groups.len(),
        }
    }

    /// One summary's rows as JSON.
    pub fn to_json(&self, name: SummaryName) -> DashboardResult<Value> {
        let value = match name {
            SummaryName::Geographic => serde_json::to_value(&self.geographic)?,
            SummaryName::Homicides => serde_json::to_value(&self.homicides)?,
            SummaryName::Monthly => serde_json::to_value(&self.monthly)?,
            SummaryName::LowMortality => serde_json::to_value(&self.low_mortality)?,
            SummaryName::Causes => serde_json::to_value(&self.causes)?,
            SummaryName::SexByDepartment => serde_json::to_value(&self.sex_by_department)?,
            SummaryName::AgeGroups => serde_json::to_value(&self.age_groups)?,
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Record};
    use crate::resolver::ColumnMapping;

    fn sample() -> Dataset {
        let columns = [
            "COD_DEPARTAMENTO", "NOM_DEPARTAMENTO", "MUNICIPIO", "AÑO", "MES", "SEXO",
            "GRUPO_EDAD1", "COD_MUERTE", "MUERTE", "LATITUD", "LONGITUD",
        ];
        let rows = [
            ("ANTIOQUIA", "Medellín", 1, 1, 3, "X954", 6.25, -75.56),
            ("ANTIOQUIA", "Medellín", 1, 2, 7, "X954", 6.25, -75.56),
            ("ANTIOQUIA", "Bello", 2, 1, 2, "P071", 6.25, -75.56),
            ("VALLE DEL CAUCA", "Cali", 2, 2, 29, "X959", 3.43, -76.52),
            ("VALLE DEL CAUCA", "Cali", 12, 3, 40, "R99X", 3.43, -76.52),
        ];
        let records = rows
            .iter()
            .map(|(dept, muni, month, sex, age, code, lat, lon)| Record {
                cause_code: Some(code.to_string()),
                cause_description: Some(format!("Cause {code}")),
                municipality: Some(muni.to_string()),
                department: Some(dept.to_string()),
                latitude: Some(*lat),
                longitude: Some(*lon),
                month: Some(*month),
                year: Some(2019),
                sex: Some(*sex),
                age_group: Cell::Int(*age),
            })
            .collect();
        Dataset::from_records(ColumnMapping::resolve(&columns).unwrap(), records)
    }

    #[test]
    fn test_unfiltered_summaries_keep_all_records() {
        let dataset = sample();
        let s = Summaries::compute(&dataset).unwrap();
        let n = dataset.len();

        assert_eq!(s.geographic.iter().map(|r| r.total).sum::<usize>(), n);
        assert_eq!(s.monthly.iter().map(|r| r.total).sum::<usize>(), n);
        assert_eq!(s.sex_by_department.iter().map(|r| r.total).sum::<usize>(), n);
        assert_eq!(s.age_groups.iter().map(|r| r.total).sum::<usize>(), n);
        assert_eq!(s.homicides.iter().map(|r| r.total).sum::<usize>(), 3);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let dataset = sample();
        let first = serde_json::to_string(&Summaries::compute(&dataset).unwrap()).unwrap();
        let second = serde_json::to_string(&Summaries::compute(&dataset).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_names_round_trip() {
        for name in SummaryName::ALL {
            assert_eq!(name.as_str().parse::<SummaryName>().unwrap(), name);
        }
        assert!("pie".parse::<SummaryName>().is_err());
    }

    #[test]
    fn test_to_json_and_labels() {
        let s = Summaries::compute(&sample()).unwrap();
        let homicides = s.to_json(SummaryName::Homicides).unwrap();
        assert_eq!(homicides[0]["municipality"], "Medellín");
        assert_eq!(homicides[0]["total"], 2);

        let all = serde_json::to_value(&s).unwrap();
        assert_eq!(all["labels"]["total"], "Total of deaths");
        assert_eq!(all["labels"]["ageGroup"], "Age group");
        assert!(all["sexByDepartment"].is_array());
    }
}
