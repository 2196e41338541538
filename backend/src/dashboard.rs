//! High-level API: load a source file and compute every summary.
//!
//! # Example
//!
//! ```rust,ignore
//! use mortality::Dashboard;
//!
//! let dashboard = Dashboard::load("NoFetal2019_BD.xlsx")?;
//! println!("{} records, {} homicide rows", dashboard.record_count, dashboard.summaries.homicides.len());
//! ```

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::aggregate::Summaries;
use crate::dataset::Dataset;
use crate::error::DashboardResult;
use crate::models::Role;
use crate::parser::{load_table, RawTable};
use crate::resolver::ColumnMapping;

/// Everything the rendering layer needs, computed once at startup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Where the data came from
    pub source: String,
    /// Number of records loaded
    pub record_count: usize,
    /// Normalized source columns
    pub columns: Vec<String>,
    /// Resolved column roles
    pub mapping: ColumnMapping,
    /// The seven summary tables
    pub summaries: Summaries,
}

impl Dashboard {
    /// Load a spreadsheet or CSV file and build the dashboard.
    ///
    /// Fails fast when a required column is missing; nothing is computed in
    /// that case.
    pub fn load<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading mortality records");
        let table = load_table(path)?;
        Self::from_table(&table, path.display().to_string())
    }

    /// Build the dashboard from an already loaded table.
    pub fn from_table(table: &RawTable, source: impl Into<String>) -> DashboardResult<Self> {
        let dataset = Dataset::from_table(table)?;
        Self::from_dataset(&dataset, source)
    }

    /// Build the dashboard from a dataset. A table with headers but no rows
    /// yields seven empty summaries.
    pub fn from_dataset(dataset: &Dataset, source: impl Into<String>) -> DashboardResult<Self> {
        let summaries = Summaries::compute(dataset)?;
        info!(records = dataset.len(), "dashboard ready");

        Ok(Self {
            source: source.into(),
            record_count: dataset.len(),
            columns: dataset.columns().to_vec(),
            mapping: dataset.mapping().clone(),
            summaries,
        })
    }

    /// Role → column pairs, for display.
    pub fn column_roles(&self) -> Vec<(Role, Option<&str>)> {
        self.mapping.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::SummaryName;
    use crate::error::{AggregateError, DashboardError, ResolveError};
    use crate::parser::parse_csv;

    const CSV: &str = "\
NOM_DEPARTAMENTO;MUNICIPIO;AÑO;MES;SEXO;GRUPO_EDAD1;COD_MUERTE;MUERTE;LATITUD;LONGITUD
NARIÑO;Pasto;2019;1;1;3;X954;Agresión con disparo;1.21;-77.28
NARIÑO;Pasto;2019;2;2;8;P071;Bajo peso al nacer;1.21;-77.28
CAUCA;Popayán;2019;2;3;abc;X959;Agresión con disparo;2.44;-76.61
";

    #[test]
    fn test_from_table() {
        let table = parse_csv(CSV, ';').unwrap();
        let dashboard = Dashboard::from_table(&table, "inline").unwrap();

        assert_eq!(dashboard.record_count, 3);
        assert_eq!(dashboard.summaries.homicides.len(), 2);
        assert_eq!(dashboard.summaries.monthly[1].month_name, "February");
        assert_eq!(dashboard.mapping.name(Role::Year), Some("AÑO"));
        assert_eq!(dashboard.column_roles().len(), Role::ALL.len());
    }

    #[test]
    fn test_missing_required_column_stops_everything() {
        let table = parse_csv("COD_MUERTE;MUNICIPIO;ANO\nX954;Pasto;2019", ';').unwrap();
        let err = Dashboard::from_table(&table, "inline").unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Resolve(ResolveError::MissingRequiredColumn { ref missing, .. })
                if missing == &vec![Role::Month]
        ));
    }

    #[test]
    fn test_missing_optional_column_stops_startup() {
        let table = parse_csv("COD_MUERTE;MUNICIPIO;MES;ANO\nX954;Pasto;1;2019", ';').unwrap();
        let err = Dashboard::from_table(&table, "inline").unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Aggregate(AggregateError::UnresolvedRole { summary: "geographic", role: Role::Department })
        ));
    }

    #[test]
    fn test_empty_table() {
        let header = CSV.lines().next().unwrap();
        let table = parse_csv(&format!("{}\n", header), ';').unwrap();
        let dashboard = Dashboard::from_table(&table, "inline").unwrap();

        assert_eq!(dashboard.record_count, 0);
        for name in SummaryName::ALL {
            assert_eq!(dashboard.summaries.row_count(name), 0, "{} should be empty", name);
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nofetal.csv");
        std::fs::write(&path, CSV).unwrap();

        let dashboard = Dashboard::load(&path).unwrap();
        assert_eq!(dashboard.record_count, 3);
        assert!(dashboard.source.ends_with("nofetal.csv"));
    }
}
