//! Typed, read-only view of the source table.
//!
//! A [`Dataset`] is the resolved column mapping plus one [`Record`] per
//! source row. It is built once at startup and never mutated.

use tracing::{info, warn};

use crate::error::ResolveResult;
use crate::labels::{classify_age_group, month_name, SexLabel, NOT_SPECIFIED};
use crate::models::{Cell, Record, Role};
use crate::parser::RawTable;
use crate::resolver::ColumnMapping;

#[derive(Debug, Clone)]
pub struct Dataset {
    mapping: ColumnMapping,
    records: Vec<Record>,
    columns: Vec<String>,
}

impl Dataset {
    /// Resolve the table's columns and extract every row.
    ///
    /// Fails only through the column resolver's required-role gate.
    pub fn from_table(table: &RawTable) -> ResolveResult<Self> {
        let mapping = ColumnMapping::for_table(table)?;
        info!(detected = %mapping.describe_required(), "column roles resolved");
        Ok(Self::with_mapping(table, mapping))
    }

    /// Extract records with an already resolved mapping.
    pub fn with_mapping(table: &RawTable, mapping: ColumnMapping) -> Self {
        let records = table
            .rows
            .iter()
            .map(|row| extract_record(row, &mapping))
            .collect();

        let dataset = Self {
            mapping,
            records,
            columns: table.headers.clone(),
        };
        DegradedCounts::count(&dataset).log();
        dataset
    }

    /// Build a dataset directly from records, e.g. for tests or already
    /// typed sources.
    pub fn from_records(mapping: ColumnMapping, records: Vec<Record>) -> Self {
        Self {
            mapping,
            records,
            columns: Vec::new(),
        }
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Degraded values
// =============================================================================

/// Records whose values fell back to a sentinel label or a null group.
///
/// Only resolved roles are counted; an absent column is reported by the
/// transform that needs it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegradedCounts {
    /// Sex codes outside 1..=3
    pub unknown_sex: usize,
    /// Age-group codes classified as "Not specified"
    pub unspecified_age: usize,
    /// Months outside 1..=12
    pub unnamed_month: usize,
    /// Records with at least one empty grouping value
    pub null_keys: usize,
}

/// Roles whose values are used as group keys.
const KEY_ROLES: [Role; 7] = [
    Role::CauseCode,
    Role::CauseDescription,
    Role::Municipality,
    Role::Department,
    Role::Latitude,
    Role::Longitude,
    Role::Month,
];

impl DegradedCounts {
    pub fn count(dataset: &Dataset) -> Self {
        let mapping = dataset.mapping();
        let key_roles: Vec<Role> = KEY_ROLES.into_iter().filter(|r| mapping.contains(*r)).collect();
        let mut counts = Self::default();

        for record in dataset.records() {
            if mapping.contains(Role::Sex) && SexLabel::from_code(record.sex) == SexLabel::Unknown {
                counts.unknown_sex += 1;
            }
            if mapping.contains(Role::AgeGroup) && classify_age_group(&record.age_group) == NOT_SPECIFIED {
                counts.unspecified_age += 1;
            }
            if mapping.contains(Role::Month) && month_name(record.month) == NOT_SPECIFIED {
                counts.unnamed_month += 1;
            }
            if key_roles.iter().any(|role| is_null(record, *role)) {
                counts.null_keys += 1;
            }
        }

        counts
    }

    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    /// One `warn!` per non-zero count.
    pub fn log(&self) {
        if self.unknown_sex > 0 {
            warn!(count = self.unknown_sex, "sex codes outside 1-3 labelled Unknown");
        }
        if self.unspecified_age > 0 {
            warn!(count = self.unspecified_age, "age-group codes labelled {}", NOT_SPECIFIED);
        }
        if self.unnamed_month > 0 {
            warn!(count = self.unnamed_month, "months outside 1-12 labelled {}", NOT_SPECIFIED);
        }
        if self.null_keys > 0 {
            warn!(count = self.null_keys, "records with empty grouping values");
        }
    }
}

fn is_null(record: &Record, role: Role) -> bool {
    match role {
        Role::CauseCode => record.cause_code.is_none(),
        Role::CauseDescription => record.cause_description.is_none(),
        Role::Municipality => record.municipality.is_none(),
        Role::Department => record.department.is_none(),
        Role::Latitude => record.latitude.is_none(),
        Role::Longitude => record.longitude.is_none(),
        Role::Month => record.month.is_none(),
        Role::Year => record.year.is_none(),
        Role::Sex => record.sex.is_none(),
        Role::AgeGroup => record.age_group.is_empty(),
    }
}

static EMPTY: Cell = Cell::Empty;

fn cell_at<'a>(row: &'a [Cell], mapping: &ColumnMapping, role: Role) -> &'a Cell {
    mapping
        .index(role)
        .and_then(|i| row.get(i))
        .unwrap_or(&EMPTY)
}

fn extract_record(row: &[Cell], mapping: &ColumnMapping) -> Record {
    let cell = |role: Role| cell_at(row, mapping, role);

    Record {
        cause_code: cell(Role::CauseCode).as_text(),
        cause_description: cell(Role::CauseDescription).as_text(),
        municipality: cell(Role::Municipality).as_text(),
        department: cell(Role::Department).as_text(),
        latitude: cell(Role::Latitude).as_float(),
        longitude: cell(Role::Longitude).as_float(),
        month: cell(Role::Month).as_integer(),
        year: cell(Role::Year).as_integer(),
        sex: cell(Role::Sex).as_code(),
        age_group: cell(Role::AgeGroup).clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv;

    #[test]
    fn test_records_extracted_by_role() {
        let table = parse_csv(
            "COD_MUERTE;MUERTE;MUNICIPIO;MES;AÑO;SEXO;GRUPO_EDAD1;LATITUD\n\
             X954;Agresión con disparo;Cali;3;2019;1;8;3.45\n\
             Y10;;Pasto;;2019;9;abc;",
            ';',
        )
        .unwrap();
        let dataset = Dataset::from_table(&table).unwrap();
        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.cause_code.as_deref(), Some("X954"));
        assert_eq!(first.cause_description.as_deref(), Some("Agresión con disparo"));
        assert_eq!(first.municipality.as_deref(), Some("Cali"));
        assert_eq!(first.month, Some(3));
        assert_eq!(first.year, Some(2019));
        assert_eq!(first.sex, Some(1));
        assert_eq!(first.age_group, Cell::Int(8));
        assert_eq!(first.latitude, Some(3.45));
        // No LONGITUD / NOM_DEPARTAMENTO columns
        assert_eq!(first.longitude, None);
        assert_eq!(first.department, None);

        let second = &dataset.records()[1];
        assert_eq!(second.cause_description, None);
        assert_eq!(second.month, None);
        assert_eq!(second.age_group, Cell::Text("abc".into()));
    }

    #[test]
    fn test_numeric_cause_code_as_text() {
        let table = RawTable::new(
            vec!["COD_MUERTE".into(), "MUNICIPIO".into(), "MES".into(), "ANO".into()],
            vec![vec![Cell::Float(1010.0), Cell::Int(5001), Cell::Float(2.0), Cell::Int(2019)]],
            "test",
        );
        let dataset = Dataset::from_table(&table).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.cause_code.as_deref(), Some("1010"));
        assert_eq!(record.municipality.as_deref(), Some("5001"));
        assert_eq!(record.month, Some(2));
    }

    #[test]
    fn test_sex_code_must_be_exact() {
        let table = RawTable::new(
            vec!["COD_MUERTE".into(), "MUNICIPIO".into(), "MES".into(), "ANO".into(), "SEXO".into()],
            vec![
                vec![Cell::Text("X954".into()), Cell::Text("Cali".into()), Cell::Int(1), Cell::Int(2019), Cell::Float(1.7)],
                vec![Cell::Text("X954".into()), Cell::Text("Cali".into()), Cell::Int(1), Cell::Int(2019), Cell::Text("2".into())],
                vec![Cell::Text("X954".into()), Cell::Text("Cali".into()), Cell::Int(1), Cell::Int(2019), Cell::Float(2.0)],
            ],
            "test",
        );
        let dataset = Dataset::from_table(&table).unwrap();
        let sexes: Vec<Option<i64>> = dataset.records().iter().map(|r| r.sex).collect();
        assert_eq!(sexes, vec![None, None, Some(2)]);
    }

    #[test]
    fn test_degraded_counts() {
        let table = parse_csv(
            "COD_MUERTE;MUNICIPIO;MES;AÑO;SEXO;GRUPO_EDAD1\n\
             X954;Cali;3;2019;1;8\n\
             X954;;13;2019;9;abc\n\
             ;Pasto;;2019;2;40\n\
             Y10;Pasto;5;2019;3;29",
            ';',
        )
        .unwrap();
        let dataset = Dataset::from_table(&table).unwrap();
        let counts = DegradedCounts::count(&dataset);

        assert_eq!(
            counts,
            DegradedCounts {
                unknown_sex: 1,
                unspecified_age: 2,
                unnamed_month: 2,
                null_keys: 2,
            }
        );
        assert!(!counts.is_clean());
    }

    #[test]
    fn test_unresolved_roles_not_counted() {
        let table = parse_csv("COD_MUERTE;MUNICIPIO;MES;ANO\nX954;Cali;3;2019", ';').unwrap();
        let dataset = Dataset::from_table(&table).unwrap();
        assert!(DegradedCounts::count(&dataset).is_clean());
    }
}
