//! Column role resolution.
//!
//! Maps the normalized column names of a [`RawTable`] to semantic
//! [`Role`]s with an ordered table of substring rules. The first column (in
//! source order) containing one of a role's candidates wins. Matching is
//! accent-insensitive: `AÑO` and `ANO` are the same needle.
//!
//! Resolution is the only validation gate: if any of
//! [`Role::REQUIRED`] stays unresolved, [`ColumnMapping::resolve`] fails
//! with [`ResolveError::MissingRequiredColumn`] before anything is computed.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{ResolveError, ResolveResult};
use crate::models::Role;
use crate::parser::RawTable;

/// How a role is found among the column names.
#[derive(Debug, Clone, Copy)]
pub struct RoleRule {
    pub role: Role,
    /// Substrings, any of which selects a column
    pub candidates: &'static [&'static str],
    /// Substrings that disqualify a column even if a candidate matched
    pub excludes: &'static [&'static str],
}

/// Resolution rules, evaluated per role.
pub const ROLE_RULES: [RoleRule; 10] = [
    RoleRule { role: Role::CauseCode, candidates: &["COD_MUERTE"], excludes: &[] },
    // COD_MUERTE also contains MUERTE
    RoleRule { role: Role::CauseDescription, candidates: &["MUERTE"], excludes: &["COD_"] },
    RoleRule { role: Role::Municipality, candidates: &["MUNICIPIO", "CIUDAD"], excludes: &[] },
    RoleRule { role: Role::Department, candidates: &["NOM_DEPARTAMENTO"], excludes: &[] },
    RoleRule { role: Role::Month, candidates: &["MES"], excludes: &[] },
    RoleRule { role: Role::Year, candidates: &["ANO", "AÑO"], excludes: &[] },
    RoleRule { role: Role::Sex, candidates: &["SEXO"], excludes: &[] },
    RoleRule { role: Role::Latitude, candidates: &["LATITUD"], excludes: &[] },
    RoleRule { role: Role::Longitude, candidates: &["LONGITUD"], excludes: &[] },
    RoleRule { role: Role::AgeGroup, candidates: &["GRUPO_EDAD"], excludes: &[] },
];

/// A resolved column: its name and position in the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub name: String,
    pub index: usize,
}

/// Role → column mapping, built once and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    columns: BTreeMap<Role, ResolvedColumn>,
}

impl ColumnMapping {
    /// Resolve every role against the given column names, failing if a
    /// required role is missing.
    pub fn resolve<S: AsRef<str>>(columns: &[S]) -> ResolveResult<Self> {
        let mapping = Self::detect(columns);

        let missing: Vec<Role> = Role::REQUIRED
            .iter()
            .copied()
            .filter(|role| !mapping.contains(*role))
            .collect();

        if !missing.is_empty() {
            return Err(ResolveError::MissingRequiredColumn {
                missing,
                detected: mapping.describe_required(),
            });
        }

        Ok(mapping)
    }

    /// Resolve against a loaded table's headers.
    pub fn for_table(table: &RawTable) -> ResolveResult<Self> {
        Self::resolve(&table.headers)
    }

    /// Apply the rules without validating; unmatched roles are simply absent.
    pub fn detect<S: AsRef<str>>(columns: &[S]) -> Self {
        let folded: Vec<String> = columns.iter().map(|c| fold_accents(c.as_ref())).collect();
        let mut mapping = ColumnMapping::default();

        for rule in &ROLE_RULES {
            let found = folded.iter().position(|column| rule_matches(rule, column));
            match found {
                Some(index) => {
                    let name = columns[index].as_ref().to_string();
                    debug!(role = %rule.role, column = %name, "resolved column");
                    mapping.columns.insert(rule.role, ResolvedColumn { name, index });
                }
                None => debug!(role = %rule.role, "no column matched"),
            }
        }

        mapping
    }

    pub fn get(&self, role: Role) -> Option<&ResolvedColumn> {
        self.columns.get(&role)
    }

    pub fn name(&self, role: Role) -> Option<&str> {
        self.columns.get(&role).map(|c| c.name.as_str())
    }

    pub fn index(&self, role: Role) -> Option<usize> {
        self.columns.get(&role).map(|c| c.index)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.columns.contains_key(&role)
    }

    /// `role=COLUMN` for each required role, `<none>` when unresolved.
    pub fn describe_required(&self) -> String {
        Role::REQUIRED
            .iter()
            .map(|role| format!("{}={}", role, self.name(*role).unwrap_or("<none>")))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Every role with its column, `None` when unresolved.
    pub fn entries(&self) -> Vec<(Role, Option<&str>)> {
        Role::ALL.iter().map(|role| (*role, self.name(*role))).collect()
    }
}

fn rule_matches(rule: &RoleRule, folded_column: &str) -> bool {
    let hit = rule
        .candidates
        .iter()
        .any(|needle| folded_column.contains(fold_accents(needle).as_str()));
    hit && !rule
        .excludes
        .iter()
        .any(|needle| folded_column.contains(fold_accents(needle).as_str()))
}

/// Uppercase and strip Spanish diacritics.
pub fn fold_accents(s: &str) -> String {
    s.to_uppercase()
        .chars()
        .map(|c| match c {
            'Á' | 'À' | 'Â' | 'Ä' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Ö' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_minimal_columns_resolve() {
        let columns = cols(&["COD_MUERTE", "MUNICIPIO", "MES", "ANO", "LATITUD", "LONGITUD"]);
        let mapping = ColumnMapping::resolve(&columns).unwrap();

        assert_eq!(mapping.name(Role::CauseCode), Some("COD_MUERTE"));
        assert_eq!(mapping.name(Role::Municipality), Some("MUNICIPIO"));
        assert_eq!(mapping.name(Role::Month), Some("MES"));
        assert_eq!(mapping.name(Role::Year), Some("ANO"));
        assert_eq!(mapping.index(Role::Longitude), Some(5));
        assert!(!mapping.contains(Role::Sex));
    }

    #[test]
    fn test_missing_month_fails() {
        let columns = cols(&["COD_MUERTE", "MUNICIPIO", "ANO", "LATITUD", "LONGITUD"]);
        let err = ColumnMapping::resolve(&columns).unwrap_err();

        let ResolveError::MissingRequiredColumn { missing, detected } = &err;
        assert_eq!(missing, &vec![Role::Month]);
        assert!(detected.contains("month=<none>"));
        assert!(detected.contains("cause-code=COD_MUERTE"));
        assert!(err.to_string().contains("month"));
    }

    #[test]
    fn test_accented_year() {
        let mapping = ColumnMapping::resolve(&cols(&["COD_MUERTE", "CIUDAD", "MES", "AÑO"])).unwrap();
        assert_eq!(mapping.name(Role::Year), Some("AÑO"));
        assert_eq!(mapping.name(Role::Municipality), Some("CIUDAD"));
    }

    #[test]
    fn test_description_skips_code_column() {
        let mapping = ColumnMapping::detect(&cols(&["COD_MUERTE", "MUERTE"]));
        assert_eq!(mapping.name(Role::CauseCode), Some("COD_MUERTE"));
        assert_eq!(mapping.name(Role::CauseDescription), Some("MUERTE"));
    }

    #[test]
    fn test_first_match_wins() {
        let mapping = ColumnMapping::detect(&cols(&["COD_MUNICIPIO", "MUNICIPIO"]));
        assert_eq!(mapping.index(Role::Municipality), Some(0));
    }

    #[test]
    fn test_full_source_layout() {
        let columns = cols(&[
            "COD_DANE", "COD_DEPARTAMENTO", "NOM_DEPARTAMENTO", "MUNICIPIO", "AÑO", "MES",
            "SEXO", "GRUPO_EDAD1", "COD_MUERTE", "MUERTE", "LATITUD", "LONGITUD",
        ]);
        let mapping = ColumnMapping::resolve(&columns).unwrap();
        assert!(Role::ALL.iter().all(|r| mapping.contains(*r)));
        assert_eq!(mapping.name(Role::AgeGroup), Some("GRUPO_EDAD1"));
        assert_eq!(mapping.name(Role::Department), Some("NOM_DEPARTAMENTO"));
    }

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("año"), "ANO");
        assert_eq!(fold_accents("Bogotá"), "BOGOTA");
    }
}
