use std::{fs, path::Path, sync::Arc};

use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use serde::Deserialize;

const BUILTIN_STATES: &str = include_str!("../../data/states.json");

/// A state or equivalent entity, identified by its numeric (FIPS) code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jurisdiction {
    pub code: u16,
    pub abbreviation: Arc<str>,  // USPS code, e.g. "OH"
    pub name: Arc<str>,          // Full name, e.g. "Ohio"
}

#[derive(Debug, Deserialize)]
struct CodeRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "FIPS")]
    fips: u16,
    #[serde(rename = "USPS")]
    usps: String,
}

/// Immutable lookup from jurisdiction code to abbreviation and name.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    by_code: AHashMap<u16, Jurisdiction>,
    by_abbreviation: AHashMap<Arc<str>, u16>,
}

impl CodeTable {
    /// Build a table, rejecting duplicate codes or abbreviations.
    pub fn new(jurisdictions: impl IntoIterator<Item = Jurisdiction>) -> Result<Self> {
        let mut table = Self::default();
        for jurisdiction in jurisdictions {
            if table.by_code.contains_key(&jurisdiction.code) {
                bail!("Duplicate jurisdiction code {} in code table", jurisdiction.code);
            }
            if table.by_abbreviation.contains_key(&jurisdiction.abbreviation) {
                bail!("Duplicate jurisdiction abbreviation '{}' in code table", jurisdiction.abbreviation);
            }
            table.by_abbreviation.insert(jurisdiction.abbreviation.clone(), jurisdiction.code);
            table.by_code.insert(jurisdiction.code, jurisdiction);
        }
        Ok(table)
    }

    /// The U.S. states, D.C. and territories shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_STATES).expect("built-in code table is valid")
    }

    /// Parse a `[{"Name", "FIPS", "USPS"}, ...]` document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let records: Vec<CodeRecord> = serde_json::from_str(text)
            .context("Failed to parse jurisdiction code table")?;
        if records.is_empty() {
            bail!("Jurisdiction code table is empty");
        }
        Self::new(records.into_iter().map(|record| Jurisdiction {
            code: record.fips,
            abbreviation: record.usps.into(),
            name: record.name.into(),
        }))
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read code table {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid code table {}", path.display()))
    }

    #[inline] pub fn len(&self) -> usize { self.by_code.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.by_code.is_empty() }

    #[inline]
    pub fn get(&self, code: u16) -> Option<&Jurisdiction> {
        self.by_code.get(&code)
    }

    pub fn by_abbreviation(&self, abbreviation: &str) -> Option<&Jurisdiction> {
        self.by_abbreviation.get(abbreviation).and_then(|code| self.by_code.get(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_resolves_states() {
        let table = CodeTable::builtin();
        let ohio = table.get(39).unwrap();
        assert_eq!(&*ohio.abbreviation, "OH");
        assert_eq!(&*ohio.name, "Ohio");
        assert_eq!(table.by_abbreviation("CA").unwrap().code, 6);
        assert!(table.get(3).is_none());
        assert!(table.len() >= 50);
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let text = r#"[{"Name": "A", "FIPS": 1, "USPS": "AA"}, {"Name": "B", "FIPS": 1, "USPS": "BB"}]"#;
        assert!(CodeTable::from_json_str(text).is_err());
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(CodeTable::from_json_str("[]").is_err());
    }

    #[test]
    fn reads_table_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.json");
        fs::write(&path, r#"[{"Name": "Ohio", "FIPS": 39, "USPS": "OH"}]"#).unwrap();

        let table = CodeTable::read_json(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert!(CodeTable::read_json(&dir.path().join("missing.json")).is_err());
    }
}
