//! Schema catalog for model sets, parameters and result variables.
//!
//! The catalog is the single source of truth for how a variable is indexed:
//! its ordered list of dimension names and the element data type of each
//! backing set. It is constructed once at process start and passed by
//! reference into every component that needs lookups; there is no ambient
//! schema state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EsrError, EsrResult};

/// Kind of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A model set (index domain), e.g. REGION or YEAR
    Set,
    /// An input parameter
    Param,
    /// A solver result variable
    Result,
}

/// Element data type for set members and parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    #[default]
    Str,
    Int,
    Float,
}

/// Configuration for one named entry in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryConfig {
    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Ordered dimension names (sets) indexing this entry. Empty for sets.
    #[serde(default)]
    pub indices: Vec<String>,

    /// Element type of set members, or value type for params/results.
    #[serde(default)]
    pub dtype: ElementType,

    /// Default value, used by default-eliding output formats.
    #[serde(default)]
    pub default: f64,
}

/// Read-only mapping from entry name to its declared configuration.
///
/// Backed by an [`IndexMap`] so that iteration follows declaration order,
/// which keeps every output format deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaCatalog {
    entries: IndexMap<String, EntryConfig>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from its JSON representation.
    pub fn from_json_str(json: &str) -> EsrResult<Self> {
        let catalog: SchemaCatalog = serde_json::from_str(json)?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> EsrResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Insert an entry (used by tests and programmatic construction).
    pub fn insert(&mut self, name: impl Into<String>, config: EntryConfig) {
        self.entries.insert(name.into(), config);
    }

    pub fn get(&self, name: &str) -> Option<&EntryConfig> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &EntryConfig)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, name: &str) -> EsrResult<&EntryConfig> {
        self.entries.get(name).ok_or_else(|| EsrError::SchemaLookup {
            name: name.to_string(),
        })
    }

    /// Ordered dimension names declared for a variable.
    pub fn indices(&self, name: &str) -> EsrResult<&[String]> {
        Ok(&self.lookup(name)?.indices)
    }

    /// Number of dimension tokens a raw solution record carries for this
    /// variable.
    ///
    /// Solver output lines do not repeat the trailing YEAR index; the year
    /// is implied by the position of each value in the per-year sequence.
    pub fn record_dimension_count(&self, name: &str) -> EsrResult<usize> {
        let indices = self.indices(name)?;
        let count = indices.len();
        if indices.last().map(String::as_str) == Some("YEAR") {
            Ok(count - 1)
        } else {
            Ok(count)
        }
    }

    /// Element type of the set backing a dimension column.
    pub fn element_type(&self, set_name: &str) -> EsrResult<ElementType> {
        let entry = self.lookup(set_name)?;
        if entry.kind != EntryKind::Set {
            return Err(EsrError::Schema(format!(
                "'{set_name}' is used as a dimension but is not a set"
            )));
        }
        Ok(entry.dtype)
    }

    /// (name, default) pairs for every param and result entry, in
    /// declaration order.
    pub fn default_values(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.kind != EntryKind::Set)
            .map(|(name, entry)| (name.as_str(), entry.default))
    }

    /// Names of all result entries, in declaration order.
    pub fn result_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.kind == EntryKind::Result)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> SchemaCatalog {
        SchemaCatalog::from_json_str(
            r#"{
                "REGION": {"type": "set", "dtype": "str"},
                "TECHNOLOGY": {"type": "set", "dtype": "str"},
                "YEAR": {"type": "set", "dtype": "int"},
                "CapitalCost": {
                    "type": "param",
                    "indices": ["REGION", "TECHNOLOGY", "YEAR"],
                    "dtype": "float",
                    "default": 0.001
                },
                "AnnualCost": {
                    "type": "result",
                    "indices": ["REGION", "TECHNOLOGY", "YEAR"],
                    "dtype": "float"
                }
            }"#,
        )
        .expect("valid catalog json")
    }

    #[test]
    fn test_lookup_unknown_name() {
        let catalog = sample_catalog();
        let err = catalog.indices("NoSuchVariable").unwrap_err();
        assert!(matches!(err, EsrError::SchemaLookup { .. }));
    }

    #[test]
    fn test_record_dimension_count_excludes_trailing_year() {
        let catalog = sample_catalog();
        assert_eq!(catalog.record_dimension_count("AnnualCost").unwrap(), 2);
    }

    #[test]
    fn test_element_types() {
        let catalog = sample_catalog();
        assert_eq!(catalog.element_type("REGION").unwrap(), ElementType::Str);
        assert_eq!(catalog.element_type("YEAR").unwrap(), ElementType::Int);
        assert!(catalog.element_type("AnnualCost").is_err());
    }

    #[test]
    fn test_default_values_in_declaration_order() {
        let catalog = sample_catalog();
        let defaults: Vec<_> = catalog.default_values().collect();
        assert_eq!(defaults, vec![("CapitalCost", 0.001), ("AnnualCost", 0.0)]);
    }

    #[test]
    fn test_result_names() {
        let catalog = sample_catalog();
        let names: Vec<_> = catalog.result_names().collect();
        assert_eq!(names, vec!["AnnualCost"]);
    }
}
