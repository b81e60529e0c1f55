//! Narrow-file CSV output: one file per entry plus a reconstructed
//! default-values side table.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use esr_core::{ResultTable, SchemaCatalog, SetTable};

use crate::write::{write_default_values_csv, write_set_csv, write_table_csv, WriteStrategy};

/// Writes each table as-is into a directory of `<name>.csv` files.
pub struct CsvDirWriter {
    path: PathBuf,
    catalog: SchemaCatalog,
}

impl CsvDirWriter {
    /// The catalog is kept so the close stage can re-emit default values.
    pub fn new(path: impl Into<PathBuf>, catalog: SchemaCatalog) -> Self {
        Self {
            path: path.into(),
            catalog,
        }
    }

    fn file_for(&self, name: &str) -> PathBuf {
        self.path.join(format!("{name}.csv"))
    }
}

impl WriteStrategy for CsvDirWriter {
    type Handle = ();

    fn open(&self) -> Result<Self::Handle> {
        fs::create_dir_all(&self.path)
            .with_context(|| format!("creating results folder {}", self.path.display()))?;
        Ok(())
    }

    fn write_set(&self, name: &str, table: &SetTable, _handle: &mut Self::Handle) -> Result<()> {
        write_set_csv(&self.file_for(name), table)
    }

    fn write_parameter(
        &self,
        name: &str,
        table: &ResultTable,
        _handle: &mut Self::Handle,
        _default: f64,
    ) -> Result<()> {
        if table.is_empty() {
            warn!(parameter = name, "result table is empty, skipping file");
            return Ok(());
        }
        info!(parameter = name, rows = table.len(), "writing narrow file");
        write_table_csv(&self.file_for(name), table)
    }

    fn close(&self, _handle: Self::Handle) -> Result<()> {
        if self.catalog.is_empty() {
            return Ok(());
        }
        write_default_values_csv(&self.file_for("default_values"), &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_input_csv_dir;
    use crate::write::write_results;
    use esr_core::{IndexValue, TableRow};
    use indexmap::IndexMap;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::from_json_str(
            r#"{
                "REGION": {"type": "set", "dtype": "str"},
                "YEAR": {"type": "set", "dtype": "int"},
                "AnnualCost": {
                    "type": "result",
                    "indices": ["REGION", "YEAR"],
                    "default": 0.0
                },
                "CapitalCost": {
                    "type": "param",
                    "indices": ["REGION", "YEAR"],
                    "default": 0.001
                }
            }"#,
        )
        .expect("valid catalog json")
    }

    fn sample_table() -> ResultTable {
        ResultTable {
            index_columns: vec!["REGION".into(), "YEAR".into()],
            rows: vec![
                TableRow {
                    index: vec![IndexValue::Str("SIMPLICITY".into()), IndexValue::Int(2015)],
                    value: 187.01576,
                },
                TableRow {
                    index: vec![IndexValue::Str("SIMPLICITY".into()), IndexValue::Int(2016)],
                    value: 183.30788,
                },
            ],
        }
    }

    fn sample_inputs() -> (IndexMap<String, SetTable>, IndexMap<String, ResultTable>) {
        let mut sets = IndexMap::new();
        sets.insert(
            "YEAR".to_string(),
            SetTable {
                elements: vec![IndexValue::Int(2015), IndexValue::Int(2016)],
            },
        );
        let mut params = IndexMap::new();
        params.insert("AnnualCost".to_string(), sample_table());
        (sets, params)
    }

    #[test]
    fn test_written_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let (sets, params) = sample_inputs();

        let writer = CsvDirWriter::new(dir.path(), catalog.clone());
        write_results(&writer, &catalog, &sets, &params).unwrap();

        let dataset = read_input_csv_dir(dir.path(), &catalog).unwrap();
        assert_eq!(dataset.params["AnnualCost"], sample_table());
        assert_eq!(dataset.sets["YEAR"], sets["YEAR"]);
    }

    #[test]
    fn test_default_values_side_table() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let (sets, params) = sample_inputs();

        let writer = CsvDirWriter::new(dir.path(), catalog.clone());
        write_results(&writer, &catalog, &sets, &params).unwrap();

        let defaults = std::fs::read_to_string(dir.path().join("default_values.csv")).unwrap();
        assert_eq!(
            defaults,
            "name,default_value\nAnnualCost,0\nCapitalCost,0.001\n"
        );
    }

    #[test]
    fn test_empty_table_skipped_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let mut params = IndexMap::new();
        params.insert("AnnualCost".to_string(), ResultTable::empty());

        let writer = CsvDirWriter::new(dir.path(), catalog.clone());
        write_results(&writer, &catalog, &IndexMap::new(), &params).unwrap();

        assert!(!dir.path().join("AnnualCost.csv").exists());
    }

    #[test]
    fn test_rewrites_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog();
        let (sets, params) = sample_inputs();
        let writer = CsvDirWriter::new(dir.path(), catalog.clone());

        write_results(&writer, &catalog, &sets, &params).unwrap();
        let first = std::fs::read(dir.path().join("AnnualCost.csv")).unwrap();
        write_results(&writer, &catalog, &sets, &params).unwrap();
        let second = std::fs::read(dir.path().join("AnnualCost.csv")).unwrap();

        assert_eq!(first, second);
    }
}
