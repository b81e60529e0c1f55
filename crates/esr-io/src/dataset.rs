//! Input dataset loading.
//!
//! Reads a directory of narrow per-entry CSV files (the same layout the
//! CSV write strategy emits) into typed tables: set listings for the write
//! stage and parameter tables for the derived-value resolver's context.
//! Round-trips with [`crate::write::CsvDirWriter`].

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use indexmap::IndexMap;
use tracing::debug;

use esr_core::{
    EntryKind, EsrError, IndexValue, ResultTable, SchemaCatalog, SetTable, TableRow, VALUE_COLUMN,
};

/// Typed view of an on-disk input dataset.
#[derive(Debug, Default)]
pub struct InputDataset {
    pub sets: IndexMap<String, SetTable>,
    pub params: IndexMap<String, ResultTable>,
}

/// Read every catalog entry that has a backing `<name>.csv` in `dir`.
///
/// Entries without a file are simply absent from the returned dataset;
/// malformed files are structural errors and abort the load.
pub fn read_input_csv_dir(dir: &Path, catalog: &SchemaCatalog) -> Result<InputDataset> {
    let mut dataset = InputDataset::default();

    for (name, entry) in catalog.iter() {
        let path = dir.join(format!("{name}.csv"));
        if !path.exists() {
            continue;
        }

        match entry.kind {
            EntryKind::Set => {
                let table = read_set_csv(&path, catalog, name)?;
                dataset.sets.insert(name.clone(), table);
            }
            EntryKind::Param | EntryKind::Result => {
                let table = read_table_csv(&path, catalog)?;
                dataset.params.insert(name.clone(), table);
            }
        }
    }

    debug!(
        sets = dataset.sets.len(),
        params = dataset.params.len(),
        "input dataset loaded"
    );
    Ok(dataset)
}

fn read_set_csv(path: &Path, catalog: &SchemaCatalog, name: &str) -> Result<SetTable> {
    let dtype = catalog.element_type(name)?;
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("opening set csv {}", path.display()))?;

    let mut elements = Vec::new();
    for record in reader.records() {
        let record = record?;
        let token = record
            .get(0)
            .ok_or_else(|| EsrError::Schema(format!("empty row in {}", path.display())))?;
        elements.push(IndexValue::coerce(token, dtype)?);
    }
    Ok(SetTable { elements })
}

/// Read a long-form table: all columns up to `VALUE` are index columns.
pub fn read_table_csv(path: &Path, catalog: &SchemaCatalog) -> Result<ResultTable> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("opening table csv {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let value_position = columns
        .iter()
        .position(|c| c == VALUE_COLUMN)
        .ok_or_else(|| {
            EsrError::Schema(format!("no {VALUE_COLUMN} column in {}", path.display()))
        })?;
    let index_columns: Vec<String> = columns[..value_position].to_vec();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut index = Vec::with_capacity(index_columns.len());
        for (position, column) in index_columns.iter().enumerate() {
            let token = record.get(position).unwrap_or_default();
            // A renamed duplicate column ("_REGION") is still typed by the
            // original set.
            let set_name = column.strip_prefix('_').unwrap_or(column);
            let dtype = catalog.element_type(set_name)?;
            index.push(IndexValue::coerce(token, dtype)?);
        }

        let value_token = record.get(value_position).unwrap_or_default();
        let value = value_token.parse::<f64>().map_err(|_| {
            EsrError::Schema(format!(
                "unparseable value '{value_token}' in {}",
                path.display()
            ))
        })?;

        rows.push(TableRow { index, value });
    }

    Ok(ResultTable {
        index_columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::from_json_str(
            r#"{
                "REGION": {"type": "set", "dtype": "str"},
                "YEAR": {"type": "set", "dtype": "int"},
                "CapitalCost": {
                    "type": "param",
                    "indices": ["REGION", "YEAR"],
                    "default": 0.001
                }
            }"#,
        )
        .expect("valid catalog json")
    }

    #[test]
    fn test_read_set_and_param_csvs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("YEAR.csv"), "VALUE\n2015\n2016\n").unwrap();
        fs::write(
            dir.path().join("CapitalCost.csv"),
            "REGION,YEAR,VALUE\nSIMPLICITY,2015,1.03456\n",
        )
        .unwrap();

        let dataset = read_input_csv_dir(dir.path(), &catalog()).unwrap();

        assert_eq!(
            dataset.sets["YEAR"].elements,
            vec![IndexValue::Int(2015), IndexValue::Int(2016)]
        );
        let table = &dataset.params["CapitalCost"];
        assert_eq!(table.index_columns, vec!["REGION", "YEAR"]);
        assert_eq!(table.rows[0].value, 1.03456);
    }

    #[test]
    fn test_absent_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = read_input_csv_dir(dir.path(), &catalog()).unwrap();
        assert!(dataset.sets.is_empty());
        assert!(dataset.params.is_empty());
    }

    #[test]
    fn test_missing_value_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("CapitalCost.csv"),
            "REGION,YEAR\nSIMPLICITY,2015\n",
        )
        .unwrap();

        assert!(read_input_csv_dir(dir.path(), &catalog()).is_err());
    }
}
