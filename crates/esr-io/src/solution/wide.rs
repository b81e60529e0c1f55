//! Wide table building: split the combined results table into one typed
//! table per result variable.
//!
//! Each composite index string is split into the variable's declared
//! dimension columns, every column is coerced to its backing set's element
//! type, and repeated dimension names are disambiguated before the columns
//! become the table's row index. Variables with no solver rows are
//! collected for the derived-value resolver rather than failing the run.

use anyhow::Result;
use indexmap::IndexMap;
use tracing::debug;

use esr_core::{
    rename_duplicate_columns, EsrError, IndexValue, ResultTable, SchemaCatalog, TableRow,
};

use crate::solution::combined::CombinedRow;

/// Result of splitting the combined table.
#[derive(Debug, Default)]
pub struct WideBuild {
    /// Per-variable long-form tables, in catalog declaration order
    pub tables: IndexMap<String, ResultTable>,
    /// Result variables with no solver rows at all
    pub not_found: Vec<String>,
}

/// Split the combined (variable, index, value) rows into per-variable
/// tables for every result entry the catalog declares.
pub fn build_result_tables(rows: &[CombinedRow], catalog: &SchemaCatalog) -> Result<WideBuild> {
    let mut build = WideBuild::default();

    for name in catalog.result_names() {
        let selected: Vec<&CombinedRow> = rows.iter().filter(|row| row.variable == name).collect();

        if selected.is_empty() {
            build.not_found.push(name.to_string());
            continue;
        }

        debug!(variable = name, rows = selected.len(), "extracting results");
        let table = assemble_table(name, &selected, catalog)?;
        build.tables.insert(name.to_string(), table);
    }

    if !build.not_found.is_empty() {
        debug!(
            variables = %build.not_found.join(", "),
            "no solver rows found for some variables"
        );
    }

    Ok(build)
}

fn assemble_table(
    name: &str,
    rows: &[&CombinedRow],
    catalog: &SchemaCatalog,
) -> Result<ResultTable> {
    let indices = catalog.indices(name)?;

    let mut table_rows = Vec::with_capacity(rows.len());
    for row in rows {
        let tokens: Vec<&str> = row.index.split(',').collect();
        if tokens.len() != indices.len() {
            return Err(EsrError::Schema(format!(
                "index '{}' for '{name}' has {} components, schema declares {}",
                row.index,
                tokens.len(),
                indices.len()
            ))
            .into());
        }

        let mut index = Vec::with_capacity(tokens.len());
        for (token, set_name) in tokens.iter().zip(indices) {
            let dtype = catalog.element_type(set_name)?;
            index.push(IndexValue::coerce(token, dtype)?);
        }

        table_rows.push(TableRow {
            index,
            value: row.value,
        });
    }

    // Rename applies to the index column list after coercion so dtype
    // lookups always use the original set names.
    let index_columns = rename_duplicate_columns(indices)?;

    Ok(ResultTable {
        index_columns,
        rows: table_rows,
    })
}
