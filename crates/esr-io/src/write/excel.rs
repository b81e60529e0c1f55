//! Spreadsheet output: one worksheet per entry.
//!
//! Parameter tables with more than three total columns are pivoted into
//! wide form before writing: the last dimension becomes the column axis
//! and the value column fills the cells. Tables with three or fewer
//! columns stay long, where a pivot would be degenerate.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use tracing::{debug, info};

use esr_core::{IndexValue, ResultTable, SetTable};

use crate::write::WriteStrategy;

/// Excel's hard limit on worksheet name length.
const MAX_SHEET_NAME: usize = 31;

/// A pivoted table: row index columns, one column per distinct label of
/// the pivot axis, and optional cell values.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub row_columns: Vec<String>,
    pub column_axis: String,
    pub column_labels: Vec<IndexValue>,
    pub rows: Vec<(Vec<IndexValue>, Vec<Option<f64>>)>,
}

/// Pivot a long-form table per the wide-form rule.
///
/// Rows are indexed by all but the last dimension, columns are the last
/// dimension's distinct values in sorted order, cells are the values.
/// Row order is sorted by the remaining index, matching the deterministic
/// ordering the long form guarantees.
pub fn pivot_wide(table: &ResultTable) -> PivotTable {
    let split = table.index_columns.len() - 1;
    let row_columns = table.index_columns[..split].to_vec();
    let column_axis = table.index_columns[split].clone();

    let labels: BTreeSet<IndexValue> = table
        .rows
        .iter()
        .map(|row| row.index[split].clone())
        .collect();
    let column_labels: Vec<IndexValue> = labels.into_iter().collect();

    let mut keys: Vec<Vec<IndexValue>> = table
        .rows
        .iter()
        .map(|row| row.index[..split].to_vec())
        .collect();
    keys.sort();
    keys.dedup();

    let mut rows = Vec::with_capacity(keys.len());
    for key in keys {
        let mut cells: Vec<Option<f64>> = vec![None; column_labels.len()];
        for row in &table.rows {
            if row.index[..split] == key[..] {
                let position = column_labels
                    .iter()
                    .position(|label| *label == row.index[split]);
                if let Some(position) = position {
                    cells[position] = Some(row.value);
                }
            }
        }
        rows.push((key, cells));
    }

    PivotTable {
        row_columns,
        column_axis,
        column_labels,
        rows,
    }
}

/// Shorten an entry name to a legal worksheet name.
///
/// Truncation backs up to a character boundary so multi-byte names do
/// not get cut mid-character.
pub fn sheet_name(name: &str) -> &str {
    if name.len() <= MAX_SHEET_NAME {
        return name;
    }
    let mut end = MAX_SHEET_NAME;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Writes a single workbook with one sheet per set and parameter.
pub struct ExcelWriter {
    path: PathBuf,
}

impl ExcelWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &IndexValue) -> Result<()> {
    match value {
        IndexValue::Int(v) => sheet.write_number(row, col, *v as f64)?,
        IndexValue::Str(v) => sheet.write_string(row, col, v)?,
    };
    Ok(())
}

fn write_long_form(sheet: &mut Worksheet, table: &ResultTable) -> Result<()> {
    for (col, name) in table.column_names().iter().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }
    for (position, row) in table.rows.iter().enumerate() {
        let excel_row = position as u32 + 1;
        for (col, value) in row.index.iter().enumerate() {
            write_cell(sheet, excel_row, col as u16, value)?;
        }
        sheet.write_number(excel_row, row.index.len() as u16, row.value)?;
    }
    Ok(())
}

fn write_wide_form(sheet: &mut Worksheet, pivot: &PivotTable) -> Result<()> {
    let mut col = 0u16;
    for name in &pivot.row_columns {
        sheet.write_string(0, col, name)?;
        col += 1;
    }
    for label in &pivot.column_labels {
        write_cell(sheet, 0, col, label)?;
        col += 1;
    }

    for (position, (key, cells)) in pivot.rows.iter().enumerate() {
        let excel_row = position as u32 + 1;
        let mut col = 0u16;
        for value in key {
            write_cell(sheet, excel_row, col, value)?;
            col += 1;
        }
        for cell in cells {
            if let Some(value) = cell {
                sheet.write_number(excel_row, col, *value)?;
            }
            col += 1;
        }
    }
    Ok(())
}

impl WriteStrategy for ExcelWriter {
    type Handle = Workbook;

    fn open(&self) -> Result<Self::Handle> {
        Ok(Workbook::new())
    }

    fn write_set(&self, name: &str, table: &SetTable, handle: &mut Self::Handle) -> Result<()> {
        let sheet = handle.add_worksheet();
        sheet.set_name(sheet_name(name))?;
        sheet.write_string(0, 0, "VALUE")?;
        for (position, element) in table.elements.iter().enumerate() {
            write_cell(sheet, position as u32 + 1, 0, element)?;
        }
        Ok(())
    }

    fn write_parameter(
        &self,
        name: &str,
        table: &ResultTable,
        handle: &mut Self::Handle,
        _default: f64,
    ) -> Result<()> {
        if table.is_empty() {
            info!(parameter = name, "skipped writing empty table");
            return Ok(());
        }

        let sheet = handle.add_worksheet();
        sheet.set_name(sheet_name(name))?;

        let total_columns = table.index_columns.len() + 1;
        if total_columns > 3 {
            debug!(parameter = name, columns = total_columns, "pivoting to wide form");
            write_wide_form(sheet, &pivot_wide(table))?;
        } else {
            write_long_form(sheet, table)?;
        }
        Ok(())
    }

    fn close(&self, handle: Self::Handle) -> Result<()> {
        let mut workbook = handle;
        workbook
            .save(&self.path)
            .with_context(|| format!("saving workbook {}", self.path.display()))?;
        Ok(())
    }
}
