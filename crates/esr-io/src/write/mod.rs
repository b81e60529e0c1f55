//! Output write strategies.
//!
//! Every physical format follows the same four-stage lifecycle: open the
//! sink, write each set table, write each parameter table, close. The
//! ordering contract (single open, sets before parameters, single close)
//! is enforced by [`write_results`], not by the individual variants; a
//! variant only decides what one table looks like in its format.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;

use esr_core::{format_value, EntryKind, ResultTable, SchemaCatalog, SetTable};

pub mod csv_dir;
pub mod datafile;
pub mod excel;
pub mod package;

pub use csv_dir::CsvDirWriter;
pub use datafile::DatafileWriter;
pub use excel::ExcelWriter;
pub use package::PackageWriter;

/// Four-stage output lifecycle shared by every format.
pub trait WriteStrategy {
    /// Sink handle threaded through the write calls.
    type Handle;

    fn open(&self) -> Result<Self::Handle>;

    fn write_set(&self, name: &str, table: &SetTable, handle: &mut Self::Handle) -> Result<()>;

    fn write_parameter(
        &self,
        name: &str,
        table: &ResultTable,
        handle: &mut Self::Handle,
        default: f64,
    ) -> Result<()>;

    fn close(&self, handle: Self::Handle) -> Result<()>;
}

/// Drive one full write: open once, all sets, all parameters, close once.
///
/// Tables are emitted in catalog declaration order, which keeps every
/// format's output deterministic for the same inputs.
pub fn write_results<S: WriteStrategy>(
    strategy: &S,
    catalog: &SchemaCatalog,
    sets: &IndexMap<String, SetTable>,
    params: &IndexMap<String, ResultTable>,
) -> Result<()> {
    let mut handle = strategy.open()?;

    for (name, entry) in catalog.iter() {
        if entry.kind == EntryKind::Set {
            if let Some(table) = sets.get(name) {
                strategy.write_set(name, table, &mut handle)?;
            }
        }
    }

    for (name, entry) in catalog.iter() {
        if entry.kind != EntryKind::Set {
            if let Some(table) = params.get(name) {
                strategy.write_parameter(name, table, &mut handle, entry.default)?;
            }
        }
    }

    strategy.close(handle)
}

/// Supported physical output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    /// Directory of narrow per-entry CSV files
    CsvDir,
    /// Single default-eliding GMPL datafile
    Datafile,
    /// Single spreadsheet workbook, one sheet per entry
    Excel,
    /// Resource bundle: data directory plus a datapackage manifest
    Package,
}

/// Select a concrete strategy once and run the full lifecycle with it.
pub fn emit(
    target: OutputTarget,
    path: &Path,
    catalog: &SchemaCatalog,
    sets: &IndexMap<String, SetTable>,
    params: &IndexMap<String, ResultTable>,
) -> Result<()> {
    match target {
        OutputTarget::CsvDir => write_results(
            &CsvDirWriter::new(path, catalog.clone()),
            catalog,
            sets,
            params,
        ),
        OutputTarget::Datafile => {
            write_results(&DatafileWriter::new(path), catalog, sets, params)
        }
        OutputTarget::Excel => write_results(&ExcelWriter::new(path), catalog, sets, params),
        OutputTarget::Package => write_results(
            &PackageWriter::new(path, catalog.clone()),
            catalog,
            sets,
            params,
        ),
    }
}

/// Write a set listing as a one-column CSV file.
pub(crate) fn write_set_csv(path: &PathBuf, table: &SetTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating set csv {}", path.display()))?;
    writer.write_record(["VALUE"])?;
    for element in &table.elements {
        writer.write_record([element.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a long-form table as a narrow CSV file, index columns included.
pub(crate) fn write_table_csv(path: &PathBuf, table: &ResultTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating table csv {}", path.display()))?;
    writer.write_record(table.column_names())?;
    for row in &table.rows {
        let mut record: Vec<String> = row.index.iter().map(|v| v.to_string()).collect();
        record.push(format_value(row.value));
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the reconstructed default-values side table.
pub(crate) fn write_default_values_csv(path: &PathBuf, catalog: &SchemaCatalog) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(b"name,default_value\n")?;
    for (name, default) in catalog.default_values() {
        writeln!(file, "{name},{default}")?;
    }
    Ok(())
}
