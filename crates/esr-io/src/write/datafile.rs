//! GMPL datafile output.
//!
//! Single text file of `set NAME :=` and `param default <d> : NAME :=`
//! blocks. Rows equal to a parameter's default are elided — lossy by
//! design, since defaults are reconstructable from the schema catalog
//! rather than from this file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use esr_core::{format_value, ResultTable, SetTable};

use crate::write::WriteStrategy;

/// Writes a default-eliding GMPL model datafile.
pub struct DatafileWriter {
    path: PathBuf,
}

impl DatafileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WriteStrategy for DatafileWriter {
    type Handle = BufWriter<File>;

    fn open(&self) -> Result<Self::Handle> {
        let file = File::create(&self.path)
            .with_context(|| format!("creating datafile {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(b"# Model file written by *esr*\n")?;
        Ok(writer)
    }

    fn write_set(&self, name: &str, table: &SetTable, handle: &mut Self::Handle) -> Result<()> {
        writeln!(handle, "set {name} :=")?;
        for element in &table.elements {
            writeln!(handle, "{element}")?;
        }
        writeln!(handle, ";")?;
        Ok(())
    }

    fn write_parameter(
        &self,
        name: &str,
        table: &ResultTable,
        handle: &mut Self::Handle,
        default: f64,
    ) -> Result<()> {
        writeln!(handle, "param default {default} : {name} :=")?;
        for row in &table.rows {
            if row.value == default {
                continue;
            }
            for value in &row.index {
                write!(handle, "{value} ")?;
            }
            writeln!(handle, "{}", format_value(row.value))?;
        }
        writeln!(handle, ";")?;
        Ok(())
    }

    fn close(&self, mut handle: Self::Handle) -> Result<()> {
        handle.write_all(b"end;\n")?;
        handle.flush()?;
        Ok(())
    }
}
