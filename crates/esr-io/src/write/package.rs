//! Package-resource output: a data directory plus a manifest describing
//! every emitted table.
//!
//! Each table is written as a narrow CSV under `data/` and registered as a
//! (name, title, path) resource. Closing the sink re-emits the default
//! values as their own resource and serializes the accumulated manifest to
//! `datapackage.json`, so a consumer can reconstruct the full dataset
//! without the schema in hand.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use esr_core::{ResultTable, SchemaCatalog, SetTable};

use crate::write::{write_default_values_csv, write_set_csv, write_table_csv, WriteStrategy};

/// Manifest profile identifier written into every package.
pub const PACKAGE_PROFILE: &str = "tabular-data-package";

/// One entry in the package manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageResource {
    /// Lowercased resource identifier
    pub name: String,
    /// Original entry name
    pub title: String,
    /// Path of the backing file, relative to the package root
    pub path: String,
}

/// Accumulated manifest, serialized once at close.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub profile: String,
    pub resources: Vec<PackageResource>,
}

impl PackageManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: PACKAGE_PROFILE.to_string(),
            resources: Vec::new(),
        }
    }

    pub fn add_resource(&mut self, title: &str) {
        self.resources.push(PackageResource {
            name: title.to_lowercase(),
            title: title.to_string(),
            path: format!("data/{title}.csv"),
        });
    }
}

/// Writes a manifest-described resource bundle.
pub struct PackageWriter {
    path: PathBuf,
    catalog: SchemaCatalog,
}

impl PackageWriter {
    pub fn new(path: impl Into<PathBuf>, catalog: SchemaCatalog) -> Self {
        Self {
            path: path.into(),
            catalog,
        }
    }

    fn data_file(&self, name: &str) -> PathBuf {
        self.path.join("data").join(format!("{name}.csv"))
    }
}

impl WriteStrategy for PackageWriter {
    type Handle = PackageManifest;

    fn open(&self) -> Result<Self::Handle> {
        fs::create_dir_all(self.path.join("data"))
            .with_context(|| format!("creating package directory {}", self.path.display()))?;

        let package_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("results")
            .to_lowercase();
        Ok(PackageManifest::new(package_name))
    }

    fn write_set(&self, name: &str, table: &SetTable, handle: &mut Self::Handle) -> Result<()> {
        write_set_csv(&self.data_file(name), table)?;
        handle.add_resource(name);
        Ok(())
    }

    fn write_parameter(
        &self,
        name: &str,
        table: &ResultTable,
        handle: &mut Self::Handle,
        _default: f64,
    ) -> Result<()> {
        info!(parameter = name, rows = table.len(), "writing narrow file");
        write_table_csv(&self.data_file(name), table)?;
        handle.add_resource(name);
        Ok(())
    }

    fn close(&self, mut handle: Self::Handle) -> Result<()> {
        write_default_values_csv(&self.data_file("default_values"), &self.catalog)?;
        handle.add_resource("default_values");

        let manifest_path = self.path.join("datapackage.json");
        let json = serde_json::to_string_pretty(&handle)?;
        fs::write(&manifest_path, json)
            .with_context(|| format!("writing manifest {}", manifest_path.display()))?;
        Ok(())
    }
}
