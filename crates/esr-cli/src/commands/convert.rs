use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use esr_core::SchemaCatalog;
use esr_io::solution::{convert_solution_file, AssemblyOptions, SolutionFormat};

pub fn handle(
    input: &Path,
    output: &Path,
    config: &Path,
    start_year: i32,
    end_year: i32,
    csv: bool,
) -> Result<()> {
    let catalog = SchemaCatalog::from_json_file(config)
        .with_context(|| format!("loading schema catalog {}", config.display()))?;

    let options = AssemblyOptions {
        start_year,
        end_year,
        format: if csv {
            SolutionFormat::Csv
        } else {
            SolutionFormat::Cbc
        },
    };

    let diagnostics = convert_solution_file(input, output, &catalog, &options)?;

    if diagnostics.warning_count() > 0 {
        eprintln!(
            "⚠️  {} value(s) could not be parsed and were substituted with 0.0",
            diagnostics.stats.coerced_values
        );
    }
    info!(
        records = diagnostics.stats.records,
        observations = diagnostics.stats.observations,
        "conversion finished"
    );
    println!("✓ Converted {} to {}", input.display(), output.display());
    Ok(())
}
