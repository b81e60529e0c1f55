use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use esr_core::SchemaCatalog;
use esr_io::dataset::{read_input_csv_dir, InputDataset};
use esr_io::solution::{build_result_tables, read_combined_solution, DerivationRegistry, Resolver};
use esr_io::write::emit;

use crate::cli::ResultsFormat;

pub fn handle(
    input: &Path,
    output: &Path,
    config: &Path,
    format: ResultsFormat,
    input_data: Option<&Path>,
    strict: bool,
) -> Result<()> {
    let catalog = SchemaCatalog::from_json_file(config)
        .with_context(|| format!("loading schema catalog {}", config.display()))?;

    let rows = read_combined_solution(input)?;
    let build = build_result_tables(&rows, &catalog)?;

    let dataset = match input_data {
        Some(dir) => read_input_csv_dir(dir, &catalog)
            .with_context(|| format!("reading input dataset {}", dir.display()))?,
        None => InputDataset::default(),
    };

    // Derivation rules are an external collaborator's concern; the resolver
    // still records which variables had no solver rows and no rule.
    let registry = DerivationRegistry::new();
    let mut resolver = Resolver::new(&registry, &dataset.params, build.tables);
    resolver.resolve_missing(&build.not_found);
    let (tables, diagnostics) = resolver.into_parts();

    if diagnostics.has_issues() {
        for issue in &diagnostics.issues {
            match &issue.variable {
                Some(variable) => {
                    eprintln!("⚠️  [{}] {}: {}", issue.category, variable, issue.message)
                }
                None => eprintln!("⚠️  [{}] {}", issue.category, issue.message),
            }
        }
        if strict {
            bail!(
                "strict mode: run produced {} warning(s), {} note(s)",
                diagnostics.warning_count(),
                diagnostics.info_count()
            );
        }
    }

    emit(
        format.to_output_target(),
        output,
        &catalog,
        &dataset.sets,
        &tables,
    )?;

    info!(
        tables = tables.len(),
        missing = diagnostics.stats.missing_variables,
        "results written"
    );
    println!("✓ Wrote results to {}", output.display());
    Ok(())
}
