//! # esr-io: solution ingestion and multi-format emission
//!
//! Takes the raw output of a linear-programming solver run against an
//! energy-system model and re-expresses it downstream:
//!
//! 1. **Parse** — [`solution::parse_record`] turns one raw line into a
//!    (variable, dimension tuple, value sequence) record, validated
//!    against the schema catalog.
//! 2. **Assemble** — [`solution::convert_solution_file`] filters by year
//!    range and zero elision and renders the compact or CSV line format.
//! 3. **Reshape** — [`solution::build_result_tables`] splits the combined
//!    results table into typed per-variable tables, disambiguating
//!    repeated dimension names.
//! 4. **Derive** — [`solution::Resolver`] computes variables the solver
//!    did not emit from other tables and the input dataset, memoized,
//!    degrading to empty tables with diagnostics.
//! 5. **Write** — [`write::write_results`] drives one of four
//!    [`write::WriteStrategy`] variants: narrow CSV directory, GMPL
//!    datafile, spreadsheet workbook, or manifest-described package.
//!
//! Structural problems (unknown variables, malformed lines) abort the run
//! with the offending line number. Data-quality issues (bad numbers,
//! missing derivations, empty results) are absorbed into
//! [`diagnostics::ConvertDiagnostics`] and never thrown.

pub mod dataset;
pub mod diagnostics;
pub mod solution;
pub mod write;

pub use dataset::{read_input_csv_dir, InputDataset};
pub use diagnostics::{ConvertDiagnostics, ConvertIssue, ConvertStats, Severity};
