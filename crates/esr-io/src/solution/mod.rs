//! Solution ingestion: line parsing, long-form assembly, combined-table
//! reading, per-variable wide table building and derived-value resolution.

pub mod assemble;
pub mod combined;
pub mod derive;
pub mod record;
pub mod wide;

pub use assemble::{
    convert_solution_file, filter_observations, render_record, AssemblyOptions, Observation,
    SolutionFormat,
};
pub use combined::{parse_combined_solution, read_combined_solution, CombinedRow};
pub use derive::{DerivationRegistry, DerivationRule, Resolver};
pub use record::{parse_record, SolutionRecord};
pub use wide::{build_result_tables, WideBuild};
