//! Raw solution line parsing.
//!
//! One solver output line carries a variable name, that variable's
//! dimension tuple, and a fixed-stride sequence of per-year values:
//!
//! ```text
//! AnnualCost	REGION	CDBACKSTOP	1.0	0.0	137958.8400384134
//! ```
//!
//! The schema catalog decides how many of the leading tokens are
//! dimensions; everything after them is the value sequence. No filtering
//! happens here — year bounds and zero elision are the assembler's job.

use esr_core::{EsrError, EsrResult, SchemaCatalog};

/// One parsed solver record: variable, dimension tuple, raw value tokens.
///
/// Value tokens are kept as strings so the assembler can apply the
/// canonical absent-token test (`""`, `"0"`, `"0.0"`) before any numeric
/// coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionRecord {
    pub variable: String,
    pub dimensions: Vec<String>,
    pub values: Vec<String>,
}

/// Parse one raw solver line into a [`SolutionRecord`].
///
/// Fails with [`EsrError::SchemaLookup`] when the variable is not declared
/// in the catalog, and with a parse error when the line is too short to
/// carry the declared dimension count.
pub fn parse_record(line: &str, catalog: &SchemaCatalog) -> EsrResult<SolutionRecord> {
    let mut tokens = line.split_whitespace();

    let variable = tokens
        .next()
        .ok_or_else(|| EsrError::Schema("empty solution record".to_string()))?
        .to_string();

    let dimension_count = catalog.record_dimension_count(&variable)?;
    let rest: Vec<&str> = tokens.collect();

    if rest.len() < dimension_count {
        return Err(EsrError::Schema(format!(
            "record for '{variable}' has {} tokens but {dimension_count} dimensions are declared",
            rest.len()
        )));
    }

    let dimensions = rest[..dimension_count]
        .iter()
        .map(|t| t.to_string())
        .collect();
    let values = rest[dimension_count..]
        .iter()
        .map(|t| t.to_string())
        .collect();

    Ok(SolutionRecord {
        variable,
        dimensions,
        values,
    })
}
