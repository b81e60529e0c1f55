//! Reader for the solver-native compact solution format.
//!
//! Turns lines of the shape `0 Variable(IDX,IDX,2015) 1.0 0` back into
//! (variable, composite index, value) rows, the combined table the wide
//! table builder consumes. The first line of a solver solution file is a
//! status banner (`Optimal - objective value ...`) and is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use esr_core::EsrError;

/// One row of the combined results table.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    pub variable: String,
    /// Comma-joined rendering of the dimension tuple, year included
    pub index: String,
    pub value: f64,
}

/// Read a compact solution file from disk.
pub fn read_combined_solution(path: &Path) -> Result<Vec<CombinedRow>> {
    let file = File::open(path)
        .with_context(|| format!("opening combined solution {}", path.display()))?;
    parse_combined_solution(BufReader::new(file))
}

/// Parse compact solution rows from any reader, skipping the status line.
pub fn parse_combined_solution(reader: impl Read) -> Result<Vec<CombinedRow>> {
    let mut rows = Vec::new();

    for (number, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.with_context(|| format!("reading combined line {}", number + 1))?;
        if number == 0 || line.trim().is_empty() {
            continue;
        }
        rows.push(parse_combined_line(&line, number + 1)?);
    }

    Ok(rows)
}

fn parse_combined_line(line: &str, number: usize) -> Result<CombinedRow> {
    let malformed = |message: &str| EsrError::Parse {
        line: number,
        message: message.to_string(),
    };

    let mut tokens = line.split_whitespace();
    let _status = tokens.next();
    let name_and_index = tokens
        .next()
        .ok_or_else(|| malformed("missing variable token"))?;
    let value_token = tokens.next().ok_or_else(|| malformed("missing value token"))?;

    let (variable, index) = name_and_index
        .split_once('(')
        .ok_or_else(|| malformed("variable token has no index tuple"))?;
    let index = index.strip_suffix(')').unwrap_or(index);

    let value = value_token
        .parse::<f64>()
        .map_err(|_| malformed(&format!("unparseable value '{value_token}'")))?;

    Ok(CombinedRow {
        variable: variable.to_string(),
        index: index.to_string(),
        value,
    })
}
