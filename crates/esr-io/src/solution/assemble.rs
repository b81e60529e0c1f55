//! Long-form assembly of parsed records.
//!
//! For each value token at position `i` the year is `start_year + i`. An
//! observation is emitted only when the year is inside the caller's bounds
//! and the token is not one of the canonical absent tokens (`""`, `"0"`,
//! `"0.0"`). The two renderers consume identical filtered observations and
//! differ only in textual layout, so row counts always agree across
//! formats.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use esr_core::{format_value, EsrError, SchemaCatalog};

use crate::diagnostics::ConvertDiagnostics;
use crate::solution::record::{parse_record, SolutionRecord};

/// Textual layout for assembled observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolutionFormat {
    /// Solver-native compact format: `0 Var(dims,year) value 0`
    #[default]
    Cbc,
    /// Comma-separated rows with the joined dimensions quoted
    Csv,
}

/// Year bounds and layout for one assembly run.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyOptions {
    /// Year of the first value in every record's sequence
    pub start_year: i32,
    /// Last year to emit, inclusive
    pub end_year: i32,
    pub format: SolutionFormat,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            start_year: 2015,
            end_year: 2070,
            format: SolutionFormat::Cbc,
        }
    }
}

/// One filtered observation: the year slot and its coerced value.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub year: i32,
    pub value: f64,
}

/// Tokens the solver uses for "no value at this year slot".
fn is_absent_token(token: &str) -> bool {
    matches!(token, "" | "0" | "0.0")
}

/// Apply year bounds and zero elision to one record's value sequence.
///
/// Numeric coercion failures substitute `0.0` and are reported through
/// `diagnostics` with the record's 1-based input line number — documented
/// lossy behaviour, not an error.
pub fn filter_observations(
    record: &SolutionRecord,
    options: &AssemblyOptions,
    line: usize,
    diagnostics: &mut ConvertDiagnostics,
) -> Vec<Observation> {
    let mut observations = Vec::new();

    for (offset, token) in record.values.iter().enumerate() {
        let year = options.start_year + offset as i32;
        if year > options.end_year || is_absent_token(token.trim()) {
            continue;
        }

        let value = match token.trim().parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    variable = %record.variable,
                    token = %token,
                    "unparseable value token, substituting 0.0"
                );
                diagnostics.stats.coerced_values += 1;
                diagnostics.add_warning_at_line(
                    "coercion",
                    &format!("unparseable value '{token}' for {year}, substituted 0.0"),
                    &record.variable,
                    line,
                );
                0.0
            }
        };

        observations.push(Observation { year, value });
    }

    diagnostics.stats.observations += observations.len();
    observations
}

/// Render one record's filtered observations as output lines.
pub fn render_record(
    record: &SolutionRecord,
    options: &AssemblyOptions,
    line: usize,
    diagnostics: &mut ConvertDiagnostics,
) -> Vec<String> {
    let observations = filter_observations(record, options, line, diagnostics);
    let joined_dimensions = record.dimensions.join(",");

    observations
        .iter()
        .map(|obs| match options.format {
            SolutionFormat::Cbc => format!(
                "0 {}({},{}) {} 0\n",
                record.variable,
                joined_dimensions,
                obs.year,
                format_value(obs.value)
            ),
            SolutionFormat::Csv => format!(
                "{},\"{},{}\",{}\n",
                record.variable,
                joined_dimensions,
                obs.year,
                format_value(obs.value)
            ),
        })
        .collect()
}

/// Convert a whole solver output file line by line.
///
/// Any malformed line aborts the run; the error carries the offending
/// 1-based line number. Silent partial conversion is considered worse than
/// a hard stop.
pub fn convert_solution_file(
    input: &Path,
    output: &Path,
    catalog: &SchemaCatalog,
    options: &AssemblyOptions,
) -> Result<ConvertDiagnostics> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("opening solution file {}", input.display()))?,
    );
    let mut writer = BufWriter::new(
        File::create(output).with_context(|| format!("creating output {}", output.display()))?,
    );

    let mut diagnostics = ConvertDiagnostics::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading solution line {}", number + 1))?;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_record(&line, catalog).map_err(|err| match err {
            EsrError::SchemaLookup { name } => EsrError::Parse {
                line: number + 1,
                message: format!("unknown variable '{name}'"),
            },
            other => EsrError::Parse {
                line: number + 1,
                message: other.to_string(),
            },
        })?;

        diagnostics.stats.records += 1;
        for rendered in render_record(&record, options, number + 1, &mut diagnostics) {
            writer.write_all(rendered.as_bytes())?;
        }
    }

    writer.flush()?;
    debug!(
        records = diagnostics.stats.records,
        observations = diagnostics.stats.observations,
        "solution file converted"
    );
    Ok(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esr_core::SchemaCatalog;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::from_json_str(
            r#"{
                "REGION": {"type": "set", "dtype": "str"},
                "TECHNOLOGY": {"type": "set", "dtype": "str"},
                "YEAR": {"type": "set", "dtype": "int"},
                "AnnualCost": {
                    "type": "result",
                    "indices": ["REGION", "TECHNOLOGY", "YEAR"]
                }
            }"#,
        )
        .expect("valid catalog json")
    }

    fn annual_cost_record() -> SolutionRecord {
        parse_record(
            "AnnualCost\tREGION\tCDBACKSTOP\t1.0\t0.0\t137958.8400384134",
            &catalog(),
        )
        .unwrap()
    }

    fn options(format: SolutionFormat) -> AssemblyOptions {
        AssemblyOptions {
            start_year: 2015,
            end_year: 2070,
            format,
        }
    }

    #[test]
    fn test_cbc_rendering_matches_solver_native_layout() {
        let mut diagnostics = ConvertDiagnostics::new();
        let lines = render_record(
            &annual_cost_record(),
            &options(SolutionFormat::Cbc),
            1,
            &mut diagnostics,
        );

        assert_eq!(
            lines,
            vec![
                "0 AnnualCost(REGION,CDBACKSTOP,2015) 1.0 0\n".to_string(),
                "0 AnnualCost(REGION,CDBACKSTOP,2017) 137958.84 0\n".to_string(),
            ]
        );
    }

    #[test]
    fn test_csv_rendering_quotes_joined_dimensions() {
        let mut diagnostics = ConvertDiagnostics::new();
        let lines = render_record(
            &annual_cost_record(),
            &options(SolutionFormat::Csv),
            1,
            &mut diagnostics,
        );

        assert_eq!(
            lines,
            vec![
                "AnnualCost,\"REGION,CDBACKSTOP,2015\",1.0\n".to_string(),
                "AnnualCost,\"REGION,CDBACKSTOP,2017\",137958.84\n".to_string(),
            ]
        );
    }

    #[test]
    fn test_renderers_agree_on_row_counts() {
        let record = annual_cost_record();
        let mut first = ConvertDiagnostics::new();
        let mut second = ConvertDiagnostics::new();

        let cbc = render_record(&record, &options(SolutionFormat::Cbc), 1, &mut first);
        let csv = render_record(&record, &options(SolutionFormat::Csv), 1, &mut second);
        assert_eq!(cbc.len(), csv.len());
    }

    #[test]
    fn test_elision_of_absent_tokens() {
        let record = SolutionRecord {
            variable: "AnnualCost".into(),
            dimensions: vec!["REGION".into(), "GAS".into()],
            values: vec!["".into(), "0".into(), "0.0".into(), "5.5".into()],
        };
        let mut diagnostics = ConvertDiagnostics::new();
        let observations =
            filter_observations(&record, &options(SolutionFormat::Cbc), 1, &mut diagnostics);

        assert_eq!(
            observations,
            vec![Observation {
                year: 2018,
                value: 5.5
            }]
        );
    }

    #[test]
    fn test_end_year_inclusive_boundary() {
        let record = SolutionRecord {
            variable: "AnnualCost".into(),
            dimensions: vec!["REGION".into(), "GAS".into()],
            values: vec!["1.0".into(), "2.0".into(), "3.0".into()],
        };
        let bounded = AssemblyOptions {
            start_year: 2015,
            end_year: 2016,
            format: SolutionFormat::Cbc,
        };
        let mut diagnostics = ConvertDiagnostics::new();
        let observations = filter_observations(&record, &bounded, 1, &mut diagnostics);

        let years: Vec<_> = observations.iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2015, 2016]);
    }

    #[test]
    fn test_year_offset_tracks_value_position() {
        let mut diagnostics = ConvertDiagnostics::new();
        let observations = filter_observations(
            &annual_cost_record(),
            &options(SolutionFormat::Cbc),
            1,
            &mut diagnostics,
        );
        for (observation, expected_year) in observations.iter().zip([2015, 2017]) {
            assert_eq!(observation.year, expected_year);
        }
    }

    #[test]
    fn test_malformed_value_substitutes_zero() {
        let record = SolutionRecord {
            variable: "AnnualCost".into(),
            dimensions: vec!["REGION".into(), "GAS".into()],
            values: vec!["not-a-number".into()],
        };
        let mut diagnostics = ConvertDiagnostics::new();
        let observations =
            filter_observations(&record, &options(SolutionFormat::Cbc), 3, &mut diagnostics);

        assert_eq!(observations[0].value, 0.0);
        assert_eq!(diagnostics.stats.coerced_values, 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.issues[0].line, Some(3));
    }

    #[test]
    fn test_file_conversion_reports_offending_line() {
        use std::io::Write as _;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("solution.txt");
        let output = dir.path().join("out.txt");
        let mut file = File::create(&input).unwrap();
        writeln!(file, "AnnualCost\tREGION\tGAS\t1.0").unwrap();
        writeln!(file, "Mystery\tREGION\t2.0").unwrap();

        let err = convert_solution_file(&input, &output, &catalog(), &AssemblyOptions::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn test_coercion_warning_carries_input_line_number() {
        use std::io::Write as _;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("solution.txt");
        let output = dir.path().join("out.txt");
        let mut file = File::create(&input).unwrap();
        writeln!(file, "AnnualCost\tREGION\tGAS\t1.0").unwrap();
        writeln!(file, "AnnualCost\tREGION\tCOAL\tbogus").unwrap();

        let diagnostics =
            convert_solution_file(&input, &output, &catalog(), &AssemblyOptions::default())
                .unwrap();

        assert_eq!(diagnostics.stats.coerced_values, 1);
        assert_eq!(diagnostics.issues[0].line, Some(2));
        assert_eq!(diagnostics.issues[0].variable.as_deref(), Some("AnnualCost"));
    }

    #[test]
    fn test_file_conversion_concrete_scenario() {
        use std::io::Write as _;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("solution.txt");
        let output = dir.path().join("out.txt");
        let mut file = File::create(&input).unwrap();
        writeln!(file, "AnnualCost\tREGION\tCDBACKSTOP\t1.0\t0.0\t137958.8400384134").unwrap();

        convert_solution_file(&input, &output, &catalog(), &AssemblyOptions::default()).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "0 AnnualCost(REGION,CDBACKSTOP,2015) 1.0 0\n\
             0 AnnualCost(REGION,CDBACKSTOP,2017) 137958.84 0\n"
        );
    }
}
