//! Diagnostics collection for conversion runs.
//!
//! Data-quality issues (unparseable value tokens, missing derivations,
//! empty results) are absorbed locally and surfaced here instead of being
//! raised as errors; the CLI prints a summary and can fail the run in
//! strict mode.

use serde::Serialize;

/// Severity level for conversion issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,    // Expected fallback (e.g. no derivation rule registered)
    Warning, // Lossy or degraded behaviour (e.g. coerced value, empty table)
}

/// A single issue encountered during conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConvertIssue {
    pub severity: Severity,
    pub category: String, // "coercion", "derivation", "empty"
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>, // Input line number where applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>, // "AnnualCost", "NewCapacity"
}

/// Statistics about one conversion run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertStats {
    pub records: usize,
    pub observations: usize,
    pub coerced_values: usize,
    pub missing_variables: usize,
}

/// Complete diagnostics for a conversion run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertDiagnostics {
    pub stats: ConvertStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ConvertIssue>,
}

impl ConvertDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an informational issue for a variable
    pub fn add_info(&mut self, category: &str, message: &str, variable: &str) {
        self.issues.push(ConvertIssue {
            severity: Severity::Info,
            category: category.to_string(),
            message: message.to_string(),
            line: None,
            variable: Some(variable.to_string()),
        });
    }

    /// Add a warning issue for a variable
    pub fn add_warning(&mut self, category: &str, message: &str, variable: &str) {
        self.issues.push(ConvertIssue {
            severity: Severity::Warning,
            category: category.to_string(),
            message: message.to_string(),
            line: None,
            variable: Some(variable.to_string()),
        });
    }

    /// Add a warning for a variable, tagged with the input line number
    pub fn add_warning_at_line(
        &mut self,
        category: &str,
        message: &str,
        variable: &str,
        line: usize,
    ) {
        self.issues.push(ConvertIssue {
            severity: Severity::Warning,
            category: category.to_string(),
            message: message.to_string(),
            line: Some(line),
            variable: Some(variable.to_string()),
        });
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Info)
            .count()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Merge another diagnostics into this one (parse + resolve stages)
    pub fn merge(&mut self, other: ConvertDiagnostics) {
        self.issues.extend(other.issues);
        self.stats.records += other.stats.records;
        self.stats.observations += other.stats.observations;
        self.stats.coerced_values += other.stats.coerced_values;
        self.stats.missing_variables += other.stats.missing_variables;
    }
}
