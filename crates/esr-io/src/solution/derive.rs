//! Derived-value resolution for variables the solver did not emit.
//!
//! A derivation registry maps variable names to rules that compute a table
//! from other (possibly themselves derived) tables and the original input
//! dataset. Resolution degrades gracefully: a missing rule or a failing
//! rule yields an empty table and a diagnostic, never an error — the run
//! must still produce output for every other variable. Each variable's
//! derivation is attempted at most once per run.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{info, warn};

use esr_core::ResultTable;

use crate::diagnostics::ConvertDiagnostics;

/// A derivation rule: computes one variable's table from the resolver's
/// already-resolved tables and input dataset. Rules may recurse through
/// [`Resolver::resolve`].
pub type DerivationRule = Box<dyn Fn(&mut Resolver<'_>) -> anyhow::Result<ResultTable>>;

/// Registry of derivation rules keyed by variable name.
#[derive(Default)]
pub struct DerivationRegistry {
    rules: IndexMap<String, DerivationRule>,
}

impl DerivationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, rule: DerivationRule) {
        self.rules.insert(name.into(), rule);
    }

    pub fn get(&self, name: &str) -> Option<&DerivationRule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }
}

/// Memoizing resolver over a derivation registry.
///
/// Holds the tables extracted from solver output, fills gaps on demand and
/// records every fallback in its diagnostics. Local to one run; discarded
/// afterwards.
pub struct Resolver<'a> {
    registry: &'a DerivationRegistry,
    input_data: &'a IndexMap<String, ResultTable>,
    results: IndexMap<String, ResultTable>,
    attempted: HashSet<String>,
    diagnostics: ConvertDiagnostics,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a DerivationRegistry,
        input_data: &'a IndexMap<String, ResultTable>,
        results: IndexMap<String, ResultTable>,
    ) -> Self {
        Self {
            registry,
            input_data,
            results,
            attempted: HashSet::new(),
            diagnostics: ConvertDiagnostics::new(),
        }
    }

    /// Look up a table from the original input dataset.
    pub fn input(&self, name: &str) -> Option<&ResultTable> {
        self.input_data.get(name)
    }

    /// Resolve a variable: memoized result first, then the derivation
    /// registry, then the empty-table fallback.
    pub fn resolve(&mut self, name: &str) -> ResultTable {
        if let Some(table) = self.results.get(name) {
            return table.clone();
        }

        if !self.attempted.insert(name.to_string()) {
            // Re-entered while already deriving this variable; break the
            // cycle with an empty table rather than recursing forever.
            warn!(variable = name, "cyclic derivation request");
            return ResultTable::empty();
        }

        info!(variable = name, "looking for derivation");
        let registry = self.registry;
        let table = match registry.get(name) {
            None => {
                info!(variable = name, "no calculation method available");
                self.diagnostics.add_info(
                    "derivation",
                    "no calculation method available",
                    name,
                );
                ResultTable::empty()
            }
            Some(rule) => match rule(self) {
                Ok(table) => table,
                Err(err) => {
                    warn!(variable = name, error = %err, "derivation failed");
                    self.diagnostics.add_warning(
                        "derivation",
                        &format!("derivation failed: {err}"),
                        name,
                    );
                    ResultTable::empty()
                }
            },
        };

        if table.is_empty() {
            warn!(variable = name, "calculation returned empty table");
            self.diagnostics
                .add_warning("empty", "calculation returned empty table", name);
        }

        self.results.insert(name.to_string(), table.clone());
        table
    }

    /// Attempt derivation for every variable absent from solver output.
    pub fn resolve_missing(&mut self, not_found: &[String]) {
        self.diagnostics.stats.missing_variables += not_found.len();
        for name in not_found {
            self.resolve(name);
        }
    }

    /// Tear down into the final table map and accumulated diagnostics.
    pub fn into_parts(self) -> (IndexMap<String, ResultTable>, ConvertDiagnostics) {
        (self.results, self.diagnostics)
    }
}
