//! Long-form table model shared by the whole conversion pipeline.
//!
//! Tables are derived, immutable after construction, and live only for the
//! duration of one conversion run. A [`ResultTable`] is one variable's
//! observations: typed dimension columns plus a single `VALUE` payload
//! column. A [`SetTable`] is a one-column listing of a set's members.

use std::collections::HashSet;
use std::fmt;

use crate::error::{EsrError, EsrResult};
use crate::schema::ElementType;

/// Canonical name of the payload column.
pub const VALUE_COLUMN: &str = "VALUE";

/// A single typed index cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexValue {
    Int(i64),
    Str(String),
}

impl IndexValue {
    /// Coerce a raw token to the element type declared for its backing set.
    pub fn coerce(token: &str, dtype: ElementType) -> EsrResult<Self> {
        match dtype {
            ElementType::Str => Ok(IndexValue::Str(token.to_string())),
            ElementType::Int => token
                .parse::<i64>()
                .map(IndexValue::Int)
                .map_err(|_| EsrError::Schema(format!("'{token}' is not a valid integer element"))),
            ElementType::Float => Err(EsrError::Schema(
                "float-typed sets cannot be used as index columns".to_string(),
            )),
        }
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexValue::Int(v) => write!(f, "{v}"),
            IndexValue::Str(v) => write!(f, "{v}"),
        }
    }
}

/// One observation row: the dimension tuple and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub index: Vec<IndexValue>,
    pub value: f64,
}

/// Long-form table for one variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    /// Dimension column names, duplicates already disambiguated.
    pub index_columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl ResultTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Column names including the payload column.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = self.index_columns.clone();
        names.push(VALUE_COLUMN.to_string());
        names
    }
}

/// One-column listing of a set's members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetTable {
    pub elements: Vec<IndexValue>,
}

impl SetTable {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Disambiguate a repeated dimension name by prefixing an underscore.
///
/// A variable may legitimately declare the same set twice (two region axes,
/// say); a row index needs unique labels, so the second occurrence is
/// renamed `_NAME`. Schemas where a name repeats more than once, or where
/// two different names each repeat, are rejected outright rather than
/// silently mis-renamed.
pub fn rename_duplicate_columns(columns: &[String]) -> EsrResult<Vec<String>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicate: Option<usize> = None;

    for (position, name) in columns.iter().enumerate() {
        if !seen.insert(name.as_str()) {
            if duplicate.is_some() {
                return Err(EsrError::Schema(format!(
                    "more than one repeated dimension name in {columns:?}"
                )));
            }
            duplicate = Some(position);
        }
    }

    let mut renamed = columns.to_vec();
    if let Some(position) = duplicate {
        renamed[position] = format!("_{}", renamed[position]);
    }
    Ok(renamed)
}

/// Render a value for textual output.
///
/// Values are rounded to ten significant digits and printed in their
/// shortest round-trip form, keeping a trailing `.0` on integral values so
/// `1.0` stays `1.0` while `137958.8400384134` collapses to `137958.84`.
pub fn format_value(value: f64) -> String {
    let rounded = round_significant(value, 10);
    if rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{rounded:.1}")
    } else {
        format!("{rounded}")
    }
}

fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits - 1 - magnitude);
    let scaled = value * factor;
    // At the extremes of the exponent range the scale factor (or the
    // scaled value) leaves f64 range; the value is already as short as
    // it is going to get, so pass it through unrounded.
    if !factor.is_finite() || factor == 0.0 || !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
