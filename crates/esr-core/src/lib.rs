//! # esr-core: schema catalog and table model
//!
//! Core types shared across the esr solution-conversion pipeline:
//!
//! - [`SchemaCatalog`] — read-only mapping from variable name to its ordered
//!   dimension names and from set name to element type. Constructed once and
//!   passed by reference; no ambient schema state.
//! - [`ResultTable`] / [`SetTable`] — the long-form table model every
//!   pipeline stage produces or consumes.
//! - [`EsrError`] — unified error type. Structural and schema mismatches are
//!   fatal; data-quality issues never travel through this type.

pub mod error;
pub mod schema;
pub mod table;

pub use error::{EsrError, EsrResult};
pub use schema::{ElementType, EntryConfig, EntryKind, SchemaCatalog};
pub use table::{
    format_value, rename_duplicate_columns, IndexValue, ResultTable, SetTable, TableRow,
    VALUE_COLUMN,
};
