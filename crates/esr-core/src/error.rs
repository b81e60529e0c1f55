//! Unified error types for the esr ecosystem
//!
//! This module provides a common error type [`EsrError`] shared by the
//! solution-conversion pipeline. Structural problems (unknown variables,
//! malformed lines, bad schemas) are represented here and are fatal;
//! data-quality issues are reported through diagnostics instead and never
//! surface as errors.

use thiserror::Error;

/// Unified error type for all esr operations.
#[derive(Error, Debug)]
pub enum EsrError {
    /// I/O errors (file access, directory creation, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A variable or set name that the schema catalog does not declare
    #[error("unknown name in schema catalog: '{name}'")]
    SchemaLookup { name: String },

    /// Malformed solution input, tagged with the offending line number
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Invalid schema configuration (bad dtype, unrenamable duplicates, etc.)
    #[error("schema error: {0}")]
    Schema(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using EsrError.
pub type EsrResult<T> = Result<T, EsrError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for EsrError {
    fn from(err: anyhow::Error) -> Self {
        EsrError::Other(err.to_string())
    }
}

// JSON parsing errors (schema catalog loading)
impl From<serde_json::Error> for EsrError {
    fn from(err: serde_json::Error) -> Self {
        EsrError::Schema(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EsrError::SchemaLookup {
            name: "AnnualCost".into(),
        };
        assert!(err.to_string().contains("AnnualCost"));
        assert!(err.to_string().contains("schema catalog"));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = EsrError::Parse {
            line: 42,
            message: "too few tokens".into(),
        };
        assert!(err.to_string().contains("line 42"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let esr_err: EsrError = io_err.into();
        assert!(matches!(esr_err, EsrError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> EsrResult<()> {
            Err(EsrError::Schema("test".into()))
        }

        fn outer() -> EsrResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
