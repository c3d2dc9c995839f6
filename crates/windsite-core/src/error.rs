//! Unified error types for the windsite workspace
//!
//! [`SiteError`] represents every failure the field model, the interference
//! evaluator and the layout optimizer can raise. Solver *statuses*
//! (infeasible, time limit) are not errors; they are reported through
//! `windsite_algo::layout::LayoutOutcome`.
//!
//! # Example
//!
//! ```ignore
//! use windsite_core::{SiteError, SiteResult};
//!
//! fn run(path: &Path) -> SiteResult<()> {
//!     let site = load_site_from_path(path)?.resolve()?;
//!     let field = model.field(&site.grid, &site.candidates, &site.regime)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all windsite operations.
#[derive(Error, Debug)]
pub enum SiteError {
    /// I/O errors (site files, field exports)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors, including non-finite interference coefficients
    #[error("Validation error: {0}")]
    Validation(String),

    /// Two arrays that must share a shape do not
    #[error("Dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Inputs violate a model precondition (empty candidate list, D <= 0, ...)
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// The MIP backend failed before producing a status
    #[error("Solver error: {0}")]
    Solver(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using SiteError.
pub type SiteResult<T> = Result<T, SiteError>;

impl From<String> for SiteError {
    fn from(s: String) -> Self {
        SiteError::Other(s)
    }
}

impl From<&str> for SiteError {
    fn from(s: &str) -> Self {
        SiteError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        SiteError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for SiteError {
    fn from(err: toml::de::Error) -> Self {
        SiteError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SiteError::Validation("w[3] is NaN".into());
        assert!(err.to_string().contains("Validation error"));
        assert!(err.to_string().contains("w[3] is NaN"));
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = SiteError::DimensionMismatch {
            expected: (10, 20),
            found: (10, 21),
        };
        assert_eq!(
            err.to_string(),
            "Dimension mismatch: expected (10, 20), found (10, 21)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SiteError = io_err.into();
        assert!(matches!(err, SiteError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parsed: Result<toml::Value, _> = toml::from_str("turbines = ");
        let err: SiteError = parsed.unwrap_err().into();
        assert!(matches!(err, SiteError::Parse(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> SiteResult<()> {
            Err(SiteError::Precondition("empty candidate list".into()))
        }

        fn outer() -> SiteResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
