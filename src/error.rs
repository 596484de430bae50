//! Crate-wide error type.
//!
//! Every public entry point validates its inputs up front and reports the first
//! problem it finds. Numeric trouble that can be detected before iterating
//! (zero-variance predictors, NaNs) is reported as a typed error instead of
//! being allowed to surface later as non-finite coefficients.

use thiserror::Error;

/// Result alias used by all fallible operations in this crate.
pub type FitResult<T> = Result<T, FitError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// A scalar option is outside its admissible range.
    #[error("invalid option `{name}` = {value}: {reason}")]
    InvalidOption {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Two inputs disagree on a dimension.
    #[error("dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// An input has no rows or no columns.
    #[error("{what} is empty")]
    EmptyInput { what: &'static str },

    /// An input contains NaN or infinite entries.
    #[error("{what} contains non-finite values")]
    NonFiniteInput { what: &'static str },

    /// A predictor column has zero (or undefined) sample variance and cannot be
    /// standardized. `column` is the 0-based index in the caller's matrix.
    #[error("degenerate predictor: column {column} has zero or undefined variance")]
    DegeneratePredictor { column: usize },

    /// The interrupt hook fired at a solver checkpoint.
    #[error("fit cancelled at iteration {iteration}")]
    Cancelled { iteration: usize },
}

impl FitError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        FitError::InvalidOption {
            name,
            value,
            reason,
        }
    }

    pub(crate) fn mismatch(what: &'static str, expected: usize, found: usize) -> Self {
        FitError::DimensionMismatch {
            what,
            expected,
            found,
        }
    }
}
