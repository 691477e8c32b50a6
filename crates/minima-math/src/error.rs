//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
///
/// Numerical divergence is not an error: an optimizer that blows up returns
/// a result record with `converged == false`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// A hyperparameter is outside its valid domain.
    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// Invalid input that is not a single scalar parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Rejects values that are NaN, infinite or not strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> MathResult<f64> {
    if !value.is_finite() {
        return Err(MathError::invalid_parameter(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(MathError::invalid_parameter(name, value, "must be positive"));
    }
    Ok(value)
}
