//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A numeric argument outside its valid domain.
    #[error("Invalid value for --{name}: {value}. {reason}")]
    InvalidArgument {
        /// Flag name without dashes.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// The selected plans produced nothing to run.
    #[error("No plans to run")]
    NoPlans,
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
