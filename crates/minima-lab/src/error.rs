//! Lab error types.

use std::path::PathBuf;

use minima_math::MathError;
use thiserror::Error;

/// Lab operation result type.
pub type LabResult<T> = Result<T, LabError>;

/// Lab error types.
#[derive(Debug, Error)]
pub enum LabError {
    /// An optimizer rejected its inputs.
    #[error("Optimizer error: {0}")]
    Math(#[from] MathError),

    /// Failed to read a configuration file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for a lab configuration.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A plan failed validation before running.
    #[error("Invalid plan '{plan}': {reason}")]
    InvalidPlan {
        /// Plan name.
        plan: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Configuration values outside their valid domain.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No plan with the requested name.
    #[error("Unknown plan '{name}' (available: {available})")]
    UnknownPlan {
        /// Requested name.
        name: String,
        /// Comma-separated list of known plan names.
        available: String,
    },

    /// Surface sampling parameters are unusable.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
}

impl LabError {
    /// Creates an invalid plan error.
    #[must_use]
    pub fn invalid_plan(plan: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPlan {
            plan: plan.into(),
            reason: reason.into(),
        }
    }
}
