//! Post-hoc labelling of optimization outcomes.
//!
//! Two predicates are deliberately kept apart:
//!
//! - [`classify`] reads the optimizer's own `converged` flag and compares the
//!   final value against the known global minimum with a tight tolerance.
//! - [`is_successful`] is the looser reporting predicate: a run counts as a
//!   success if its value is near the target *or* it stopped before the
//!   budget ran out. Any run that neither diverged at the final iteration nor
//!   exhausted the budget passes the second clause, so it is a weak signal.
//!
//! Neither feeds back into the optimizers, and both can be recomputed with
//! different settings without re-running anything.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::objective::GLOBAL_MINIMUM_VALUE;
use crate::optimization::OptimizationResult;

/// Default tolerance for [`ConvergenceClassification::GlobalMinimum`].
pub const DEFAULT_CLASSIFICATION_TOLERANCE: f64 = 0.001;

/// Default tolerance of the value clause in [`is_successful`].
pub const DEFAULT_SUCCESS_TOLERANCE: f64 = 0.01;

/// Outcome of a run relative to the known global minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceClassification {
    /// Converged to the global minimum value.
    GlobalMinimum,
    /// Converged, but somewhere else.
    LocalMinimum,
    /// The tolerance test never passed.
    NotConverged,
}

impl fmt::Display for ConvergenceClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::GlobalMinimum => "global minimum",
            Self::LocalMinimum => "local minimum",
            Self::NotConverged => "not converged",
        };
        f.write_str(s)
    }
}

/// Thresholds used to label results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Known global minimum value.
    pub target: f64,
    /// Tolerance for a global-minimum label.
    pub tolerance: f64,
    /// Tolerance of the value clause of the success predicate.
    pub success_tolerance: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            target: GLOBAL_MINIMUM_VALUE,
            tolerance: DEFAULT_CLASSIFICATION_TOLERANCE,
            success_tolerance: DEFAULT_SUCCESS_TOLERANCE,
        }
    }
}

/// Labels a run from its final value and converged flag.
///
/// # Example
///
/// ```rust
/// use minima_math::classification::{classify, ConvergenceClassification};
///
/// assert_eq!(classify(0.18, true, 0.18, 0.001), ConvergenceClassification::GlobalMinimum);
/// assert_eq!(classify(0.5, true, 0.18, 0.001), ConvergenceClassification::LocalMinimum);
/// assert_eq!(classify(0.18, false, 0.18, 0.001), ConvergenceClassification::NotConverged);
/// ```
#[must_use]
pub fn classify(final_value: f64, converged: bool, target: f64, tolerance: f64) -> ConvergenceClassification {
    if !converged {
        ConvergenceClassification::NotConverged
    } else if (final_value - target).abs() < tolerance {
        ConvergenceClassification::GlobalMinimum
    } else {
        ConvergenceClassification::LocalMinimum
    }
}

/// The reporting layer's success predicate.
///
/// True when `|final_value − target| < success_tolerance` or
/// `iterations < max_iterations`. Independent of the converged flag.
#[must_use]
pub fn is_successful(
    final_value: f64,
    iterations: u32,
    max_iterations: u32,
    config: &ClassificationConfig,
) -> bool {
    (final_value - config.target).abs() < config.success_tolerance || iterations < max_iterations
}

/// Qualitative convergence speed from the iteration count.
///
/// | Iterations | Rating |
/// |------------|--------|
/// | ≤ 10 | `VeryFast` |
/// | ≤ 20 | `Excellent` |
/// | ≤ 30 | `Optimal` |
/// | ≤ 50 | `Good` |
/// | ≤ 100 | `Slow` |
/// | > 100 | `Unstable` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedRating {
    /// At most 10 iterations.
    VeryFast,
    /// At most 20 iterations.
    Excellent,
    /// At most 30 iterations.
    Optimal,
    /// At most 50 iterations.
    Good,
    /// At most 100 iterations.
    Slow,
    /// More than 100 iterations.
    Unstable,
}

impl SpeedRating {
    /// Rates an iteration count.
    #[must_use]
    pub fn from_iterations(iterations: u32) -> Self {
        match iterations {
            0..=10 => Self::VeryFast,
            11..=20 => Self::Excellent,
            21..=30 => Self::Optimal,
            31..=50 => Self::Good,
            51..=100 => Self::Slow,
            _ => Self::Unstable,
        }
    }
}

impl fmt::Display for SpeedRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::VeryFast => "very fast",
            Self::Excellent => "excellent",
            Self::Optimal => "optimal",
            Self::Good => "good",
            Self::Slow => "slow",
            Self::Unstable => "slow, unstable",
        };
        f.write_str(s)
    }
}

/// Everything the reporting layer derives from one result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Label from [`classify`].
    pub classification: ConvergenceClassification,
    /// Outcome of [`is_successful`].
    pub successful: bool,
    /// Speed rating; `None` for unsuccessful runs.
    pub speed: Option<SpeedRating>,
    /// Signed error `final_value − target`.
    pub error: f64,
}

impl Assessment {
    /// Assesses a result produced under the given iteration budget.
    #[must_use]
    pub fn of(result: &OptimizationResult, max_iterations: u32, config: &ClassificationConfig) -> Self {
        let classification = classify(result.value, result.converged, config.target, config.tolerance);
        let successful = is_successful(result.value, result.iterations, max_iterations, config);
        let speed = successful.then(|| SpeedRating::from_iterations(result.iterations));

        Self {
            classification,
            successful,
            speed,
            error: result.value - config.target,
        }
    }
}
