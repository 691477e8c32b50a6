//! Unconstrained minimization in two dimensions.
//!
//! This module provides two iterative minimizers:
//!
//! - [`gradient_descent`]: fixed-step steepest descent, first order only
//! - [`trust_region`]: Cauchy-point trust region driven by the Hessian
//!
//! Both return an [`OptimizationResult`]. A run stops for exactly one of
//! three reasons, reported as [`Termination`]:
//!
//! | Termination | `converged` | Trigger |
//! |-------------|-------------|---------|
//! | `Converged` | `true` | step (or gradient) norm below tolerance |
//! | `Diverged` | `false` | position or value beyond 1e10, or non-finite value |
//! | `MaxIterations` | `false` | iteration budget exhausted |
//!
//! # Example
//!
//! ```rust
//! use minima_math::objective::CosineBowl;
//! use minima_math::optimization::{gradient_descent, trust_region, OptimizationConfig, TrustRegionConfig};
//! use minima_math::Point;
//!
//! let f = CosineBowl::default();
//! let config = OptimizationConfig::default();
//!
//! let gd = gradient_descent(&f, Point::new(1.0, 1.0), 0.05, &config).unwrap();
//! assert!(gd.converged);
//!
//! let tr = trust_region(&f, Point::new(2.0, 2.0), &TrustRegionConfig::default(), &config).unwrap();
//! assert!(tr.converged);
//! assert!((tr.value - 0.18).abs() < 1e-6);
//! ```

mod gradient_descent;
mod trust_region;

pub use gradient_descent::{gradient_descent, GradientDescentOptimizer};
pub use trust_region::{
    solve_subproblem, trust_region, trust_region_with_history, TrustRegionConfig,
    TrustRegionIteration, TrustRegionOptimizer, DEFAULT_ACCEPTANCE_THRESHOLD,
    DEFAULT_INITIAL_RADIUS, EXPAND_THRESHOLD, SHRINK_THRESHOLD,
};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::objective::SecondOrderObjective;
use crate::point::Point;

/// Default tolerance on the step (or gradient) norm.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 1000;

/// Magnitude beyond which a coordinate or objective value counts as divergent.
pub const DIVERGENCE_THRESHOLD: f64 = 1e10;

/// Stopping criteria shared by all optimizers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl OptimizationConfig {
    /// Creates a new optimization configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Checks that the criteria can terminate a run.
    ///
    /// A zero tolerance is allowed; such runs only stop on divergence or
    /// budget exhaustion (or an exactly zero step).
    pub fn validate(&self) -> MathResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(MathError::invalid_parameter(
                "tolerance",
                self.tolerance,
                "must be finite and non-negative",
            ));
        }
        if self.max_iterations == 0 {
            return Err(MathError::invalid_parameter(
                "max_iterations",
                0.0,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The tolerance test passed.
    Converged,
    /// The divergence guard fired.
    Diverged,
    /// The iteration budget ran out.
    MaxIterations,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Converged => "converged",
            Self::Diverged => "diverged",
            Self::MaxIterations => "max iterations",
        };
        f.write_str(s)
    }
}

/// Result of an optimization run.
///
/// Invariants: `1 <= iterations <= max_iterations`, and `converged` is `true`
/// exactly when `termination` is [`Termination::Converged`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Final iterate.
    pub point: Point,
    /// Objective value at the final iterate.
    pub value: f64,
    /// Number of iterations used (the 1-based index of the last one).
    pub iterations: u32,
    /// Whether the tolerance test stopped the run.
    pub converged: bool,
    /// Why the run stopped.
    pub termination: Termination,
}

impl OptimizationResult {
    pub(crate) fn new(point: Point, value: f64, iterations: u32, termination: Termination) -> Self {
        Self {
            point,
            value,
            iterations,
            converged: termination == Termination::Converged,
            termination,
        }
    }

    /// Final x coordinate.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.point.x
    }

    /// Final y coordinate.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.point.y
    }
}

/// Trait for minimizers.
///
/// Every implementation accepts any [`SecondOrderObjective`], the strongest
/// capability one of them needs; gradient descent never asks for the
/// Hessian. Use the free functions directly for first-order objectives.
///
/// # Example
///
/// ```rust
/// use minima_math::objective::CosineBowl;
/// use minima_math::optimization::{GradientDescentOptimizer, OptimizationConfig, Optimizer};
/// use minima_math::Point;
///
/// let optimizer = GradientDescentOptimizer::new(0.05);
/// let result = optimizer
///     .minimize(&CosineBowl::default(), Point::new(1.0, 1.0), &OptimizationConfig::default())
///     .unwrap();
/// assert!(result.converged);
/// assert_eq!(optimizer.name(), "Gradient descent");
/// ```
pub trait Optimizer: Send + Sync {
    /// Minimizes `objective` starting from `start`.
    fn minimize<O>(
        &self,
        objective: &O,
        start: Point,
        config: &OptimizationConfig,
    ) -> MathResult<OptimizationResult>
    where
        O: SecondOrderObjective;

    /// Returns the name of the optimizer.
    fn name(&self) -> &'static str;
}

/// Divergence guard: position or value blow-up, or a non-finite value.
pub(crate) fn is_divergent(point: Point, value: f64) -> bool {
    point.x.abs() > DIVERGENCE_THRESHOLD
        || point.y.abs() > DIVERGENCE_THRESHOLD
        || !value.is_finite()
        || value > DIVERGENCE_THRESHOLD
}

pub(crate) fn validate_start(start: Point) -> MathResult<()> {
    if start.is_finite() {
        Ok(())
    } else {
        Err(MathError::invalid_input(format!(
            "start point {start} is not finite"
        )))
    }
}
