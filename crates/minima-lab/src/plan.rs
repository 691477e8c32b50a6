//! Experiment plans expressed as data.
//!
//! A plan names a method, a sweep and the stopping criteria. The sweep is
//! either a list of hyperparameter values at one start point, or a list of
//! start points at one hyperparameter value. Every plan is run by the same
//! generic runner ([`crate::run_plan`]).

use std::fmt;

use minima_math::optimization::{
    OptimizationConfig, DEFAULT_ACCEPTANCE_THRESHOLD, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
use minima_math::Point;
use serde::{Deserialize, Serialize};

use crate::error::{LabError, LabResult};

/// Start point of the built-in hyperparameter sweeps.
pub const SWEEP_START: Point = Point::new(1.0, 1.0);

/// Step sizes of the built-in gradient-descent sweep.
pub const STEP_SIZES: [f64; 7] = [0.01, 0.05, 0.1, 0.15, 0.2, 0.3, 0.5];

/// Initial radii of the built-in trust-region sweep.
pub const INITIAL_RADII: [f64; 7] = [0.1, 0.3, 0.5, 1.0, 1.5, 2.0, 3.0];

/// Start points of the built-in initial-point sweeps.
pub const INITIAL_POINTS: [Point; 9] = [
    Point::new(1.0, 1.0),
    Point::new(2.0, 2.0),
    Point::new(-1.0, 1.0),
    Point::new(0.5, -0.5),
    Point::new(3.0, -2.0),
    Point::new(-2.0, -2.0),
    Point::new(1.5, -1.5),
    Point::new(-1.5, 2.0),
    Point::new(2.5, 0.5),
];

/// Which optimizer a plan drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Fixed-step gradient descent; the hyperparameter is α.
    GradientDescent,
    /// Cauchy-point trust region; the hyperparameter is Δ₀.
    TrustRegion,
}

impl Method {
    /// Short label of the swept hyperparameter.
    #[must_use]
    pub fn hyperparameter_name(self) -> &'static str {
        match self {
            Self::GradientDescent => "alpha",
            Self::TrustRegion => "delta",
        }
    }

    /// Mathematical symbol of the swept hyperparameter.
    #[must_use]
    pub fn hyperparameter_symbol(self) -> &'static str {
        match self {
            Self::GradientDescent => "α",
            Self::TrustRegion => "Δ",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GradientDescent => f.write_str("gradient descent"),
            Self::TrustRegion => f.write_str("trust region"),
        }
    }
}

/// What a plan varies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sweep {
    /// Vary the hyperparameter at a fixed start.
    Hyperparameter {
        /// Start point shared by every cell.
        start: Point,
        /// Hyperparameter values, one cell each.
        values: Vec<f64>,
    },
    /// Vary the start at a fixed hyperparameter.
    InitialPoints {
        /// Hyperparameter shared by every cell.
        hyperparameter: f64,
        /// Start points, one cell each.
        points: Vec<Point>,
    },
}

impl Sweep {
    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Hyperparameter { values, .. } => values.len(),
            Self::InitialPoints { points, .. } => points.len(),
        }
    }

    /// Returns `true` if the sweep has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `(start, hyperparameter)` pairs in sweep order.
    #[must_use]
    pub fn cells(&self) -> Vec<(Point, f64)> {
        match self {
            Self::Hyperparameter { start, values } => {
                values.iter().map(|&value| (*start, value)).collect()
            }
            Self::InitialPoints {
                hyperparameter,
                points,
            } => points.iter().map(|&p| (p, *hyperparameter)).collect(),
        }
    }
}

/// One experiment: a method, a sweep and the stopping criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentPlan {
    /// Unique name, used to select the plan from the command line.
    pub name: String,

    /// Optimizer to run.
    pub method: Method,

    /// Maximum iterations per run.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Convergence tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Trust-region acceptance threshold η (ignored by gradient descent).
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f64,

    /// Cells to run.
    pub sweep: Sweep,
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_acceptance_threshold() -> f64 {
    DEFAULT_ACCEPTANCE_THRESHOLD
}

impl ExperimentPlan {
    /// Creates a plan with default stopping criteria.
    pub fn new(name: impl Into<String>, method: Method, sweep: Sweep) -> Self {
        Self {
            name: name.into(),
            method,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            sweep,
        }
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the trust-region acceptance threshold.
    #[must_use]
    pub fn with_acceptance_threshold(mut self, eta: f64) -> Self {
        self.acceptance_threshold = eta;
        self
    }

    /// Gradient descent over [`STEP_SIZES`] from (1, 1).
    #[must_use]
    pub fn step_size_sweep() -> Self {
        Self::new(
            "step-size",
            Method::GradientDescent,
            Sweep::Hyperparameter {
                start: SWEEP_START,
                values: STEP_SIZES.to_vec(),
            },
        )
    }

    /// Trust region over [`INITIAL_RADII`] from (1, 1).
    #[must_use]
    pub fn radius_sweep() -> Self {
        Self::new(
            "radius",
            Method::TrustRegion,
            Sweep::Hyperparameter {
                start: SWEEP_START,
                values: INITIAL_RADII.to_vec(),
            },
        )
    }

    /// Gradient descent with α = 0.1 over [`INITIAL_POINTS`].
    #[must_use]
    pub fn gradient_descent_points() -> Self {
        Self::new(
            "gd-points",
            Method::GradientDescent,
            Sweep::InitialPoints {
                hyperparameter: 0.1,
                points: INITIAL_POINTS.to_vec(),
            },
        )
    }

    /// Trust region with Δ₀ = 1 over [`INITIAL_POINTS`].
    #[must_use]
    pub fn trust_region_points() -> Self {
        Self::new(
            "tr-points",
            Method::TrustRegion,
            Sweep::InitialPoints {
                hyperparameter: 1.0,
                points: INITIAL_POINTS.to_vec(),
            },
        )
    }

    /// The four built-in plans, gradient descent first.
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::step_size_sweep(),
            Self::gradient_descent_points(),
            Self::radius_sweep(),
            Self::trust_region_points(),
        ]
    }

    /// Stopping criteria for every cell of this plan.
    #[must_use]
    pub fn optimization_config(&self) -> OptimizationConfig {
        OptimizationConfig::new(self.tolerance, self.max_iterations)
    }

    /// Structural checks that do not need the optimizer.
    ///
    /// Hyperparameter domains are checked again by the optimizers, which
    /// report them as [`LabError::Math`].
    pub fn validate(&self) -> LabResult<()> {
        if self.name.trim().is_empty() {
            return Err(LabError::invalid_plan(&self.name, "name is empty"));
        }
        if self.sweep.is_empty() {
            return Err(LabError::invalid_plan(&self.name, "sweep has no cells"));
        }
        if self.max_iterations == 0 {
            return Err(LabError::invalid_plan(&self.name, "max_iterations must be at least 1"));
        }
        for (start, value) in self.sweep.cells() {
            if !start.is_finite() {
                return Err(LabError::invalid_plan(
                    &self.name,
                    format!("start point {start} is not finite"),
                ));
            }
            if !value.is_finite() || value <= 0.0 {
                return Err(LabError::invalid_plan(
                    &self.name,
                    format!(
                        "{} = {value} must be positive and finite",
                        self.method.hyperparameter_name()
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Finds a plan by name.
pub fn find_plan<'a>(plans: &'a [ExperimentPlan], name: &str) -> LabResult<&'a ExperimentPlan> {
    plans
        .iter()
        .find(|plan| plan.name == name)
        .ok_or_else(|| LabError::UnknownPlan {
            name: name.to_string(),
            available: plans
                .iter()
                .map(|plan| plan.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}
