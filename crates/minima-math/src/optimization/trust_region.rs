//! Cauchy-point trust-region method.

use log::{debug, trace};
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{require_positive, MathError, MathResult};
use crate::objective::SecondOrderObjective;
use crate::optimization::{
    is_divergent, validate_start, OptimizationConfig, OptimizationResult, Optimizer, Termination,
};
use crate::point::Point;

/// Default initial trust-region radius Δ₀.
pub const DEFAULT_INITIAL_RADIUS: f64 = 1.0;

/// Default acceptance threshold η: steps with ρ > η are taken.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 0.1;

/// Below this ratio the model fit is poor and the radius is halved.
pub const SHRINK_THRESHOLD: f64 = 0.25;

/// Above this ratio a boundary step doubles the radius.
pub const EXPAND_THRESHOLD: f64 = 0.75;

/// How close `‖h‖` must be to Δ for the step to count as boundary-constrained.
const BOUNDARY_TOLERANCE: f64 = 1e-10;

/// Gradient norm below which the subproblem returns a zero step.
const STATIONARY_GRADIENT: f64 = 1e-12;

/// Trust-region hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustRegionConfig {
    /// Initial radius Δ₀.
    pub initial_radius: f64,
    /// Acceptance threshold η.
    pub acceptance_threshold: f64,
}

impl Default for TrustRegionConfig {
    fn default() -> Self {
        Self {
            initial_radius: DEFAULT_INITIAL_RADIUS,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
        }
    }
}

impl TrustRegionConfig {
    /// Creates a configuration with the given initial radius and default η.
    #[must_use]
    pub fn new(initial_radius: f64) -> Self {
        Self {
            initial_radius,
            ..Self::default()
        }
    }

    /// Sets the acceptance threshold.
    #[must_use]
    pub fn with_acceptance_threshold(mut self, eta: f64) -> Self {
        self.acceptance_threshold = eta;
        self
    }

    /// Checks Δ₀ > 0 and η ∈ [0, 1).
    pub fn validate(&self) -> MathResult<()> {
        require_positive("initial_radius", self.initial_radius)?;
        let eta = self.acceptance_threshold;
        if !eta.is_finite() || !(0.0..1.0).contains(&eta) {
            return Err(MathError::invalid_parameter(
                "acceptance_threshold",
                eta,
                "must lie in [0, 1)",
            ));
        }
        Ok(())
    }
}

/// One iteration of a trust-region run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrustRegionIteration {
    /// 1-based iteration index.
    pub iteration: u32,
    /// Iterate after the accept/reject decision.
    pub point: Point,
    /// Objective value at `point`.
    pub value: f64,
    /// Norm of the gradient that produced the step.
    pub gradient_norm: f64,
    /// Radius the step was computed with.
    pub radius_used: f64,
    /// Radius after the update rule.
    pub radius: f64,
    /// Norm of the trial step.
    pub step_norm: f64,
    /// Actual over predicted reduction.
    pub rho: f64,
    /// Whether the trial step was taken.
    pub accepted: bool,
}

/// Solves the trust-region subproblem along the steepest-descent ray.
///
/// Returns the Cauchy-style step `t·d` with `d = −g/‖g‖` and
///
/// - `t = Δ` when the curvature `κ = dᵀHd` is not positive
/// - `t = min(−gᵀd / κ, Δ)` otherwise
///
/// The search never leaves the ray, so `‖h‖ ≤ Δ` always holds. A gradient
/// with norm below 1e-12 yields the zero step.
///
/// # Example
///
/// ```rust
/// use minima_math::optimization::solve_subproblem;
/// use nalgebra::{Matrix2, Vector2};
///
/// // Unit curvature: the unconstrained minimizer along the ray is -g.
/// let h = solve_subproblem(&Vector2::new(0.3, 0.4), &Matrix2::identity(), 1.0);
/// assert!((h.norm() - 0.5).abs() < 1e-12);
///
/// // Clipped to the boundary.
/// let h = solve_subproblem(&Vector2::new(3.0, 4.0), &Matrix2::identity(), 1.0);
/// assert!((h.norm() - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn solve_subproblem(gradient: &Vector2<f64>, hessian: &Matrix2<f64>, radius: f64) -> Vector2<f64> {
    let g_norm = gradient.norm();
    if g_norm < STATIONARY_GRADIENT {
        return Vector2::zeros();
    }

    let direction = -gradient / g_norm;
    let curvature = direction.dot(&(hessian * direction));

    let length = if curvature <= 0.0 {
        radius
    } else {
        (-gradient.dot(&direction) / curvature).min(radius)
    };

    direction * length
}

/// Trust-region minimization with Cauchy-point steps.
///
/// Each iteration builds the quadratic model
/// `m(h) = f + gᵀh + ½hᵀHh`, takes the [`solve_subproblem`] step and
/// compares actual with predicted reduction through
/// `ρ = (f(p) − f(p+h)) / (m(0) − m(h))` (zero when the prediction is zero):
///
/// - `ρ < 0.25` halves the radius
/// - `ρ > 0.75` with a boundary step doubles it
/// - `ρ > η` accepts the step, otherwise the point stays put
///
/// The run converges when either the gradient or the step norm drops below
/// the tolerance. The radius has no floor: repeated rejections halve it
/// until the step norm itself falls below the tolerance, which ends the run
/// as converged.
///
/// # Example
///
/// ```rust
/// use minima_math::objective::CosineBowl;
/// use minima_math::optimization::{trust_region, OptimizationConfig, TrustRegionConfig};
/// use minima_math::Point;
///
/// let f = CosineBowl::default();
/// let result = trust_region(
///     &f,
///     Point::new(2.0, 2.0),
///     &TrustRegionConfig::new(1.0),
///     &OptimizationConfig::default(),
/// )
/// .unwrap();
///
/// assert!(result.converged);
/// assert!((result.value - 0.18).abs() < 1e-6);
/// ```
pub fn trust_region<O>(
    objective: &O,
    start: Point,
    tr_config: &TrustRegionConfig,
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    O: SecondOrderObjective + ?Sized,
{
    run(objective, start, tr_config, config, |_| {})
}

/// Like [`trust_region`], but also returns one record per iteration.
///
/// The result is identical to what [`trust_region`] returns for the same
/// inputs.
pub fn trust_region_with_history<O>(
    objective: &O,
    start: Point,
    tr_config: &TrustRegionConfig,
    config: &OptimizationConfig,
) -> MathResult<(OptimizationResult, Vec<TrustRegionIteration>)>
where
    O: SecondOrderObjective + ?Sized,
{
    let mut history = Vec::new();
    let result = run(objective, start, tr_config, config, |step| history.push(*step))?;
    Ok((result, history))
}

fn run<O, F>(
    objective: &O,
    start: Point,
    tr_config: &TrustRegionConfig,
    config: &OptimizationConfig,
    mut on_iteration: F,
) -> MathResult<OptimizationResult>
where
    O: SecondOrderObjective + ?Sized,
    F: FnMut(&TrustRegionIteration),
{
    tr_config.validate()?;
    config.validate()?;
    validate_start(start)?;

    let eta = tr_config.acceptance_threshold;
    let mut radius = tr_config.initial_radius;
    let mut point = start;

    for iteration in 1..=config.max_iterations {
        let g = objective.gradient(point);
        let hess = objective.hessian(point);
        let h = solve_subproblem(&g, &hess, radius);

        let current = objective.value(point);
        let actual = current - objective.value(point.offset(&h));
        let predicted = -(g.dot(&h) + 0.5 * h.dot(&(hess * h)));
        let rho = if predicted == 0.0 { 0.0 } else { actual / predicted };

        let g_norm = g.norm();
        let h_norm = h.norm();
        let radius_used = radius;

        if rho < SHRINK_THRESHOLD {
            radius *= 0.5;
        } else if rho > EXPAND_THRESHOLD && (h_norm - radius).abs() < BOUNDARY_TOLERANCE {
            radius *= 2.0;
        }

        let accepted = rho > eta;
        if accepted {
            point = point.offset(&h);
        }

        let value = objective.value(point);
        trace!(
            "trust region iteration {}: rho = {:.4}, radius {:.3e} -> {:.3e}, {}",
            iteration,
            rho,
            radius_used,
            radius,
            if accepted { "accepted" } else { "rejected" }
        );
        on_iteration(&TrustRegionIteration {
            iteration,
            point,
            value,
            gradient_norm: g_norm,
            radius_used,
            radius,
            step_norm: h_norm,
            rho,
            accepted,
        });

        if g_norm < config.tolerance || h_norm < config.tolerance {
            debug!(
                "trust region converged after {} iterations (f = {:.6}, |g| = {:.2e}, |h| = {:.2e})",
                iteration, value, g_norm, h_norm
            );
            return Ok(OptimizationResult::new(
                point,
                value,
                iteration,
                Termination::Converged,
            ));
        }

        if is_divergent(point, value) {
            debug!(
                "trust region diverged at iteration {} (point = {}, f = {:e})",
                iteration, point, value
            );
            return Ok(OptimizationResult::new(
                point,
                value,
                iteration,
                Termination::Diverged,
            ));
        }
    }

    let value = objective.value(point);
    debug!(
        "trust region exhausted {} iterations (f = {:.6}, radius = {:.3e})",
        config.max_iterations, value, radius
    );
    Ok(OptimizationResult::new(
        point,
        value,
        config.max_iterations,
        Termination::MaxIterations,
    ))
}

/// Trust-region optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrustRegionOptimizer {
    /// Radius and acceptance settings.
    pub config: TrustRegionConfig,
}

impl TrustRegionOptimizer {
    /// Creates an optimizer with the given initial radius and default η.
    #[must_use]
    pub fn new(initial_radius: f64) -> Self {
        Self {
            config: TrustRegionConfig::new(initial_radius),
        }
    }

    /// Creates an optimizer from a full configuration.
    #[must_use]
    pub fn with_config(config: TrustRegionConfig) -> Self {
        Self { config }
    }
}

impl Optimizer for TrustRegionOptimizer {
    fn minimize<O>(
        &self,
        objective: &O,
        start: Point,
        config: &OptimizationConfig,
    ) -> MathResult<OptimizationResult>
    where
        O: SecondOrderObjective,
    {
        trust_region(objective, start, &self.config, config)
    }

    fn name(&self) -> &'static str {
        "Trust region"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{CosineBowl, Objective, GLOBAL_MINIMUM_VALUE};
    use approx::assert_relative_eq;

    #[test]
    fn test_subproblem_zero_gradient() {
        let h = solve_subproblem(&Vector2::new(1e-13, 0.0), &Matrix2::identity(), 1.0);
        assert_eq!(h, Vector2::zeros());
    }

    #[test]
    fn test_subproblem_negative_curvature_goes_to_boundary() {
        let hess = Matrix2::new(-1.0, 0.0, 0.0, -1.0);
        let h = solve_subproblem(&Vector2::new(1e-3, 0.0), &hess, 0.7);

        assert_relative_eq!(h.norm(), 0.7, epsilon = 1e-12);
        assert!(h.x < 0.0);
    }

    #[test]
    fn test_subproblem_interior_minimizer() {
        // Along d = -g/|g| the model is |g|·t·(-1) + ½·2·t², minimized at t = |g|/2.
        let hess = Matrix2::new(2.0, 0.0, 0.0, 2.0);
        let g = Vector2::new(0.6, 0.8);
        let h = solve_subproblem(&g, &hess, 10.0);

        assert_relative_eq!(h.x, -0.3, epsilon = 1e-12);
        assert_relative_eq!(h.y, -0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_converges_to_global_minimum_from_far_point() {
        let f = CosineBowl::default();
        let result = trust_region(
            &f,
            Point::new(2.0, 2.0),
            &TrustRegionConfig::default(),
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_eq!(result.termination, Termination::Converged);
        assert_relative_eq!(result.value, GLOBAL_MINIMUM_VALUE, epsilon = 1e-9);
        assert!(result.iterations < 30);
    }

    #[test]
    fn test_local_minimum_from_unit_point() {
        let f = CosineBowl::default();
        let result = trust_region(
            &f,
            Point::new(1.0, 1.0),
            &TrustRegionConfig::default(),
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.value, 0.328_859_674_5, epsilon = 1e-6);
    }

    #[test]
    fn test_history_matches_plain_run() {
        let f = CosineBowl::default();
        let tr = TrustRegionConfig::default();
        let config = OptimizationConfig::default();

        let plain = trust_region(&f, Point::new(2.0, 2.0), &tr, &config).unwrap();
        let (traced, history) =
            trust_region_with_history(&f, Point::new(2.0, 2.0), &tr, &config).unwrap();

        assert_eq!(plain, traced);
        assert_eq!(history.len(), plain.iterations as usize);
        assert_eq!(history.last().map(|s| s.point), Some(plain.point));
        for (i, step) in history.iter().enumerate() {
            assert_eq!(step.iteration as usize, i + 1);
            assert!(step.step_norm <= step.radius_used * (1.0 + 1e-12));
        }
    }

    #[test]
    fn test_first_step_respects_initial_radius() {
        let f = CosineBowl::default();
        let config = OptimizationConfig::default().with_max_iterations(1);
        let (_, history) = trust_region_with_history(
            &f,
            Point::new(2.0, 2.0),
            &TrustRegionConfig::new(1.0),
            &config,
        )
        .unwrap();

        assert_eq!(history.len(), 1);
        assert!(history[0].step_norm <= 1.0 + 1e-12);
        assert_eq!(history[0].radius_used, 1.0);
    }

    #[test]
    fn test_rejected_step_keeps_point() {
        // η just below 1 rejects nearly every step on this rugged surface.
        let f = CosineBowl::default();
        let start = Point::new(0.9, -0.6);
        let tr = TrustRegionConfig::new(2.0).with_acceptance_threshold(0.999);
        let config = OptimizationConfig::default().with_max_iterations(5);
        let (_, history) = trust_region_with_history(&f, start, &tr, &config).unwrap();

        let mut current = start;
        for step in &history {
            if step.accepted {
                assert!(step.rho > 0.999);
                current = step.point;
            } else {
                assert_eq!(step.point, current);
            }
            if step.rho < SHRINK_THRESHOLD {
                assert_eq!(step.radius, step.radius_used * 0.5);
            }
        }
    }

    #[test]
    fn test_stationary_start_converges_immediately() {
        let f = CosineBowl::default();
        let result = trust_region(
            &f,
            Point::ORIGIN,
            &TrustRegionConfig::default(),
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.point, Point::ORIGIN);
    }

    #[test]
    fn test_invalid_config() {
        let f = CosineBowl::default();
        let config = OptimizationConfig::default();
        let start = Point::new(1.0, 1.0);

        for tr in [
            TrustRegionConfig::new(0.0),
            TrustRegionConfig::new(-1.0),
            TrustRegionConfig::new(f64::NAN),
            TrustRegionConfig::default().with_acceptance_threshold(1.0),
            TrustRegionConfig::default().with_acceptance_threshold(-0.1),
        ] {
            assert!(trust_region(&f, start, &tr, &config).is_err());
        }
    }

    #[test]
    fn test_optimizer_trait() {
        let optimizer = TrustRegionOptimizer::new(0.5);
        let f = CosineBowl::default();
        let config = OptimizationConfig::default();

        let via_trait = optimizer.minimize(&f, Point::new(1.0, 1.0), &config).unwrap();
        let direct =
            trust_region(&f, Point::new(1.0, 1.0), &TrustRegionConfig::new(0.5), &config).unwrap();

        assert_eq!(via_trait, direct);
        assert_eq!(optimizer.name(), "Trust region");
        assert!(f.value(via_trait.point).is_finite());
    }
}
