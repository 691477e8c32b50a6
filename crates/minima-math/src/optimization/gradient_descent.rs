//! Fixed-step steepest descent.

use log::debug;

use crate::error::{require_positive, MathResult};
use crate::objective::{Objective, SecondOrderObjective};
use crate::optimization::{
    is_divergent, validate_start, OptimizationConfig, OptimizationResult, Optimizer, Termination,
};
use crate::point::Point;

/// Steepest descent with a fixed step size.
///
/// Uses the iteration:
/// `p_{n+1} = p_n - α ∇f(p_n)`
///
/// The new point is always committed before any test. The run then stops as
/// converged when the step length `‖p_{n+1} - p_n‖` drops below the
/// tolerance, or as diverged when [the guard](super) fires. There is no
/// line search and no protection against oscillation: a step size that is
/// too large for the local curvature will bounce between basins until the
/// budget runs out.
///
/// # Arguments
///
/// * `objective` - The function to minimize
/// * `start` - Initial point
/// * `step_size` - Fixed step size α (must be positive and finite)
/// * `config` - Stopping criteria
///
/// # Example
///
/// ```rust
/// use minima_math::objective::CosineBowl;
/// use minima_math::optimization::{gradient_descent, OptimizationConfig};
/// use minima_math::Point;
///
/// let f = CosineBowl::default();
/// let result = gradient_descent(&f, Point::new(1.0, 1.0), 0.1, &OptimizationConfig::default()).unwrap();
///
/// // (1, 1) drains into the local basin around (0.275, 0.222), not the origin.
/// assert!(result.converged);
/// assert!((result.value - 0.3289).abs() < 1e-4);
/// ```
pub fn gradient_descent<O>(
    objective: &O,
    start: Point,
    step_size: f64,
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    O: Objective + ?Sized,
{
    require_positive("step_size", step_size)?;
    config.validate()?;
    validate_start(start)?;

    let mut point = start;

    for iteration in 1..=config.max_iterations {
        let g = objective.gradient(point);
        let next = Point::new(point.x - step_size * g.x, point.y - step_size * g.y);

        let step = next.distance_to(point);
        point = next;

        if step < config.tolerance {
            let value = objective.value(point);
            debug!(
                "gradient descent converged after {} iterations (f = {:.6}, step = {:.2e})",
                iteration, value, step
            );
            return Ok(OptimizationResult::new(
                point,
                value,
                iteration,
                Termination::Converged,
            ));
        }

        let value = objective.value(point);
        if is_divergent(point, value) {
            debug!(
                "gradient descent diverged at iteration {} (point = {}, f = {:e})",
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
        "gradient descent exhausted {} iterations (f = {:.6})",
        config.max_iterations, value
    );
    Ok(OptimizationResult::new(
        point,
        value,
        config.max_iterations,
        Termination::MaxIterations,
    ))
}

/// Gradient descent optimizer with a fixed step size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescentOptimizer {
    /// Step size α.
    pub step_size: f64,
}

impl GradientDescentOptimizer {
    /// Creates an optimizer with the given step size.
    #[must_use]
    pub fn new(step_size: f64) -> Self {
        Self { step_size }
    }
}

impl Default for GradientDescentOptimizer {
    fn default() -> Self {
        Self { step_size: 0.1 }
    }
}

impl Optimizer for GradientDescentOptimizer {
    fn minimize<O>(
        &self,
        objective: &O,
        start: Point,
        config: &OptimizationConfig,
    ) -> MathResult<OptimizationResult>
    where
        O: SecondOrderObjective,
    {
        gradient_descent(objective, start, self.step_size, config)
    }

    fn name(&self) -> &'static str {
        "Gradient descent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use crate::objective::{CosineBowl, GLOBAL_MINIMUM_VALUE};
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    /// `(x-2)^2 + (y+1)^2`, minimum 0 at (2, -1).
    struct Paraboloid;

    impl Objective for Paraboloid {
        fn value(&self, p: Point) -> f64 {
            (p.x - 2.0).powi(2) + (p.y + 1.0).powi(2)
        }

        fn gradient(&self, p: Point) -> Vector2<f64> {
            Vector2::new(2.0 * (p.x - 2.0), 2.0 * (p.y + 1.0))
        }

        fn name(&self) -> &'static str {
            "paraboloid"
        }
    }

    #[test]
    fn test_quadratic() {
        let result = gradient_descent(
            &Paraboloid,
            Point::ORIGIN,
            0.1,
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(result.converged);
        assert_eq!(result.termination, Termination::Converged);
        assert_relative_eq!(result.x(), 2.0, epsilon = 1e-5);
        assert_relative_eq!(result.y(), -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_step_size_one_half_jumps_to_origin() {
        // At (1, 1) the ripple terms vanish, so ∇f = (2, 2) and α = 0.5 lands
        // on the origin; the second (near-zero) step then meets the tolerance.
        let f = CosineBowl::default();
        let result =
            gradient_descent(&f, Point::new(1.0, 1.0), 0.5, &OptimizationConfig::default())
                .unwrap();

        assert!(result.converged);
        assert_eq!(result.iterations, 2);
        assert_relative_eq!(result.value, GLOBAL_MINIMUM_VALUE, epsilon = 1e-12);
        assert!(result.point.norm() < 1e-12);
    }

    #[test]
    fn test_local_basin_from_unit_point() {
        let f = CosineBowl::default();
        let result =
            gradient_descent(&f, Point::new(1.0, 1.0), 0.1, &OptimizationConfig::default())
                .unwrap();

        assert!(result.converged);
        assert!((50..=70).contains(&result.iterations));
        assert_relative_eq!(result.value, 0.328_859_674_5, epsilon = 1e-6);
        assert_relative_eq!(result.x(), 0.2754, epsilon = 1e-3);
        assert_relative_eq!(result.y(), 0.2220, epsilon = 1e-3);
    }

    #[test]
    fn test_oscillating_step_exhausts_budget() {
        let f = CosineBowl::default();
        let result =
            gradient_descent(&f, Point::new(1.0, 1.0), 0.2, &OptimizationConfig::default())
                .unwrap();

        assert!(!result.converged);
        assert_eq!(result.termination, Termination::MaxIterations);
        assert_eq!(result.iterations, 1000);
    }

    #[test]
    fn test_divergence_guard() {
        // On the paraboloid every step with α > 1 overshoots by a growing factor.
        let result = gradient_descent(
            &Paraboloid,
            Point::new(3.0, 0.0),
            1.5,
            &OptimizationConfig::default(),
        )
        .unwrap();

        assert!(!result.converged);
        assert_eq!(result.termination, Termination::Diverged);
        assert!(result.iterations < 1000);
        assert!(result.x().abs() > 1e10 || result.value > 1e10);
    }

    #[test]
    fn test_single_iteration_budget() {
        let f = CosineBowl::default();
        let config = OptimizationConfig::default().with_max_iterations(1);
        let result = gradient_descent(&f, Point::new(2.0, 2.0), 0.01, &config).unwrap();

        assert_eq!(result.iterations, 1);
        assert_eq!(result.termination, Termination::MaxIterations);
    }

    #[test]
    fn test_invalid_step_size() {
        let f = CosineBowl::default();
        let config = OptimizationConfig::default();

        for alpha in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = gradient_descent(&f, Point::new(1.0, 1.0), alpha, &config).unwrap_err();
            assert!(matches!(
                err,
                MathError::InvalidParameter {
                    name: "step_size",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_invalid_start() {
        let f = CosineBowl::default();
        let result = gradient_descent(
            &f,
            Point::new(f64::NAN, 0.0),
            0.1,
            &OptimizationConfig::default(),
        );
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_optimizer_trait() {
        let optimizer = GradientDescentOptimizer::default();
        let f = CosineBowl::default();
        let config = OptimizationConfig::default();

        let via_trait = optimizer.minimize(&f, Point::new(2.0, 2.0), &config).unwrap();
        let direct = gradient_descent(&f, Point::new(2.0, 2.0), 0.1, &config).unwrap();

        assert_eq!(via_trait, direct);
        assert_eq!(optimizer.name(), "Gradient descent");
    }
}
