//! Property-based tests for the objective and the optimizers.
//!
//! These tests verify properties that should hold for any input:
//! - Analytic derivatives agree with finite differences
//! - Runs are deterministic
//! - Trust-region steps never leave the region
//! - The trust-region radius stays positive and finite

use minima_math::prelude::*;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn coordinate() -> impl Strategy<Value = f64> {
    -5.0..5.0f64
}

fn point() -> impl Strategy<Value = Point> {
    (coordinate(), coordinate()).prop_map(|(x, y)| Point::new(x, y))
}

fn radius() -> impl Strategy<Value = f64> {
    0.05..3.0f64
}

fn step_size() -> impl Strategy<Value = f64> {
    0.001..0.6f64
}

fn numerical_hessian(f: &CosineBowl, p: Point, h: f64) -> [[f64; 2]; 2] {
    let at = |dx: f64, dy: f64| f.value(Point::new(p.x + dx, p.y + dy));
    let center = at(0.0, 0.0);

    let fxx = (at(h, 0.0) - 2.0 * center + at(-h, 0.0)) / (h * h);
    let fyy = (at(0.0, h) - 2.0 * center + at(0.0, -h)) / (h * h);
    let fxy = (at(h, h) - at(h, -h) - at(-h, h) + at(-h, -h)) / (4.0 * h * h);

    [[fxx, fxy], [fxy, fyy]]
}

// =============================================================================
// OBJECTIVE
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn gradient_matches_central_difference(p in point()) {
        let f = CosineBowl::default();
        let h = 1e-6;
        let g = f.gradient(p);

        let dx = (f.value(Point::new(p.x + h, p.y)) - f.value(Point::new(p.x - h, p.y))) / (2.0 * h);
        let dy = (f.value(Point::new(p.x, p.y + h)) - f.value(Point::new(p.x, p.y - h))) / (2.0 * h);

        prop_assert!((g.x - dx).abs() < 1e-4, "df/dx at {}: {} vs {}", p, g.x, dx);
        prop_assert!((g.y - dy).abs() < 1e-4, "df/dy at {}: {} vs {}", p, g.y, dy);
    }

    #[test]
    fn hessian_matches_second_differences(p in point()) {
        let f = CosineBowl::default();
        let hess = f.hessian(p);
        let numeric = numerical_hessian(&f, p, 1e-4);

        for i in 0..2 {
            for j in 0..2 {
                prop_assert!(
                    (hess[(i, j)] - numeric[i][j]).abs() < 1e-3,
                    "H[{}][{}] at {}: {} vs {}",
                    i, j, p, hess[(i, j)], numeric[i][j]
                );
            }
        }
        prop_assert_eq!(hess[(0, 1)], hess[(1, 0)]);
    }

    #[test]
    fn objective_is_bounded_below_by_paraboloid(p in point()) {
        let f = CosineBowl::default();
        let bound = p.x * p.x + p.y * p.y - 0.12 + 0.3;
        prop_assert!(f.value(p) >= bound - 1e-12);
    }
}

// =============================================================================
// OPTIMIZERS
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gradient_descent_is_deterministic(start in point(), alpha in step_size()) {
        let f = CosineBowl::default();
        let config = OptimizationConfig::default();

        let first = gradient_descent(&f, start, alpha, &config).unwrap();
        let second = gradient_descent(&f, start, alpha, &config).unwrap();

        prop_assert_eq!(first.point.x.to_bits(), second.point.x.to_bits());
        prop_assert_eq!(first.point.y.to_bits(), second.point.y.to_bits());
        prop_assert_eq!(first.value.to_bits(), second.value.to_bits());
        prop_assert_eq!(first.iterations, second.iterations);
        prop_assert_eq!(first.termination, second.termination);
    }

    #[test]
    fn trust_region_is_deterministic(start in point(), delta in radius()) {
        let f = CosineBowl::default();
        let tr = TrustRegionConfig::new(delta);
        let config = OptimizationConfig::default();

        let first = trust_region(&f, start, &tr, &config).unwrap();
        let second = trust_region(&f, start, &tr, &config).unwrap();

        prop_assert_eq!(first.point.x.to_bits(), second.point.x.to_bits());
        prop_assert_eq!(first.point.y.to_bits(), second.point.y.to_bits());
        prop_assert_eq!(first.value.to_bits(), second.value.to_bits());
        prop_assert_eq!(first.iterations, second.iterations);
    }

    #[test]
    fn result_respects_iteration_budget(start in point(), alpha in step_size(), budget in 1u32..200) {
        let f = CosineBowl::default();
        let config = OptimizationConfig::default().with_max_iterations(budget);

        let gd = gradient_descent(&f, start, alpha, &config).unwrap();
        prop_assert!(gd.iterations >= 1 && gd.iterations <= budget);
        prop_assert_eq!(gd.converged, gd.termination == Termination::Converged);

        let tr = trust_region(&f, start, &TrustRegionConfig::default(), &config).unwrap();
        prop_assert!(tr.iterations >= 1 && tr.iterations <= budget);
        prop_assert_eq!(tr.converged, tr.termination == Termination::Converged);
    }

    #[test]
    fn trust_region_steps_stay_inside_region(start in point(), delta in radius()) {
        let f = CosineBowl::default();
        let (_, history) = trust_region_with_history(
            &f,
            start,
            &TrustRegionConfig::new(delta),
            &OptimizationConfig::default(),
        )
        .unwrap();

        for step in &history {
            prop_assert!(
                step.step_norm <= step.radius_used * (1.0 + 1e-12),
                "iteration {}: |h| = {} > radius {}",
                step.iteration, step.step_norm, step.radius_used
            );
        }
    }

    #[test]
    fn trust_region_values_never_increase(start in point(), delta in radius()) {
        let f = CosineBowl::default();
        let (_, history) = trust_region_with_history(
            &f,
            start,
            &TrustRegionConfig::new(delta),
            &OptimizationConfig::default(),
        )
        .unwrap();

        let mut previous = f.value(start);
        for step in &history {
            prop_assert!(step.value <= previous);
            previous = step.value;
        }
    }

    #[test]
    fn trust_region_radius_stays_positive(start in point(), delta in radius()) {
        let f = CosineBowl::default();
        let config = OptimizationConfig::new(0.0, 300);
        let (result, history) =
            trust_region_with_history(&f, start, &TrustRegionConfig::new(delta), &config).unwrap();

        prop_assert_eq!(result.termination, Termination::MaxIterations);
        for step in &history {
            prop_assert!(step.radius > 0.0 && step.radius.is_finite());
        }
    }
}

#[test]
fn radius_survives_long_run_from_far_start() {
    let f = CosineBowl::default();
    let config = OptimizationConfig::new(0.0, 1000);
    let (result, history) = trust_region_with_history(
        &f,
        Point::new(100.0, -100.0),
        &TrustRegionConfig::default(),
        &config,
    )
    .unwrap();

    assert_eq!(history.len(), 1000);
    assert!(!result.converged);
    assert!(result.value.is_finite());
    for step in &history {
        assert!(step.radius > 0.0, "radius collapsed at {}", step.iteration);
        assert!(step.radius.is_finite());
        assert!(!step.rho.is_nan());
    }
}
