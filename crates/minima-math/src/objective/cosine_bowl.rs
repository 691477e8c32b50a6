//! The multimodal cosine bowl test surface.

use std::f64::consts::PI;

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

use super::{Objective, SecondOrderObjective};
use crate::point::Point;

/// Value of the default [`CosineBowl`] at its global minimizer `(0, 0)`.
///
/// Declared rather than computed: `c₂ − c₁ = 0.3 − 0.12`.
pub const GLOBAL_MINIMUM_VALUE: f64 = 0.18;

/// Default amplitude of the cosine ripple.
pub const DEFAULT_RIPPLE: f64 = 0.12;

/// Default vertical offset.
pub const DEFAULT_OFFSET: f64 = 0.3;

const KX: f64 = 3.0 * PI;
const KY: f64 = 4.0 * PI;

/// `f(x, y) = x² + y² − c₁·cos(3πx)·cos(4πy) + c₂`.
///
/// A paraboloid with a cosine ripple on top. With the default coefficients
/// the ripple creates a lattice of local minima around the global one at the
/// origin, which makes it a good stress test for step-size and radius
/// choices.
///
/// # Example
///
/// ```rust
/// use minima_math::objective::{CosineBowl, Objective, GLOBAL_MINIMUM_VALUE};
/// use minima_math::Point;
///
/// let f = CosineBowl::default();
/// assert!((f.value(Point::ORIGIN) - GLOBAL_MINIMUM_VALUE).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CosineBowl {
    /// Ripple amplitude `c₁`.
    pub ripple: f64,
    /// Constant offset `c₂`.
    pub offset: f64,
}

impl Default for CosineBowl {
    fn default() -> Self {
        Self {
            ripple: DEFAULT_RIPPLE,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl CosineBowl {
    /// Creates a bowl with custom coefficients.
    #[must_use]
    pub const fn new(ripple: f64, offset: f64) -> Self {
        Self { ripple, offset }
    }
}

impl Objective for CosineBowl {
    fn value(&self, p: Point) -> f64 {
        p.x * p.x + p.y * p.y - self.ripple * (KX * p.x).cos() * (KY * p.y).cos() + self.offset
    }

    fn gradient(&self, p: Point) -> Vector2<f64> {
        let (sx, cx) = (KX * p.x).sin_cos();
        let (sy, cy) = (KY * p.y).sin_cos();

        Vector2::new(
            2.0 * p.x + self.ripple * KX * sx * cy,
            2.0 * p.y + self.ripple * KY * cx * sy,
        )
    }

    fn known_minimum(&self) -> Option<f64> {
        // Only the stock coefficients have a declared minimum.
        (*self == Self::default()).then_some(GLOBAL_MINIMUM_VALUE)
    }

    fn name(&self) -> &'static str {
        "f(x,y) = x² + y² − c₁·cos(3πx)·cos(4πy) + c₂"
    }
}

impl SecondOrderObjective for CosineBowl {
    fn hessian(&self, p: Point) -> Matrix2<f64> {
        let (sx, cx) = (KX * p.x).sin_cos();
        let (sy, cy) = (KY * p.y).sin_cos();

        let fxx = 2.0 + self.ripple * KX * KX * cx * cy;
        let fyy = 2.0 + self.ripple * KY * KY * cx * cy;
        let fxy = -self.ripple * KX * KY * sx * sy;

        Matrix2::new(fxx, fxy, fxy, fyy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn central_gradient(f: &CosineBowl, p: Point, h: f64) -> Vector2<f64> {
        let dx = (f.value(Point::new(p.x + h, p.y)) - f.value(Point::new(p.x - h, p.y))) / (2.0 * h);
        let dy = (f.value(Point::new(p.x, p.y + h)) - f.value(Point::new(p.x, p.y - h))) / (2.0 * h);
        Vector2::new(dx, dy)
    }

    #[test]
    fn test_global_minimum() {
        let f = CosineBowl::default();

        assert_relative_eq!(f.value(Point::ORIGIN), GLOBAL_MINIMUM_VALUE, epsilon = 1e-15);
        assert_eq!(f.gradient(Point::ORIGIN), Vector2::zeros());
        assert_eq!(f.known_minimum(), Some(GLOBAL_MINIMUM_VALUE));
        assert_eq!(CosineBowl::new(0.2, 0.3).known_minimum(), None);
    }

    #[test]
    fn test_gradient_at_lattice_point() {
        // sin(3π) and sin(4π) vanish up to rounding, leaving only 2p.
        let f = CosineBowl::default();
        let g = f.gradient(Point::new(1.0, 1.0));

        assert_relative_eq!(g.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(g.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let f = CosineBowl::default();
        for &(x, y) in &[(0.3, -0.7), (1.25, 0.4), (-2.0, 1.1), (0.05, 0.05)] {
            let p = Point::new(x, y);
            let analytic = f.gradient(p);
            let numeric = central_gradient(&f, p, 1e-6);
            assert_relative_eq!(analytic.x, numeric.x, epsilon = 1e-6);
            assert_relative_eq!(analytic.y, numeric.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_hessian_is_symmetric() {
        let f = CosineBowl::default();
        let hess = f.hessian(Point::new(0.37, -1.21));

        assert_eq!(hess[(0, 1)], hess[(1, 0)]);
    }

    #[test]
    fn test_hessian_at_origin() {
        let f = CosineBowl::default();
        let hess = f.hessian(Point::ORIGIN);

        assert_relative_eq!(hess[(0, 0)], 2.0 + 0.12 * 9.0 * PI * PI, epsilon = 1e-12);
        assert_relative_eq!(hess[(1, 1)], 2.0 + 0.12 * 16.0 * PI * PI, epsilon = 1e-12);
        assert_relative_eq!(hess[(0, 1)], 0.0);
    }

    #[test]
    fn test_reference_passthrough() {
        let f = CosineBowl::default();
        let by_ref = &f;
        let p = Point::new(0.2, 0.9);

        assert_eq!(Objective::value(&by_ref, p), f.value(p));
        assert_eq!(SecondOrderObjective::hessian(&by_ref, p), f.hessian(p));
    }
}
