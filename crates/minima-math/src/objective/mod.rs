//! Objective functions on ℝ².
//!
//! Optimizers are generic over these traits so the test surface can be
//! swapped out. Implementations must be pure: the same point always yields
//! bit-identical values, gradients and Hessians.
//!
//! - [`Objective`]: value and gradient (enough for gradient descent)
//! - [`SecondOrderObjective`]: adds the Hessian (required by the trust region)
//! - [`CosineBowl`]: the multimodal surface `x² + y² − c₁·cos(3πx)·cos(4πy) + c₂`

mod cosine_bowl;

pub use cosine_bowl::{CosineBowl, GLOBAL_MINIMUM_VALUE};

use nalgebra::{Matrix2, Vector2};

use crate::point::Point;

/// A differentiable objective function of two variables.
pub trait Objective: Send + Sync {
    /// Evaluates f at `p`.
    fn value(&self, p: Point) -> f64;

    /// Evaluates ∇f at `p`.
    fn gradient(&self, p: Point) -> Vector2<f64>;

    /// The known global minimum value, if the objective declares one.
    fn known_minimum(&self) -> Option<f64> {
        None
    }

    /// Human-readable formula or name.
    fn name(&self) -> &'static str;
}

/// An objective that also provides its Hessian.
pub trait SecondOrderObjective: Objective {
    /// Evaluates the (symmetric) Hessian ∇²f at `p`.
    fn hessian(&self, p: Point) -> Matrix2<f64>;
}

impl<O: Objective + ?Sized> Objective for &O {
    fn value(&self, p: Point) -> f64 {
        (**self).value(p)
    }

    fn gradient(&self, p: Point) -> Vector2<f64> {
        (**self).gradient(p)
    }

    fn known_minimum(&self) -> Option<f64> {
        (**self).known_minimum()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<O: SecondOrderObjective + ?Sized> SecondOrderObjective for &O {
    fn hessian(&self, p: Point) -> Matrix2<f64> {
        (**self).hessian(p)
    }
}
