//! # Minima Math
//!
//! Numerical core of the Minima optimization lab.
//!
//! This crate provides:
//!
//! - **Objectives**: Differentiable test surfaces (the multimodal cosine bowl)
//! - **Optimization**: Fixed-step gradient descent and a Cauchy-point trust region
//! - **Classification**: Global/local labelling, success predicate and speed ratings
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Identical inputs produce bit-identical results
//! - **Validated**: Nonsensical hyperparameters are rejected up front
//! - **Generic**: Optimizers work with any objective implementing the traits

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod classification;
pub mod error;
pub mod objective;
pub mod optimization;
pub mod point;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::classification::{
        classify, is_successful, Assessment, ClassificationConfig, ConvergenceClassification,
        SpeedRating,
    };
    pub use crate::error::{MathError, MathResult};
    pub use crate::objective::{CosineBowl, Objective, SecondOrderObjective, GLOBAL_MINIMUM_VALUE};
    pub use crate::optimization::{
        gradient_descent, trust_region, trust_region_with_history, GradientDescentOptimizer,
        OptimizationConfig, OptimizationResult, Optimizer, Termination, TrustRegionConfig,
        TrustRegionIteration, TrustRegionOptimizer,
    };
    pub use crate::point::Point;
}

pub use error::{MathError, MathResult};
pub use point::Point;
