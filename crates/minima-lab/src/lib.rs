//! # Minima Lab
//!
//! Experiment harness for the Minima optimizers.
//!
//! Experiments are data: an [`ExperimentPlan`] names a method and a sweep
//! (hyperparameter values at a fixed start, or start points at a fixed
//! hyperparameter), and a single runner executes any plan. The built-in plans
//! cover the step-size and radius sweeps from (1, 1) and the nine-point
//! initial-point sweeps for both methods.
//!
//! # Example
//!
//! ```rust
//! use minima_lab::{run_plan, ExperimentPlan};
//! use minima_math::classification::ClassificationConfig;
//! use minima_math::objective::CosineBowl;
//!
//! let report = run_plan(
//!     &CosineBowl::default(),
//!     &ExperimentPlan::radius_sweep(),
//!     &ClassificationConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(report.records.len(), 7);
//! assert_eq!(report.summary().successes, 7);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod error;
pub mod plan;
pub mod runner;
pub mod summary;
pub mod surface;
pub mod trace;

pub use config::LabConfig;
pub use error::{LabError, LabResult};
pub use plan::{find_plan, ExperimentPlan, Method, Sweep};
pub use runner::{run_cell, run_plan, run_plans, ExperimentRecord, ExperimentReport};
pub use summary::{IterationStats, OverallSummary, PlanSummary};
pub use surface::SurfaceGrid;
pub use trace::{trace_trust_region, Trace};
