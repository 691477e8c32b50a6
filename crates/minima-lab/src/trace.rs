//! Per-iteration trace of a trust-region run.

use minima_math::objective::SecondOrderObjective;
use minima_math::optimization::{
    trust_region_with_history, OptimizationConfig, OptimizationResult, TrustRegionConfig,
    TrustRegionIteration,
};
use minima_math::Point;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LabResult;

/// Default start of a trace.
pub const DEFAULT_TRACE_START: Point = Point::new(2.0, 2.0);

/// Default iteration budget of a trace.
pub const DEFAULT_TRACE_ITERATIONS: u32 = 50;

/// A trust-region run with its full history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Start point.
    pub start: Point,
    /// Settings the run used.
    pub config: TrustRegionConfig,
    /// Final result.
    pub result: OptimizationResult,
    /// One entry per iteration.
    pub iterations: Vec<TrustRegionIteration>,
}

impl Trace {
    /// Number of rejected steps.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.iterations.iter().filter(|it| !it.accepted).count()
    }

    /// Smallest and largest radius reached after an update.
    #[must_use]
    pub fn radius_range(&self) -> Option<(f64, f64)> {
        self.iterations.iter().map(|it| it.radius).fold(None, |range, r| match range {
            None => Some((r, r)),
            Some((lo, hi)) => Some((f64::min(lo, r), f64::max(hi, r))),
        })
    }
}

/// Runs the trust region and keeps every iteration.
pub fn trace_trust_region<O>(
    objective: &O,
    start: Point,
    tr_config: &TrustRegionConfig,
    config: &OptimizationConfig,
) -> LabResult<Trace>
where
    O: SecondOrderObjective + ?Sized,
{
    let (result, iterations) = trust_region_with_history(objective, start, tr_config, config)?;
    info!(
        "Trace from {} with radius {}: {} after {} iterations (f = {:.6})",
        start, tr_config.initial_radius, result.termination, result.iterations, result.value
    );

    Ok(Trace {
        start,
        config: *tr_config,
        result,
        iterations,
    })
}
