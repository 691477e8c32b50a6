//! The generic plan runner.

use minima_math::classification::{
    Assessment, ClassificationConfig, ConvergenceClassification, SpeedRating,
};
use minima_math::objective::SecondOrderObjective;
use minima_math::optimization::{
    gradient_descent, trust_region, OptimizationResult, Termination, TrustRegionConfig,
};
use minima_math::Point;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::LabResult;
use crate::plan::{ExperimentPlan, Method};
use crate::summary::PlanSummary;

/// One cell of a plan: inputs, raw result and assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    /// Start point.
    pub start: Point,
    /// Distance of the start from the origin.
    pub distance: f64,
    /// α or Δ₀ used for this cell.
    pub hyperparameter: f64,
    /// Final iterate.
    pub point: Point,
    /// Objective value at the final iterate.
    pub value: f64,
    /// Signed error against the classification target.
    pub error: f64,
    /// Iterations consumed.
    pub iterations: u32,
    /// Optimizer's own convergence flag.
    pub converged: bool,
    /// Why the run stopped.
    pub termination: Termination,
    /// Reporting success predicate.
    pub successful: bool,
    /// Global/local label.
    pub classification: ConvergenceClassification,
    /// Speed rating, absent for unsuccessful runs.
    pub speed: Option<SpeedRating>,
}

impl ExperimentRecord {
    /// Builds a record from a finished run.
    #[must_use]
    pub fn new(
        start: Point,
        hyperparameter: f64,
        result: &OptimizationResult,
        max_iterations: u32,
        classification: &ClassificationConfig,
    ) -> Self {
        let assessment = Assessment::of(result, max_iterations, classification);
        Self {
            start,
            distance: start.norm(),
            hyperparameter,
            point: result.point,
            value: result.value,
            error: assessment.error,
            iterations: result.iterations,
            converged: result.converged,
            termination: result.termination,
            successful: assessment.successful,
            classification: assessment.classification,
            speed: assessment.speed,
        }
    }
}

/// Records of one plan, in sweep order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// The plan that produced the records.
    pub plan: ExperimentPlan,
    /// One record per cell.
    pub records: Vec<ExperimentRecord>,
}

impl ExperimentReport {
    /// Records that pass the success predicate.
    pub fn successful(&self) -> impl Iterator<Item = &ExperimentRecord> {
        self.records.iter().filter(|r| r.successful)
    }

    /// Aggregate statistics of this report.
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        PlanSummary::from_report(self)
    }
}

/// Runs a single optimizer call for one cell of a plan.
pub fn run_cell<O>(
    objective: &O,
    plan: &ExperimentPlan,
    start: Point,
    hyperparameter: f64,
) -> LabResult<OptimizationResult>
where
    O: SecondOrderObjective + ?Sized,
{
    let config = plan.optimization_config();
    let result = match plan.method {
        Method::GradientDescent => gradient_descent(objective, start, hyperparameter, &config)?,
        Method::TrustRegion => {
            let tr = TrustRegionConfig::new(hyperparameter)
                .with_acceptance_threshold(plan.acceptance_threshold);
            trust_region(objective, start, &tr, &config)?
        }
    };
    Ok(result)
}

/// Runs every cell of a plan sequentially and assesses each result.
pub fn run_plan<O>(
    objective: &O,
    plan: &ExperimentPlan,
    classification: &ClassificationConfig,
) -> LabResult<ExperimentReport>
where
    O: SecondOrderObjective + ?Sized,
{
    plan.validate()?;
    info!(
        "Running plan '{}' ({}, {} cells)",
        plan.name,
        plan.method,
        plan.sweep.len()
    );

    let mut records = Vec::with_capacity(plan.sweep.len());
    for (start, hyperparameter) in plan.sweep.cells() {
        let result = run_cell(objective, plan, start, hyperparameter)?;
        let record =
            ExperimentRecord::new(start, hyperparameter, &result, plan.max_iterations, classification);

        if result.termination == Termination::Diverged {
            warn!(
                "Plan '{}': {} = {} from {} diverged after {} iterations",
                plan.name,
                plan.method.hyperparameter_name(),
                hyperparameter,
                start,
                result.iterations
            );
        } else {
            debug!(
                plan = %plan.name,
                hyperparameter,
                start = %start,
                iterations = result.iterations,
                value = result.value,
                termination = %result.termination,
                "cell finished"
            );
        }
        records.push(record);
    }

    let report = ExperimentReport {
        plan: plan.clone(),
        records,
    };
    info!(
        "Plan '{}': {}/{} successful",
        plan.name,
        report.successful().count(),
        report.records.len()
    );
    Ok(report)
}

/// Runs several plans in order.
pub fn run_plans<O>(
    objective: &O,
    plans: &[ExperimentPlan],
    classification: &ClassificationConfig,
) -> LabResult<Vec<ExperimentReport>>
where
    O: SecondOrderObjective + ?Sized,
{
    plans
        .iter()
        .map(|plan| run_plan(objective, plan, classification))
        .collect()
}
