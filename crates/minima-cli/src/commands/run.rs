//! Run command implementation.
//!
//! Runs one optimizer from one start point and assesses the result.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::info;

use minima_lab::{run_cell, ExperimentPlan, ExperimentRecord, Method, Sweep};
use minima_math::classification::{Assessment, ClassificationConfig};
use minima_math::objective::{CosineBowl, Objective};
use minima_math::optimization::{OptimizationResult, Termination, DEFAULT_ACCEPTANCE_THRESHOLD};
use minima_math::Point;

use crate::cli::OutputFormat;
use crate::commands::{validate_finite, validate_positive, RecordRow};
use crate::output::{fmt_point, print_json, print_output, print_warning, KeyValue, Output};

/// Optimizer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Fixed-step gradient descent
    #[value(alias = "gradient-descent")]
    Gd,
    /// Cauchy-point trust region
    #[value(alias = "trust-region")]
    Tr,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Gd => Method::GradientDescent,
            MethodArg::Tr => Method::TrustRegion,
        }
    }
}

/// Arguments for the run command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Optimizer to run
    #[arg(value_enum)]
    pub method: MethodArg,

    /// Initial x coordinate
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub x0: f64,

    /// Initial y coordinate
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub y0: f64,

    /// Step size α (gradient descent)
    #[arg(long, default_value_t = 0.1)]
    pub step_size: f64,

    /// Initial radius Δ₀ (trust region)
    #[arg(long, default_value_t = 1.0)]
    pub radius: f64,

    /// Acceptance threshold η (trust region)
    #[arg(long, default_value_t = DEFAULT_ACCEPTANCE_THRESHOLD)]
    pub eta: f64,

    /// Maximum iterations
    #[arg(long, default_value_t = 1000)]
    pub max_iterations: u32,

    /// Convergence tolerance
    #[arg(long, default_value_t = 1e-6)]
    pub tolerance: f64,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    method: Method,
    start: Point,
    hyperparameter: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    acceptance_threshold: Option<f64>,
    result: &'a OptimizationResult,
    assessment: Assessment,
}

/// Execute the run command.
pub fn execute(args: RunArgs, out: Output) -> Result<()> {
    let start = Point::new(validate_finite("x0", args.x0)?, validate_finite("y0", args.y0)?);
    let method = Method::from(args.method);
    let hyperparameter = match method {
        Method::GradientDescent => validate_positive("step-size", args.step_size)?,
        Method::TrustRegion => validate_positive("radius", args.radius)?,
    };

    let plan = ExperimentPlan::new(
        "run",
        method,
        Sweep::InitialPoints {
            hyperparameter,
            points: vec![start],
        },
    )
    .with_max_iterations(args.max_iterations)
    .with_tolerance(args.tolerance)
    .with_acceptance_threshold(args.eta);

    let objective = CosineBowl::default();
    let classification = ClassificationConfig::default();
    let result = run_cell(&objective, &plan, start, hyperparameter)?;
    let assessment = Assessment::of(&result, args.max_iterations, &classification);
    info!(
        "{} from {} stopped after {} iterations: {}",
        method, start, result.iterations, result.termination
    );

    match out.format {
        OutputFormat::Table => {
            out.header(&format!("{} from {}", capitalize(&method.to_string()), start));
            let mut rows = vec![
                KeyValue::new("Objective", objective.name()),
                KeyValue::new("Start", fmt_point(&start)),
                KeyValue::new(method.hyperparameter_symbol(), hyperparameter.to_string()),
            ];
            if method == Method::TrustRegion {
                rows.push(KeyValue::new("η", args.eta.to_string()));
            }
            rows.extend([
                KeyValue::new("Final point", format!("{:.6}", result.point)),
                KeyValue::from_f64("f(x,y)", result.value, 10),
                KeyValue::from_sci("Error vs 0.18", assessment.error),
                KeyValue::new("Iterations", result.iterations.to_string()),
                KeyValue::new("Termination", result.termination.to_string()),
                KeyValue::new("Converged", result.converged.to_string()),
                KeyValue::new("Classification", assessment.classification.to_string()),
                KeyValue::new("Successful", assessment.successful.to_string()),
                KeyValue::new(
                    "Evaluation",
                    assessment
                        .speed
                        .map_or_else(|| "divergence".to_string(), |s| s.to_string()),
                ),
            ]);
            print_output(&rows, out.format)?;
            if !out.quiet && result.termination == Termination::Diverged {
                print_warning(&format!(
                    "{} = {} diverged; try a smaller value",
                    method.hyperparameter_symbol(),
                    hyperparameter
                ));
            }
        }
        OutputFormat::Json => {
            print_json(&RunOutput {
                method,
                start,
                hyperparameter,
                acceptance_threshold: (method == Method::TrustRegion).then_some(args.eta),
                result: &result,
                assessment,
            })?;
        }
        OutputFormat::Csv => {
            let record =
                ExperimentRecord::new(start, hyperparameter, &result, args.max_iterations, &classification);
            print_output(&[RecordRow::new(&plan.name, &record)], out.format)?;
        }
        OutputFormat::Minimal => {
            println!("{:.10}", result.value);
        }
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("trust region"), "Trust region");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_method_arg() {
        assert_eq!(Method::from(MethodArg::Gd), Method::GradientDescent);
        assert_eq!(Method::from(MethodArg::Tr), Method::TrustRegion);
    }
}
