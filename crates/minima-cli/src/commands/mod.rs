//! CLI command implementations.

pub mod plans;
pub mod run;
pub mod surface;
pub mod sweep;
pub mod trace;

pub use plans::PlansArgs;
pub use run::RunArgs;
pub use surface::SurfaceArgs;
pub use sweep::SweepArgs;
pub use trace::TraceArgs;

use minima_lab::ExperimentRecord;
use serde::Serialize;
use tabled::Tabled;

use crate::error::{CliError, CliResult};
use crate::output::{fmt_param, fmt_sci, fmt_value};

/// Validates a strictly positive, finite argument.
pub fn validate_positive(name: &'static str, value: f64) -> CliResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CliError::InvalidArgument {
            name,
            value,
            reason: "Must be positive.",
        });
    }
    Ok(value)
}

/// Validates a finite argument.
pub fn validate_finite(name: &'static str, value: f64) -> CliResult<f64> {
    if !value.is_finite() {
        return Err(CliError::InvalidArgument {
            name,
            value,
            reason: "Must be finite.",
        });
    }
    Ok(value)
}

/// One experiment record, flattened for tables and CSV.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct RecordRow {
    #[tabled(skip)]
    pub plan: String,
    #[tabled(skip)]
    pub x0: f64,
    #[tabled(skip)]
    pub y0: f64,
    #[tabled(rename = "Start")]
    #[serde(skip)]
    pub start: String,
    #[tabled(rename = "Distance", display_with = "fmt_distance")]
    pub distance: f64,
    #[tabled(rename = "Param", display_with = "fmt_param")]
    pub hyperparameter: f64,
    #[tabled(skip)]
    pub x: f64,
    #[tabled(skip)]
    pub y: f64,
    #[tabled(rename = "Iterations")]
    pub iterations: u32,
    #[tabled(rename = "f(x,y)", display_with = "fmt_value")]
    pub value: f64,
    #[tabled(rename = "Error", display_with = "fmt_sci")]
    pub error: f64,
    #[tabled(rename = "Stop")]
    pub termination: String,
    #[tabled(rename = "Class")]
    pub classification: String,
    #[tabled(skip)]
    pub successful: bool,
    #[tabled(rename = "Evaluation")]
    pub evaluation: String,
}

fn fmt_distance(d: &f64) -> String {
    format!("{:.2}", d)
}

impl RecordRow {
    /// Flattens a record produced by plan `plan`.
    pub fn new(plan: &str, record: &ExperimentRecord) -> Self {
        Self {
            plan: plan.to_string(),
            x0: record.start.x,
            y0: record.start.y,
            start: crate::output::fmt_point(&record.start),
            distance: record.distance,
            hyperparameter: record.hyperparameter,
            x: record.point.x,
            y: record.point.y,
            iterations: record.iterations,
            value: record.value,
            error: record.error,
            termination: record.termination.to_string(),
            classification: record.classification.to_string(),
            successful: record.successful,
            evaluation: record
                .speed
                .map_or_else(|| "divergence".to_string(), |s| s.to_string()),
        }
    }
}
