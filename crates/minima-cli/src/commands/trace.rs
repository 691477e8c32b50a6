//! Trace command implementation.
//!
//! Runs the trust region with full per-iteration diagnostics.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use minima_lab::trace::{DEFAULT_TRACE_ITERATIONS, DEFAULT_TRACE_START};
use minima_lab::{trace_trust_region, Trace};
use minima_math::objective::CosineBowl;
use minima_math::optimization::{
    OptimizationConfig, TrustRegionConfig, TrustRegionIteration, DEFAULT_ACCEPTANCE_THRESHOLD,
    DEFAULT_INITIAL_RADIUS, DEFAULT_TOLERANCE,
};
use minima_math::Point;

use crate::cli::OutputFormat;
use crate::commands::{validate_finite, validate_positive};
use crate::output::{fmt_point, fmt_sci, fmt_value, print_json, print_output, KeyValue, Output};

/// Arguments for the trace command.
#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Initial x coordinate
    #[arg(long, default_value_t = DEFAULT_TRACE_START.x, allow_negative_numbers = true)]
    pub x0: f64,

    /// Initial y coordinate
    #[arg(long, default_value_t = DEFAULT_TRACE_START.y, allow_negative_numbers = true)]
    pub y0: f64,

    /// Initial radius Δ₀
    #[arg(long, default_value_t = DEFAULT_INITIAL_RADIUS)]
    pub radius: f64,

    /// Acceptance threshold η
    #[arg(long, default_value_t = DEFAULT_ACCEPTANCE_THRESHOLD)]
    pub eta: f64,

    /// Maximum iterations
    #[arg(long, default_value_t = DEFAULT_TRACE_ITERATIONS)]
    pub max_iterations: u32,

    /// Convergence tolerance
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f64,
}

/// One trust-region iteration, flattened for tables and CSV.
#[derive(Debug, Clone, Serialize, Tabled)]
struct TraceRow {
    #[tabled(rename = "k")]
    iteration: u32,
    #[tabled(skip)]
    x: f64,
    #[tabled(skip)]
    y: f64,
    #[tabled(rename = "Point")]
    #[serde(skip)]
    point: String,
    #[tabled(rename = "f(x,y)", display_with = "fmt_value")]
    value: f64,
    #[tabled(rename = "‖g‖", display_with = "fmt_sci")]
    gradient_norm: f64,
    #[tabled(rename = "Δ used", display_with = "fmt_value")]
    radius_used: f64,
    #[tabled(rename = "‖h‖", display_with = "fmt_sci")]
    step_norm: f64,
    #[tabled(rename = "ρ", display_with = "fmt_rho")]
    rho: f64,
    #[tabled(rename = "Step")]
    #[serde(skip)]
    decision: &'static str,
    #[tabled(skip)]
    accepted: bool,
    #[tabled(rename = "Δ next", display_with = "fmt_value")]
    radius: f64,
}

fn fmt_rho(rho: &f64) -> String {
    format!("{:.4}", rho)
}

impl From<&TrustRegionIteration> for TraceRow {
    fn from(it: &TrustRegionIteration) -> Self {
        Self {
            iteration: it.iteration,
            x: it.point.x,
            y: it.point.y,
            point: format!("{:.4}", it.point),
            value: it.value,
            gradient_norm: it.gradient_norm,
            radius_used: it.radius_used,
            step_norm: it.step_norm,
            rho: it.rho,
            decision: if it.accepted { "accept" } else { "reject" },
            accepted: it.accepted,
            radius: it.radius,
        }
    }
}

/// Execute the trace command.
pub fn execute(args: TraceArgs, out: Output) -> Result<()> {
    let start = Point::new(validate_finite("x0", args.x0)?, validate_finite("y0", args.y0)?);
    let tr_config = TrustRegionConfig::new(validate_positive("radius", args.radius)?)
        .with_acceptance_threshold(args.eta);
    let config = OptimizationConfig::new(args.tolerance, args.max_iterations);

    let trace = trace_trust_region(&CosineBowl::default(), start, &tr_config, &config)?;
    let rows: Vec<TraceRow> = trace.iterations.iter().map(TraceRow::from).collect();

    match out.format {
        OutputFormat::Table => {
            out.header(&format!(
                "Trust region from {} (Δ₀ = {}, η = {})",
                fmt_point(&start),
                tr_config.initial_radius,
                tr_config.acceptance_threshold
            ));
            print_output(&rows, out.format)?;
            if out.verbose_table() {
                print_output(&summary_rows(&trace), out.format)?;
            }
        }
        OutputFormat::Json => print_json(&trace)?,
        OutputFormat::Csv => print_output(&rows, out.format)?,
        OutputFormat::Minimal => println!("{:.10}", trace.result.value),
    }

    Ok(())
}

fn summary_rows(trace: &Trace) -> Vec<KeyValue> {
    let mut rows = vec![
        KeyValue::new("Termination", trace.result.termination.to_string()),
        KeyValue::new("Iterations", trace.result.iterations.to_string()),
        KeyValue::new("Final point", format!("{:.6}", trace.result.point)),
        KeyValue::from_f64("f(x,y)", trace.result.value, 10),
        KeyValue::new("Rejected steps", trace.rejected().to_string()),
    ];
    if let Some((lo, hi)) = trace.radius_range() {
        rows.push(KeyValue::new("Radius range", format!("[{:.4}, {:.4}]", lo, hi)));
    }
    rows
}
