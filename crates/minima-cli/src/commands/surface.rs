//! Surface command implementation.
//!
//! Samples the objective on a square grid for external plotting.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use minima_lab::surface::DEFAULT_RANGE;
use minima_lab::SurfaceGrid;
use minima_math::objective::CosineBowl;

use crate::cli::OutputFormat;
use crate::commands::validate_finite;
use crate::output::{fmt_value, print_info, print_json, print_output, KeyValue, Output};

/// Arguments for the surface command.
#[derive(Args, Debug)]
pub struct SurfaceArgs {
    /// Lower bound of both axes
    #[arg(long, default_value_t = DEFAULT_RANGE.0, allow_negative_numbers = true)]
    pub min: f64,

    /// Upper bound of both axes
    #[arg(long, default_value_t = DEFAULT_RANGE.1, allow_negative_numbers = true)]
    pub max: f64,

    /// Samples per axis
    #[arg(short, long, default_value_t = 21)]
    pub resolution: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Tabled)]
struct SampleRow {
    #[tabled(rename = "x", display_with = "fmt_value")]
    x: f64,
    #[tabled(rename = "y", display_with = "fmt_value")]
    y: f64,
    #[tabled(rename = "f(x,y)", display_with = "fmt_value")]
    f: f64,
}

/// Execute the surface command.
pub fn execute(args: SurfaceArgs, out: Output) -> Result<()> {
    let range = (validate_finite("min", args.min)?, validate_finite("max", args.max)?);
    let grid = SurfaceGrid::sample(&CosineBowl::default(), range, range, args.resolution)?;

    match out.format {
        OutputFormat::Table => {
            out.header(&format!(
                "Surface on [{}, {}]² ({} × {})",
                range.0,
                range.1,
                grid.xs.len(),
                grid.ys.len()
            ));
            let mut rows = vec![KeyValue::new("Samples", (grid.xs.len() * grid.ys.len()).to_string())];
            if let Some((x, y, f)) = grid.minimum() {
                rows.push(KeyValue::new("Lowest sample", format!("({:.4}, {:.4})", x, y)));
                rows.push(KeyValue::from_f64("Lowest f(x,y)", f, 6));
            }
            if let Some(f) = grid.samples().map(|(_, _, f)| f).reduce(f64::max) {
                rows.push(KeyValue::from_f64("Highest f(x,y)", f, 6));
            }
            print_output(&rows, out.format)?;
            if !out.quiet {
                print_info("Use --format csv to export the samples.");
            }
        }
        OutputFormat::Json => print_json(&grid)?,
        OutputFormat::Csv => {
            let rows: Vec<SampleRow> = grid.samples().map(|(x, y, f)| SampleRow { x, y, f }).collect();
            print_output(&rows, out.format)?;
        }
        OutputFormat::Minimal => {
            if let Some((_, _, f)) = grid.minimum() {
                println!("{:.10}", f);
            }
        }
    }

    Ok(())
}
