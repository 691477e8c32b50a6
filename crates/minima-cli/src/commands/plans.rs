//! Plans command implementation.
//!
//! Lists the available plans and renders them as a TOML template.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use minima_lab::{ExperimentPlan, LabConfig, Sweep};

use crate::cli::OutputFormat;
use crate::output::{fmt_param, print_json, print_output, print_success, Output};

/// Arguments for the plans command.
#[derive(Args, Debug)]
pub struct PlansArgs {
    /// List the plans from this config instead of the built-ins
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the TOML template to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct PlanRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Varies")]
    varies: &'static str,
    #[tabled(rename = "Cells")]
    cells: usize,
    #[tabled(rename = "Max iterations")]
    max_iterations: u32,
    #[tabled(rename = "Tolerance", display_with = "fmt_param")]
    tolerance: f64,
}

impl From<&ExperimentPlan> for PlanRow {
    fn from(plan: &ExperimentPlan) -> Self {
        Self {
            name: plan.name.clone(),
            method: plan.method.to_string(),
            varies: match plan.sweep {
                Sweep::Hyperparameter { .. } => plan.method.hyperparameter_name(),
                Sweep::InitialPoints { .. } => "start",
            },
            cells: plan.sweep.len(),
            max_iterations: plan.max_iterations,
            tolerance: plan.tolerance,
        }
    }
}

/// Execute the plans command.
pub fn execute(args: PlansArgs, out: Output) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            let mut config = LabConfig::from_file(path)?;
            config.plans = config.plans();
            config
        }
        None => LabConfig::builtin(),
    };

    if let Some(path) = &args.output {
        std::fs::write(path, config.to_toml()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !out.quiet {
            print_success(&format!("Wrote {} plans to {}", config.plans.len(), path.display()));
        }
        return Ok(());
    }

    match out.format {
        OutputFormat::Table => {
            out.header("Experiment plans");
            let rows: Vec<PlanRow> = config.plans.iter().map(PlanRow::from).collect();
            print_output(&rows, out.format)?;
            if !out.quiet {
                println!();
                print!("{}", config.to_toml()?);
            }
        }
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Csv => {
            let rows: Vec<PlanRow> = config.plans.iter().map(PlanRow::from).collect();
            print_output(&rows, out.format)?;
        }
        OutputFormat::Minimal => print!("{}", config.to_toml()?),
    }

    Ok(())
}
