//! Sweep command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use minima_lab::summary::Cell;
use minima_lab::{
    find_plan, run_plans, ExperimentPlan, ExperimentReport, LabConfig, OverallSummary, PlanSummary,
    Sweep,
};
use minima_math::objective::CosineBowl;

use crate::cli::OutputFormat;
use crate::commands::RecordRow;
use crate::error::CliError;
use crate::output::{fmt_point, print_json, print_output, KeyValue, Output};

/// Arguments for the sweep command.
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// TOML file with plans and classification settings
    #[arg(short, long, env = "MINIMA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Plan to run (repeatable; default: all)
    #[arg(short, long = "plan", value_name = "NAME")]
    pub plans: Vec<String>,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    #[serde(flatten)]
    report: &'a ExperimentReport,
    summary: PlanSummary,
}

#[derive(Serialize)]
struct SweepOutput<'a> {
    reports: Vec<ReportOutput<'a>>,
    overall: OverallSummary,
}

/// Execute the sweep command.
pub fn execute(args: SweepArgs, out: Output) -> Result<()> {
    let config = match &args.config {
        Some(path) => LabConfig::from_file(path)?,
        None => LabConfig::default(),
    };

    let available = config.plans();
    let plans: Vec<ExperimentPlan> = if args.plans.is_empty() {
        available
    } else {
        args.plans
            .iter()
            .map(|name| find_plan(&available, name).cloned())
            .collect::<Result<_, _>>()?
    };
    if plans.is_empty() {
        return Err(CliError::NoPlans.into());
    }

    let objective = CosineBowl::default();
    let reports = run_plans(&objective, &plans, &config.classification)?;
    let overall = OverallSummary::from_reports(&reports, &config.classification);

    match out.format {
        OutputFormat::Table => {
            for report in &reports {
                out.header(&plan_title(&report.plan));
                let rows: Vec<_> = report
                    .records
                    .iter()
                    .map(|r| RecordRow::new(&report.plan.name, r))
                    .collect();
                print_output(&rows, out.format)?;
                if out.verbose_table() {
                    print_output(&plan_summary_rows(&report.plan, &report.summary()), out.format)?;
                }
            }
            out.header("Overall");
            print_output(&overall_rows(&overall), out.format)?;
        }
        OutputFormat::Json => {
            let reports = reports
                .iter()
                .map(|report| ReportOutput {
                    report,
                    summary: report.summary(),
                })
                .collect();
            print_json(&SweepOutput { reports, overall })?;
        }
        OutputFormat::Csv => {
            let rows: Vec<_> = reports
                .iter()
                .flat_map(|report| {
                    report
                        .records
                        .iter()
                        .map(move |r| RecordRow::new(&report.plan.name, r))
                })
                .collect();
            print_output(&rows, out.format)?;
        }
        OutputFormat::Minimal => {
            for report in &reports {
                println!(
                    "{} {}/{}",
                    report.plan.name,
                    report.successful().count(),
                    report.records.len()
                );
            }
        }
    }

    Ok(())
}

fn plan_title(plan: &ExperimentPlan) -> String {
    match &plan.sweep {
        Sweep::Hyperparameter { start, .. } => format!(
            "{}: {} sweep for {} from {}",
            plan.name,
            plan.method.hyperparameter_symbol(),
            plan.method,
            fmt_point(start)
        ),
        Sweep::InitialPoints { hyperparameter, .. } => format!(
            "{}: start-point sweep for {} ({} = {})",
            plan.name,
            plan.method,
            plan.method.hyperparameter_symbol(),
            hyperparameter
        ),
    }
}

/// Labels a cell by whatever the plan varies.
fn cell_label(plan: &ExperimentPlan, cell: &Cell) -> String {
    match plan.sweep {
        Sweep::Hyperparameter { .. } => format!(
            "{} = {} ({} iterations)",
            plan.method.hyperparameter_symbol(),
            cell.hyperparameter,
            cell.iterations
        ),
        Sweep::InitialPoints { .. } => {
            format!("{} ({} iterations)", fmt_point(&cell.start), cell.iterations)
        }
    }
}

fn plan_summary_rows(plan: &ExperimentPlan, summary: &PlanSummary) -> Vec<KeyValue> {
    let mut rows = vec![KeyValue::new(
        "Successful",
        format!("{}/{}", summary.successes, summary.total),
    )];
    if let Some(best) = &summary.best {
        rows.push(KeyValue::new("Fastest", cell_label(plan, best)));
    }
    if let Some(worst) = &summary.worst {
        rows.push(KeyValue::new("Slowest", cell_label(plan, worst)));
    }
    let point_sweep = matches!(plan.sweep, Sweep::InitialPoints { .. });
    if let Some((lo, hi)) = summary.fast_range.filter(|_| !point_sweep) {
        rows.push(KeyValue::new(
            format!("Fast {} range", plan.method.hyperparameter_symbol()),
            format!("[{}, {}]", lo, hi),
        ));
    }
    if let Some(stats) = &summary.iterations {
        rows.push(KeyValue::new(
            "Iterations",
            format!("{:.1} ± {:.1}", stats.mean, stats.std_dev),
        ));
    }
    if let Some(d) = summary.mean_distance {
        rows.push(KeyValue::from_f64("Mean distance", d, 2));
    }
    if !point_sweep {
        return rows;
    }
    if let Some(near) = &summary.near {
        rows.push(KeyValue::new(
            "Near starts",
            format!("{} ({:.1} iterations)", near.count, near.mean_iterations),
        ));
    }
    if let Some(far) = &summary.far {
        rows.push(KeyValue::new(
            "Far starts",
            format!("{} ({:.1} iterations)", far.count, far.mean_iterations),
        ));
    }
    rows
}

fn overall_rows(overall: &OverallSummary) -> Vec<KeyValue> {
    let mut rows = vec![
        KeyValue::new("Runs", overall.total.to_string()),
        KeyValue::new("Successful", overall.successes.to_string()),
        KeyValue::new("Success rate", format!("{:.1}%", overall.success_rate * 100.0)),
    ];
    if let Some(stats) = &overall.iterations {
        rows.push(KeyValue::from_f64("Mean iterations", stats.mean, 1));
        rows.push(KeyValue::new(
            "Iteration range",
            format!("{}-{}", stats.min, stats.max),
        ));
    }
    if let Some(err) = overall.mean_abs_error {
        rows.push(KeyValue::from_sci("Mean |f - 0.18|", err));
    }
    if let Some(pct) = overall.precision_pct {
        rows.push(KeyValue::new("Precision", format!("{:.4}%", pct)));
    }
    rows
}
