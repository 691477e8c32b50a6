//! Integration tests running the built-in plans end to end.
//!
//! The expected outcomes are regression baselines for the cosine bowl with
//! the default coefficients and stopping criteria.

use std::io::Write;

use approx::assert_relative_eq;
use minima_lab::summary::FAST_ITERATIONS;
use minima_lab::{find_plan, run_plan, run_plans, ExperimentPlan, LabConfig, OverallSummary};
use minima_math::classification::{ClassificationConfig, ConvergenceClassification};
use minima_math::objective::CosineBowl;
use minima_math::optimization::Termination;
use minima_math::Point;

fn run(plan: &ExperimentPlan) -> minima_lab::ExperimentReport {
    run_plan(&CosineBowl::default(), plan, &ClassificationConfig::default()).unwrap()
}

// =============================================================================
// HYPERPARAMETER SWEEPS
// =============================================================================

#[test]
fn step_size_sweep_baseline() {
    let report = run(&ExperimentPlan::step_size_sweep());
    assert_eq!(report.records.len(), 7);

    let by_alpha = |alpha: f64| {
        report
            .records
            .iter()
            .find(|r| r.hyperparameter == alpha)
            .unwrap()
    };

    // α = 0.5 jumps from (1, 1) straight onto the origin.
    let jump = by_alpha(0.5);
    assert_eq!(jump.iterations, 2);
    assert_eq!(jump.classification, ConvergenceClassification::GlobalMinimum);

    // α = 0.1 settles in the local basin next to (0.275, 0.222).
    let local = by_alpha(0.1);
    assert!(local.converged);
    assert_eq!(local.classification, ConvergenceClassification::LocalMinimum);
    assert_relative_eq!(local.value, 0.3289, epsilon = 1e-4);

    // Oscillating step sizes exhaust the budget away from the target.
    for alpha in [0.15, 0.2, 0.3] {
        let record = by_alpha(alpha);
        assert_eq!(record.termination, Termination::MaxIterations, "alpha = {alpha}");
        assert!(!record.successful, "alpha = {alpha}");
        assert!(record.speed.is_none());
    }

    let summary = report.summary();
    assert_eq!(summary.successes, 4);
    assert_eq!(summary.best.unwrap().hyperparameter, 0.5);
    assert_eq!(summary.worst.unwrap().hyperparameter, 0.01);
    assert_eq!(summary.fast_range, Some((0.5, 0.5)));
}

#[test]
fn radius_sweep_baseline() {
    let report = run(&ExperimentPlan::radius_sweep());

    assert_eq!(report.successful().count(), 7);
    for record in &report.records {
        assert!(record.converged, "delta = {}", record.hyperparameter);
        assert!(record.iterations < 30, "delta = {}", record.hyperparameter);
        assert!(matches!(
            record.classification,
            ConvergenceClassification::GlobalMinimum | ConvergenceClassification::LocalMinimum
        ));
    }

    let summary = report.summary();
    let iterations = summary.iterations.unwrap();
    assert!(iterations.max <= FAST_ITERATIONS);
    assert!(summary.fast_range.is_some());
}

// =============================================================================
// INITIAL-POINT SWEEPS
// =============================================================================

#[test]
fn gradient_descent_points_baseline() {
    let report = run(&ExperimentPlan::gradient_descent_points());

    assert_eq!(report.records.len(), 9);
    assert_eq!(report.successful().count(), 9);
    assert!(report.records.iter().all(|r| r.converged));

    // No start point reaches the global basin with α = 0.1.
    assert!(report
        .records
        .iter()
        .all(|r| r.classification == ConvergenceClassification::LocalMinimum));

    let summary = report.summary();
    let near = summary.near.unwrap();
    let far = summary.far.unwrap();
    assert_eq!(near.count + far.count, 9);
    // (1, 1), (-1, 1) and (0.5, -0.5) are the near starts.
    assert_eq!(near.count, 3);
}

#[test]
fn trust_region_points_baseline() {
    let report = run(&ExperimentPlan::trust_region_points());

    assert_eq!(report.successful().count(), 9);
    assert!(report.records.iter().all(|r| r.converged && r.iterations < 30));

    let from_two_two = report
        .records
        .iter()
        .find(|r| r.start == Point::new(2.0, 2.0))
        .unwrap();
    assert_eq!(from_two_two.classification, ConvergenceClassification::GlobalMinimum);
    assert_relative_eq!(from_two_two.value, 0.18, epsilon = 1e-9);
}

// =============================================================================
// WHOLE LAB
// =============================================================================

#[test]
fn overall_summary_of_builtin_plans() {
    let classification = ClassificationConfig::default();
    let reports = run_plans(
        &CosineBowl::default(),
        &ExperimentPlan::builtin(),
        &classification,
    )
    .unwrap();

    let overall = OverallSummary::from_reports(&reports, &classification);
    assert_eq!(overall.total, 32);
    assert_eq!(overall.successes, 29);
    assert_relative_eq!(overall.success_rate, 29.0 / 32.0);

    let iterations = overall.iterations.unwrap();
    assert_eq!(iterations.min, 2);
    // α = 0.01 from (1, 1) is the slowest successful cell.
    assert!((140..=160).contains(&iterations.max));
    assert!(overall.mean_abs_error.unwrap() > 0.0);
}

#[test]
fn report_serializes_to_json() {
    let report = run(&ExperimentPlan::radius_sweep());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["plan"]["method"], "trust_region");
    assert_eq!(json["plan"]["sweep"]["kind"], "hyperparameter");
    assert_eq!(json["records"].as_array().unwrap().len(), 7);
    assert_eq!(json["records"][0]["termination"], "converged");

    let back: minima_lab::ExperimentReport = serde_json::from_value(json).unwrap();
    assert_eq!(back.plan, report.plan);
    assert_eq!(back.records.len(), report.records.len());
}

#[test]
fn runs_are_reproducible() {
    let plan = ExperimentPlan::gradient_descent_points();
    assert_eq!(run(&plan), run(&plan));
}

#[test]
fn config_file_drives_plans() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[classification]
tolerance = 0.5

[[plan]]
name = "wide-radius"
method = "trust_region"
max_iterations = 200

[plan.sweep]
kind = "initial_points"
hyperparameter = 2.0
points = [{{ x = 1.0, y = 1.0 }}, {{ x = -3.0, y = 0.5 }}]
"#
    )
    .unwrap();

    let config = LabConfig::from_file(file.path()).unwrap();
    let plans = config.plans();
    let plan = find_plan(&plans, "wide-radius").unwrap();
    assert_eq!(plan.max_iterations, 200);

    let report = run_plan(&CosineBowl::default(), plan, &config.classification).unwrap();
    assert_eq!(report.records.len(), 2);
    for record in report.records.iter().filter(|r| r.converged) {
        let expected = if (record.value - 0.18).abs() < 0.5 {
            ConvergenceClassification::GlobalMinimum
        } else {
            ConvergenceClassification::LocalMinimum
        };
        assert_eq!(record.classification, expected);
    }
}

#[test]
fn builtin_config_template_round_trips() {
    let rendered = LabConfig::builtin().to_toml().unwrap();
    let parsed = LabConfig::from_toml(&rendered).unwrap();
    assert_eq!(parsed.plans(), ExperimentPlan::builtin());
}
