//! Aggregate statistics over experiment reports.
//!
//! All statistics are computed over successful records only; a report with
//! no successes yields `None` for every statistic.

use minima_math::classification::ClassificationConfig;
use minima_math::Point;
use serde::{Deserialize, Serialize};

use crate::plan::Method;
use crate::runner::{ExperimentRecord, ExperimentReport};

/// Cells with at most this many iterations count towards the fast range.
pub const FAST_ITERATIONS: u32 = 20;

/// Start points closer than this to the origin count as near.
pub const NEAR_DISTANCE: f64 = 1.5;

/// Mean, population standard deviation and range of iteration counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest count.
    pub min: u32,
    /// Largest count.
    pub max: u32,
}

impl IterationStats {
    /// Statistics of `iterations`, or `None` if empty.
    #[must_use]
    pub fn from_iterations<I>(iterations: I) -> Option<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let values: Vec<u32> = iterations.into_iter().collect();
        let min = *values.iter().min()?;
        let max = *values.iter().max()?;

        let n = values.len() as f64;
        let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
        let variance = values
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            count: values.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }
}

/// A single highlighted cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Start point.
    pub start: Point,
    /// α or Δ₀.
    pub hyperparameter: f64,
    /// Iterations consumed.
    pub iterations: u32,
}

impl From<&ExperimentRecord> for Cell {
    fn from(record: &ExperimentRecord) -> Self {
        Self {
            start: record.start,
            hyperparameter: record.hyperparameter,
            iterations: record.iterations,
        }
    }
}

/// Count and mean iterations of a group of start points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityGroup {
    /// Number of successful start points in the group.
    pub count: usize,
    /// Mean iterations over the group.
    pub mean_iterations: f64,
}

impl ProximityGroup {
    fn from_records<'a>(records: impl Iterator<Item = &'a ExperimentRecord>) -> Option<Self> {
        let stats = IterationStats::from_iterations(records.map(|r| r.iterations))?;
        Some(Self {
            count: stats.count,
            mean_iterations: stats.mean,
        })
    }
}

/// Analysis of one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Plan name.
    pub plan: String,
    /// Method of the plan.
    pub method: Method,
    /// Number of cells.
    pub total: usize,
    /// Number of successful cells.
    pub successes: usize,
    /// Successful cell with the fewest iterations (first on ties).
    pub best: Option<Cell>,
    /// Successful cell with the most iterations (first on ties).
    pub worst: Option<Cell>,
    /// Hyperparameter range of successful cells within [`FAST_ITERATIONS`].
    pub fast_range: Option<(f64, f64)>,
    /// Iteration statistics of successful cells.
    pub iterations: Option<IterationStats>,
    /// Mean start distance of successful cells.
    pub mean_distance: Option<f64>,
    /// Successful cells starting within [`NEAR_DISTANCE`].
    pub near: Option<ProximityGroup>,
    /// Successful cells starting at or beyond [`NEAR_DISTANCE`].
    pub far: Option<ProximityGroup>,
}

impl PlanSummary {
    /// Summarizes a report.
    #[must_use]
    pub fn from_report(report: &ExperimentReport) -> Self {
        let successful: Vec<&ExperimentRecord> = report.successful().collect();

        let mut best: Option<&ExperimentRecord> = None;
        let mut worst: Option<&ExperimentRecord> = None;
        for &record in &successful {
            if best.map_or(true, |b| record.iterations < b.iterations) {
                best = Some(record);
            }
            if worst.map_or(true, |w| record.iterations > w.iterations) {
                worst = Some(record);
            }
        }

        let fast_range = successful
            .iter()
            .filter(|r| r.iterations <= FAST_ITERATIONS)
            .map(|r| r.hyperparameter)
            .fold(None, |range: Option<(f64, f64)>, h| match range {
                None => Some((h, h)),
                Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
            });

        let mean_distance = (!successful.is_empty()).then(|| {
            successful.iter().map(|r| r.distance).sum::<f64>() / successful.len() as f64
        });

        Self {
            plan: report.plan.name.clone(),
            method: report.plan.method,
            total: report.records.len(),
            successes: successful.len(),
            best: best.map(Cell::from),
            worst: worst.map(Cell::from),
            fast_range,
            iterations: IterationStats::from_iterations(successful.iter().map(|r| r.iterations)),
            mean_distance,
            near: ProximityGroup::from_records(
                successful.iter().copied().filter(|r| r.distance < NEAR_DISTANCE),
            ),
            far: ProximityGroup::from_records(
                successful.iter().copied().filter(|r| r.distance >= NEAR_DISTANCE),
            ),
        }
    }
}

/// Statistics across several reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    /// Number of cells run.
    pub total: usize,
    /// Number of successful cells.
    pub successes: usize,
    /// `successes / total`, zero when nothing ran.
    pub success_rate: f64,
    /// Iteration statistics of successful cells.
    pub iterations: Option<IterationStats>,
    /// Mean of `|error|` over successful cells.
    pub mean_abs_error: Option<f64>,
    /// `100 · (1 − mean_abs_error / target)`, the accuracy relative to the target value.
    pub precision_pct: Option<f64>,
}

impl OverallSummary {
    /// Summarizes all records of `reports`.
    #[must_use]
    pub fn from_reports(reports: &[ExperimentReport], classification: &ClassificationConfig) -> Self {
        let total: usize = reports.iter().map(|r| r.records.len()).sum();
        let successful: Vec<&ExperimentRecord> =
            reports.iter().flat_map(|r| r.successful()).collect();
        let successes = successful.len();

        let mean_abs_error = (successes > 0).then(|| {
            successful.iter().map(|r| r.error.abs()).sum::<f64>() / successes as f64
        });
        let precision_pct = mean_abs_error
            .filter(|_| classification.target != 0.0)
            .map(|e| 100.0 * (1.0 - e / classification.target));

        Self {
            total,
            successes,
            success_rate: if total == 0 {
                0.0
            } else {
                successes as f64 / total as f64
            },
            iterations: IterationStats::from_iterations(successful.iter().map(|r| r.iterations)),
            mean_abs_error,
            precision_pct,
        }
    }
}
