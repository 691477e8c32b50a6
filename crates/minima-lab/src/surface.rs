//! Regular-grid samples of an objective, for plotting elsewhere.

use minima_math::objective::Objective;
use minima_math::Point;
use serde::{Deserialize, Serialize};

use crate::error::{LabError, LabResult};

/// Default sampling range on both axes.
pub const DEFAULT_RANGE: (f64, f64) = (-1.0, 1.0);

/// Objective values on a `resolution × resolution` grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGrid {
    /// Sample abscissae, ascending.
    pub xs: Vec<f64>,
    /// Sample ordinates, ascending.
    pub ys: Vec<f64>,
    /// `values[j][i] = f(xs[i], ys[j])`.
    pub values: Vec<Vec<f64>>,
}

fn linspace(range: (f64, f64), n: usize) -> Vec<f64> {
    let (lo, hi) = range;
    let step = (hi - lo) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
        .collect()
}

fn check_range(axis: &str, (lo, hi): (f64, f64)) -> LabResult<()> {
    if lo.is_finite() && hi.is_finite() && lo < hi {
        Ok(())
    } else {
        Err(LabError::InvalidGrid(format!(
            "{axis} range [{lo}, {hi}] must be finite and increasing"
        )))
    }
}

impl SurfaceGrid {
    /// Samples `objective` on evenly spaced points including both ends.
    pub fn sample<O>(
        objective: &O,
        x_range: (f64, f64),
        y_range: (f64, f64),
        resolution: usize,
    ) -> LabResult<Self>
    where
        O: Objective + ?Sized,
    {
        if resolution < 2 {
            return Err(LabError::InvalidGrid(format!(
                "resolution {resolution} must be at least 2"
            )));
        }
        check_range("x", x_range)?;
        check_range("y", y_range)?;

        let xs = linspace(x_range, resolution);
        let ys = linspace(y_range, resolution);
        let values = ys
            .iter()
            .map(|&y| xs.iter().map(|&x| objective.value(Point::new(x, y))).collect())
            .collect();

        Ok(Self { xs, ys, values })
    }

    /// All samples as `(x, y, f)` in row-major order.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.ys.iter().zip(&self.values).flat_map(move |(&y, row)| {
            self.xs.iter().zip(row).map(move |(&x, &f)| (x, y, f))
        })
    }

    /// The sample with the smallest value.
    #[must_use]
    pub fn minimum(&self) -> Option<(f64, f64, f64)> {
        self.samples()
            .filter(|(_, _, f)| !f.is_nan())
            .min_by(|a, b| a.2.total_cmp(&b.2))
    }
}
