//! Unary quality indicators: IGD, IGD+, average Hausdorff distance,
//! additive/multiplicative epsilon, and column normalisation.

use crate::error::MooError;
use ndarray::{Array2, ArrayView2, Axis};

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Dominated-direction distance used by IGD+: only the coordinates where
/// `x` is worse than `r` (under minimisation, `x_i > r_i`) contribute.
fn dominated_direction_distance(x: &[f64], r: &[f64]) -> f64 {
    x.iter()
        .zip(r)
        .map(|(&xi, &ri)| (xi - ri).max(0.0).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn mean_nearest<F>(from: ArrayView2<f64>, to: ArrayView2<f64>, dist: F) -> f64
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    let n = from.nrows();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = from
        .axis_iter(Axis(0))
        .map(|p| {
            to.axis_iter(Axis(0))
                .map(|q| dist(p.as_slice().unwrap(), q.as_slice().unwrap()))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    sum / n as f64
}

/// `igd(X, R) = mean_{r in R} min_{x in X} ||x - r||_2`.
#[must_use]
pub fn igd(x: ArrayView2<f64>, r: ArrayView2<f64>) -> f64 {
    mean_nearest(r, x, euclidean)
}

/// `igd_plus(X, R) = mean_{r in R} min_{x in X} d+(x, r)`.
#[must_use]
pub fn igd_plus(x: ArrayView2<f64>, r: ArrayView2<f64>) -> f64 {
    mean_nearest(r, x, |from_r, to_x| {
        dominated_direction_distance(to_x, from_r)
    })
}

/// `mean-p(v) = (mean |v_i|^p)^(1/p)`.
fn mean_p(values: &[f64], p: f64) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|v| v.abs().powf(p)).sum();
    (sum / n as f64).powf(1.0 / p)
}

/// `avg_hausdorff_dist(X, R, p) = max(mean-p(d(x,R)), mean-p(d(r,X)))`.
#[must_use]
pub fn avg_hausdorff_dist(x: ArrayView2<f64>, r: ArrayView2<f64>, p: f64) -> f64 {
    let d_x_to_r: Vec<f64> = x
        .axis_iter(Axis(0))
        .map(|p1| {
            r.axis_iter(Axis(0))
                .map(|q| euclidean(p1.as_slice().unwrap(), q.as_slice().unwrap()))
                .fold(f64::INFINITY, f64::min)
        })
        .collect();
    let d_r_to_x: Vec<f64> = r
        .axis_iter(Axis(0))
        .map(|q| {
            x.axis_iter(Axis(0))
                .map(|p1| euclidean(q.as_slice().unwrap(), p1.as_slice().unwrap()))
                .fold(f64::INFINITY, f64::min)
        })
        .collect();
    mean_p(&d_x_to_r, p).max(mean_p(&d_r_to_x, p))
}

/// `epsilon_additive(X, R) = max_{r in R} min_{x in X} max_i (x_i - r_i)`.
#[must_use]
pub fn epsilon_additive(x: ArrayView2<f64>, r: ArrayView2<f64>) -> f64 {
    r.axis_iter(Axis(0))
        .map(|rr| {
            x.axis_iter(Axis(0))
                .map(|xx| {
                    xx.iter()
                        .zip(rr.iter())
                        .map(|(&xi, &ri)| xi - ri)
                        .fold(f64::NEG_INFINITY, f64::max)
                })
                .fold(f64::INFINITY, f64::min)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

/// `epsilon_mult(X, R) = max_{r in R} min_{x in X} max_i (x_i / r_i)`.
/// Requires strictly positive inputs.
pub fn epsilon_mult(x: ArrayView2<f64>, r: ArrayView2<f64>) -> Result<f64, MooError> {
    if x.iter().any(|&v| v <= 0.0) || r.iter().any(|&v| v <= 0.0) {
        return Err(MooError::InvalidValue(
            "epsilon_mult requires strictly positive inputs".to_string(),
        ));
    }
    Ok(r.axis_iter(Axis(0))
        .map(|rr| {
            x.axis_iter(Axis(0))
                .map(|xx| {
                    xx.iter()
                        .zip(rr.iter())
                        .map(|(&xi, &ri)| xi / ri)
                        .fold(f64::NEG_INFINITY, f64::max)
                })
                .fold(f64::INFINITY, f64::min)
        })
        .fold(f64::NEG_INFINITY, f64::max))
}

/// Affine per-column normalisation to `to_range`, writing `data` in place
/// (the one documented exception to "engines never mutate caller input").
/// Uses `lower`/`upper` bounds if given, else the per-column min/max of
/// `data`; a maximised column gets its mapped range swapped.
pub fn normalise(
    data: &mut Array2<f64>,
    to_range: (f64, f64),
    lower: Option<&[f64]>,
    upper: Option<&[f64]>,
    maximise: &[bool],
) -> Result<(), MooError> {
    let ncols = data.ncols();
    if maximise.len() != ncols {
        return Err(MooError::InvalidShape(format!(
            "maximise has {} entries, expected {ncols}",
            maximise.len()
        )));
    }

    for col in 0..ncols {
        let column = data.column(col);
        let lo = lower.map_or_else(
            || column.iter().cloned().fold(f64::INFINITY, f64::min),
            |l| l[col],
        );
        let hi = upper.map_or_else(
            || column.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            |u| u[col],
        );
        let (target_lo, target_hi) = if maximise[col] {
            (to_range.1, to_range.0)
        } else {
            (to_range.0, to_range.1)
        };
        let span = hi - lo;
        for v in data.column_mut(col).iter_mut() {
            *v = if span == 0.0 {
                target_lo
            } else {
                target_lo + (*v - lo) * (target_hi - target_lo) / span
            };
        }
    }
    Ok(())
}
