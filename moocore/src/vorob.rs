//! Vorob'ev threshold / expectation / deviation, derived from the EAF
//! by equating EAF-level hypervolume to the mean hypervolume over the input
//! sets.

use crate::eaf::eaf;
use crate::error::MooError;
use crate::hv::hypervolume;
use ndarray::{Array2, ArrayView2};

/// Result of [`vorob_t`].
#[derive(Debug, Clone)]
pub struct VorobT {
    /// The bisected attainment percentile `c in [0, 100]`.
    pub threshold: f64,
    /// The Vorob'ev expectation: the EAF level-`threshold` surface's interior.
    pub ve: Array2<f64>,
    /// The mean hypervolume across input sets (`H_bar`).
    pub avg_hyp: f64,
}

/// `vorob_t(data, ref)`: bisect the attainment percentile `c`
/// so that `hv(EAF(data, c), ref) ~= avg_hyp`. Bisection stops when two
/// successive candidate hypervolumes are equal (the EAF is a step function
/// of `c`, so exact equality, not just convergence, is reachable).
pub fn vorob_t(data: &[ArrayView2<f64>], reference: &[f64]) -> Result<VorobT, MooError> {
    if data.is_empty() {
        return Err(MooError::InvalidShape("vorob_t requires at least one set".to_string()));
    }
    let avg_hyp = data.iter().map(|s| hypervolume(*s, reference)).sum::<f64>() / data.len() as f64;

    let mut lo = 0.0f64;
    let mut hi = 100.0f64;
    let mut best = eaf_at(data, lo)?;
    let mut best_hv = hypervolume(best.view(), reference);
    let mut prev_hv = f64::NAN;

    for _ in 0..64 {
        let mid = (lo + hi) / 2.0;
        let candidate = eaf_at(data, mid)?;
        let hv = hypervolume(candidate.view(), reference);
        if hv == prev_hv {
            best = candidate;
            best_hv = hv;
            break;
        }
        prev_hv = hv;
        if hv < avg_hyp {
            lo = mid;
        } else {
            hi = mid;
            best = candidate;
            best_hv = hv;
        }
    }
    let _ = best_hv;

    Ok(VorobT {
        threshold: lo,
        ve: best,
        avg_hyp,
    })
}

fn eaf_at(data: &[ArrayView2<f64>], percentile: f64) -> Result<Array2<f64>, MooError> {
    let clamped = percentile.clamp(100.0 / data.len() as f64 / 2.0, 100.0);
    let levels = eaf(data, Some(&[clamped]))?;
    Ok(levels.into_iter().next().unwrap().points)
}

/// `vorob_dev(data, ref, ve)`: hypervolume of the symmetric
/// difference between the Vorob'ev expectation `ve` and each input set,
/// approximated as `2*mean_s hv(ve U X_s, ref) - mean_s hv(X_s, ref) - hv(ve, ref)`.
pub fn vorob_dev(data: &[ArrayView2<f64>], reference: &[f64], ve: ArrayView2<f64>) -> Result<f64, MooError> {
    if data.is_empty() {
        return Err(MooError::InvalidShape("vorob_dev requires at least one set".to_string()));
    }
    let d = reference.len();
    let n = data.len() as f64;

    let mean_union_hv: f64 = data
        .iter()
        .map(|s| {
            let mut rows: Vec<f64> = ve.iter().copied().collect();
            rows.extend(s.iter().copied());
            let arr = Array2::from_shape_vec((ve.nrows() + s.nrows(), d), rows).unwrap();
            hypervolume(arr.view(), reference)
        })
        .sum::<f64>()
        / n;
    let mean_hv: f64 = data.iter().map(|s| hypervolume(*s, reference)).sum::<f64>() / n;
    let ve_hv = hypervolume(ve, reference);

    Ok(2.0 * mean_union_hv - mean_hv - ve_hv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn vorob_t_threshold_is_within_bounds() {
        let a = array![[1.0, 5.0], [4.0, 2.0]];
        let b = array![[2.0, 3.0], [5.0, 1.0]];
        let c = array![[1.5, 4.0], [3.0, 1.5]];
        let reference = [10.0, 10.0];
        let result = vorob_t(&[a.view(), b.view(), c.view()], &reference).unwrap();
        assert!((0.0..=100.0).contains(&result.threshold));
        assert!(result.avg_hyp > 0.0);
    }

    #[test]
    fn vorob_dev_of_identical_sets_is_near_zero() {
        let a = array![[1.0, 5.0], [4.0, 2.0]];
        let reference = [10.0, 10.0];
        let result = vorob_t(&[a.view(), a.view(), a.view()], &reference).unwrap();
        let dev = vorob_dev(&[a.view(), a.view(), a.view()], &reference, result.ve.view()).unwrap();
        assert!(dev.abs() < 1e-6);
    }

    #[test]
    fn vorob_t_rejects_empty_data() {
        let reference = [10.0, 10.0];
        assert!(matches!(
            vorob_t(&[], &reference),
            Err(MooError::InvalidShape(_))
        ));
    }
}
