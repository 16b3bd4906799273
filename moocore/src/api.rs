//! Public API surface: shape/finiteness validation, maximisation
//! folding onto a caller-owned copy, dispatch to the relevant engine, and
//! error translation. No function here mutates its inputs,
//! except [`normalise`], the one documented exception.

use crate::dominance;
use crate::eaf::{self, EafLevel, Rectangle};
use crate::error::MooError;
use crate::hv;
use crate::hv_approx;
use crate::indicators;
use crate::manifold::{self, Manifold};
use crate::vorob::{self, VorobT};
use crate::whv::{self, WeightDistribution};
use ndarray::{Array2, ArrayView2, Axis};

/// Per-column orientation, mirroring `_moocore.py`'s `maximise` parameter:
/// either a single bool broadcast to every column, or an explicit per-column
/// list (the Python side also accepts a 0/1 array, which is the same thing
/// spelled with integers instead of bools).
#[derive(Debug, Clone)]
pub enum Maximise {
    /// Same orientation for every column.
    All(bool),
    /// Explicit per-column orientation; length must equal the data's arity.
    PerColumn(Vec<bool>),
}

fn validate_shape(x: ArrayView2<f64>, d: usize) -> Result<(), MooError> {
    if x.ncols() != d {
        return Err(MooError::InvalidShape(format!(
            "expected {d} columns, got {}",
            x.ncols()
        )));
    }
    Ok(())
}

fn validate_finite(x: ArrayView2<f64>) -> Result<(), MooError> {
    if x.iter().any(|v| !v.is_finite()) {
        return Err(MooError::InvalidValue("input contains non-finite values".to_string()));
    }
    Ok(())
}

/// Resolve a [`Maximise`] into a per-column mask of length `d`, broadcasting
/// `All` and validating the length of `PerColumn`.
fn resolve_maximise(maximise: Option<&Maximise>, d: usize) -> Result<Option<Vec<bool>>, MooError> {
    match maximise {
        None => Ok(None),
        Some(Maximise::All(b)) => Ok(Some(vec![*b; d])),
        Some(Maximise::PerColumn(mask)) => {
            if mask.len() != d {
                return Err(MooError::InvalidShape(format!(
                    "maximise mask has {} entries, expected {d}",
                    mask.len()
                )));
            }
            Ok(Some(mask.clone()))
        }
    }
}

/// Copy `x` with maximised columns sign-flipped, leaving `x` untouched.
fn fold_maximise(x: ArrayView2<f64>, maximise: Option<&[bool]>) -> Array2<f64> {
    let mut copy = x.to_owned();
    if let Some(mask) = maximise {
        for (col, &is_max) in mask.iter().enumerate() {
            if is_max {
                for v in copy.column_mut(col) {
                    *v = -*v;
                }
            }
        }
    }
    copy
}

fn fold_reference(reference: &[f64], maximise: Option<&[bool]>) -> Vec<f64> {
    match maximise {
        Some(mask) => reference
            .iter()
            .zip(mask)
            .map(|(&r, &is_max)| if is_max { -r } else { r })
            .collect(),
        None => reference.to_vec(),
    }
}

/// Hypervolume indicator, see [`crate::hv::hypervolume`].
pub fn hypervolume(
    x: ArrayView2<f64>,
    reference: &[f64],
    maximise: Option<&Maximise>,
) -> Result<f64, MooError> {
    let d = reference.len();
    validate_shape(x, d)?;
    validate_finite(x)?;
    let mask = resolve_maximise(maximise, d)?;
    let folded = fold_maximise(x, mask.as_deref());
    let folded_ref = fold_reference(reference, mask.as_deref());
    Ok(hv::hypervolume(folded.view(), &folded_ref))
}

/// Per-point hypervolume contributions, see [`crate::hv::hv_contributions`].
pub fn hv_contributions(
    x: ArrayView2<f64>,
    reference: &[f64],
    maximise: Option<&Maximise>,
) -> Result<Vec<f64>, MooError> {
    let d = reference.len();
    validate_shape(x, d)?;
    validate_finite(x)?;
    let mask = resolve_maximise(maximise, d)?;
    let folded = fold_maximise(x, mask.as_deref());
    let folded_ref = fold_reference(reference, mask.as_deref());
    Ok(hv::hv_contributions(folded.view(), &folded_ref))
}

/// Monte-Carlo hypervolume approximation, see [`crate::hv_approx::hv_approx_mc`].
pub fn hv_approx_mc(
    x: ArrayView2<f64>,
    reference: &[f64],
    nsamples: usize,
    seed: u32,
    maximise: Option<&Maximise>,
) -> Result<f64, MooError> {
    let d = reference.len();
    validate_shape(x, d)?;
    validate_finite(x)?;
    let mask = resolve_maximise(maximise, d)?;
    let folded = fold_maximise(x, mask.as_deref());
    let folded_ref = fold_reference(reference, mask.as_deref());
    Ok(hv_approx::hv_approx_mc(folded.view(), &folded_ref, nsamples, seed))
}

/// Quasi-Monte-Carlo hypervolume approximation, see [`crate::hv_approx::hv_approx_hw`].
pub fn hv_approx_hw(
    x: ArrayView2<f64>,
    reference: &[f64],
    nsamples: usize,
    maximise: Option<&Maximise>,
) -> Result<f64, MooError> {
    let d = reference.len();
    validate_shape(x, d)?;
    validate_finite(x)?;
    let mask = resolve_maximise(maximise, d)?;
    let folded = fold_maximise(x, mask.as_deref());
    let folded_ref = fold_reference(reference, mask.as_deref());
    Ok(hv_approx::hv_approx_hw(folded.view(), &folded_ref, nsamples))
}

/// Nondominated-point mask, see [`crate::dominance::is_nondominated`].
pub fn is_nondominated(
    x: ArrayView2<f64>,
    keep_weakly: bool,
    maximise: Option<&Maximise>,
) -> Result<Vec<bool>, MooError> {
    validate_finite(x)?;
    let mask = resolve_maximise(maximise, x.ncols())?;
    let folded = fold_maximise(x, mask.as_deref());
    Ok(dominance::is_nondominated(folded.view(), keep_weakly))
}

/// Rows surviving [`is_nondominated`], see [`crate::dominance::filter_dominated`].
pub fn filter_dominated(
    x: ArrayView2<f64>,
    keep_weakly: bool,
    maximise: Option<&Maximise>,
) -> Result<Array2<f64>, MooError> {
    let mask = is_nondominated(x, keep_weakly, maximise)?;
    let keep: Vec<usize> = mask.iter().enumerate().filter_map(|(i, &b)| b.then_some(i)).collect();
    Ok(x.select(Axis(0), &keep))
}

/// Pareto rank assignment, see [`crate::dominance::pareto_rank`].
pub fn pareto_rank(x: ArrayView2<f64>, maximise: Option<&Maximise>) -> Result<Vec<i32>, MooError> {
    validate_finite(x)?;
    let mask = resolve_maximise(maximise, x.ncols())?;
    let folded = fold_maximise(x, mask.as_deref());
    Ok(dominance::pareto_rank(folded.view()))
}

/// Inverted generational distance, see [`crate::indicators::igd`].
pub fn igd(x: ArrayView2<f64>, r: ArrayView2<f64>, maximise: Option<&Maximise>) -> Result<f64, MooError> {
    validate_finite(x)?;
    validate_finite(r)?;
    if x.ncols() != r.ncols() {
        return Err(MooError::InvalidShape("x and r must share dimension".to_string()));
    }
    let mask = resolve_maximise(maximise, x.ncols())?;
    let fx = fold_maximise(x, mask.as_deref());
    let fr = fold_maximise(r, mask.as_deref());
    Ok(indicators::igd(fx.view(), fr.view()))
}

/// IGD+ indicator, see [`crate::indicators::igd_plus`].
pub fn igd_plus(x: ArrayView2<f64>, r: ArrayView2<f64>, maximise: Option<&Maximise>) -> Result<f64, MooError> {
    validate_finite(x)?;
    validate_finite(r)?;
    if x.ncols() != r.ncols() {
        return Err(MooError::InvalidShape("x and r must share dimension".to_string()));
    }
    let mask = resolve_maximise(maximise, x.ncols())?;
    let fx = fold_maximise(x, mask.as_deref());
    let fr = fold_maximise(r, mask.as_deref());
    Ok(indicators::igd_plus(fx.view(), fr.view()))
}

/// Average Hausdorff distance, see [`crate::indicators::avg_hausdorff_dist`].
pub fn avg_hausdorff_dist(
    x: ArrayView2<f64>,
    r: ArrayView2<f64>,
    p: f64,
    maximise: Option<&Maximise>,
) -> Result<f64, MooError> {
    validate_finite(x)?;
    validate_finite(r)?;
    if x.ncols() != r.ncols() {
        return Err(MooError::InvalidShape("x and r must share dimension".to_string()));
    }
    let mask = resolve_maximise(maximise, x.ncols())?;
    let fx = fold_maximise(x, mask.as_deref());
    let fr = fold_maximise(r, mask.as_deref());
    Ok(indicators::avg_hausdorff_dist(fx.view(), fr.view(), p))
}

/// Additive epsilon indicator, see [`crate::indicators::epsilon_additive`].
pub fn epsilon_additive(
    x: ArrayView2<f64>,
    r: ArrayView2<f64>,
    maximise: Option<&Maximise>,
) -> Result<f64, MooError> {
    validate_finite(x)?;
    validate_finite(r)?;
    if x.ncols() != r.ncols() {
        return Err(MooError::InvalidShape("x and r must share dimension".to_string()));
    }
    let mask = resolve_maximise(maximise, x.ncols())?;
    let fx = fold_maximise(x, mask.as_deref());
    let fr = fold_maximise(r, mask.as_deref());
    Ok(indicators::epsilon_additive(fx.view(), fr.view()))
}

/// Multiplicative epsilon indicator, see [`crate::indicators::epsilon_mult`].
/// Does not support maximisation masks (orientation flips sign, and this
/// indicator requires strictly positive inputs).
pub fn epsilon_mult(x: ArrayView2<f64>, r: ArrayView2<f64>) -> Result<f64, MooError> {
    validate_finite(x)?;
    validate_finite(r)?;
    if x.ncols() != r.ncols() {
        return Err(MooError::InvalidShape("x and r must share dimension".to_string()));
    }
    indicators::epsilon_mult(x, r)
}

/// Affine per-column normalisation, see [`crate::indicators::normalise`]. The
/// one API-level function permitted to mutate its input in place.
pub fn normalise(
    data: &mut Array2<f64>,
    to_range: (f64, f64),
    lower: Option<&[f64]>,
    upper: Option<&[f64]>,
    maximise: &[bool],
) -> Result<(), MooError> {
    if maximise.len() != data.ncols() {
        return Err(MooError::InvalidShape(format!(
            "maximise mask has {} entries, expected {}",
            maximise.len(),
            data.ncols()
        )));
    }
    indicators::normalise(data, to_range, lower, upper, maximise)
}

/// Empirical attainment function, see [`crate::eaf::eaf`].
pub fn eaf(sets: &[ArrayView2<f64>], percentiles: Option<&[f64]>) -> Result<Vec<EafLevel>, MooError> {
    eaf::eaf(sets, percentiles)
}

/// Signed EAF difference, see [`crate::eaf::eafdiff`].
pub fn eafdiff(
    a: &[ArrayView2<f64>],
    b: &[ArrayView2<f64>],
    intervals: usize,
    rectangles: bool,
) -> Result<Vec<Rectangle>, MooError> {
    eaf::eafdiff(a, b, intervals, rectangles)
}

/// Weighted hypervolume against a fixed rectangle set, see
/// [`crate::whv::whv_rect`]. Does not support maximisation masks.
pub fn whv_rect(x: ArrayView2<f64>, rectangles: &[Rectangle], reference: &[f64]) -> Result<f64, MooError> {
    validate_finite(x)?;
    whv::whv_rect(x, rectangles, reference)
}

/// `hv(X, ref)` plus a scaled [`whv_rect`] term, see
/// [`crate::whv::total_whv_rect`]. `ideal` defaults to
/// [`crate::whv::get_ideal`] of `x` when not supplied.
pub fn total_whv_rect(
    x: ArrayView2<f64>,
    rectangles: &[Rectangle],
    reference: &[f64],
    ideal: Option<&[f64]>,
    scalefactor: f64,
) -> Result<f64, MooError> {
    validate_finite(x)?;
    whv::total_whv_rect(x, rectangles, reference, ideal, scalefactor)
}

/// HypE-style weighted hypervolume sampling, see [`crate::whv::whv_hype`].
pub fn whv_hype(
    x: ArrayView2<f64>,
    reference: &[f64],
    ideal: &[f64],
    nsamples: usize,
    seed: u32,
    dist: &WeightDistribution,
) -> Result<f64, MooError> {
    validate_finite(x)?;
    whv::whv_hype(x, reference, ideal, nsamples, seed, dist)
}

/// Most-different pair of sets by weighted EAF difference, see
/// [`crate::whv::largest_eafdiff`].
pub fn largest_eafdiff(
    sets: &[ArrayView2<f64>],
    reference: &[f64],
    intervals: usize,
    ideal: &[f64],
) -> Result<((usize, usize), f64), MooError> {
    whv::largest_eafdiff(sets, reference, intervals, ideal)
}

/// Vorob'ev threshold/expectation, see [`crate::vorob::vorob_t`].
pub fn vorob_t(data: &[ArrayView2<f64>], reference: &[f64]) -> Result<VorobT, MooError> {
    vorob::vorob_t(data, reference)
}

/// Vorob'ev deviation, see [`crate::vorob::vorob_dev`].
pub fn vorob_dev(data: &[ArrayView2<f64>], reference: &[f64], ve: ArrayView2<f64>) -> Result<f64, MooError> {
    vorob::vorob_dev(data, reference, ve)
}

/// Uniform sampling of a nondominated set, see [`crate::manifold::generate_ndset`].
pub fn generate_ndset(
    n: usize,
    d: usize,
    method: Manifold,
    seed: u32,
    integer: bool,
) -> Result<Array2<f64>, MooError> {
    manifold::generate_ndset(n, d, method, seed, integer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn hypervolume_rejects_mismatched_reference_dimension() {
        let x = array![[1.0, 2.0]];
        assert!(matches!(
            hypervolume(x.view(), &[1.0, 2.0, 3.0], None),
            Err(MooError::InvalidShape(_))
        ));
    }

    #[test]
    fn hypervolume_rejects_non_finite_input() {
        let x = array![[1.0, f64::NAN]];
        assert!(matches!(
            hypervolume(x.view(), &[10.0, 10.0], None),
            Err(MooError::InvalidValue(_))
        ));
    }

    #[test]
    fn maximise_mask_negates_columns_without_mutating_input() {
        let x = array![[1.0, 9.0], [2.0, 8.0]];
        let original = x.clone();
        let minimised = hypervolume(x.view(), &[0.0, 0.0], None).unwrap();
        let maximised =
            hypervolume(x.view(), &[10.0, 0.0], Some(&Maximise::PerColumn(vec![true, false]))).unwrap();
        assert_eq!(x, original);
        assert!(minimised >= 0.0 && maximised >= 0.0);
    }

    #[test]
    fn maximise_all_broadcasts_to_every_column() {
        let x = array![[1.0, 9.0], [2.0, 8.0]];
        let per_column =
            hypervolume(x.view(), &[10.0, 10.0], Some(&Maximise::PerColumn(vec![true, true]))).unwrap();
        let all = hypervolume(x.view(), &[10.0, 10.0], Some(&Maximise::All(true))).unwrap();
        assert!((per_column - all).abs() < 1e-9);
    }

    #[test]
    fn maximise_per_column_rejects_wrong_length() {
        let x = array![[1.0, 9.0], [2.0, 8.0]];
        assert!(matches!(
            hypervolume(x.view(), &[10.0, 10.0], Some(&Maximise::PerColumn(vec![true]))),
            Err(MooError::InvalidShape(_))
        ));
    }

    #[test]
    fn epsilon_mult_has_no_maximise_parameter_and_matches_engine() {
        let x = array![[4.0, 2.0], [3.0, 3.0], [2.0, 4.0]];
        let r = array![[10.0, 1.0], [6.0, 1.0], [2.0, 2.0], [1.0, 6.0], [1.0, 10.0]];
        assert!((epsilon_mult(x.view(), r.view()).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn generate_ndset_round_trips_through_api() {
        let points = generate_ndset(10, 2, Manifold::Simplex, 1, false).unwrap();
        assert_eq!(points.nrows(), 10);
    }
}
