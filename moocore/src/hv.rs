//! Exact hypervolume engine: HV in 1D (trivial), 2D (direct sweep), and
//! `d >= 3` via recursive slicing (fix the last coordinate, sort, recurse on
//! the `d-1` sub-problem per unique value). The `d == 3`/`d == 4` cases
//! funnel through the same recursion as `d >= 5`, bottoming out at the 2D
//! sweep; see DESIGN.md for why one recursive algorithm stands in for the
//! separately-named "HV3D+"/"HV4D+" incremental variants found elsewhere.
//! Dominance reduction at each recursion level goes through
//! [`crate::dominance::filter_dominated`], whose 3D case uses the AVL-based
//! staircase sweep.

use crate::dominance::filter_dominated;
use ndarray::{Array2, ArrayView2, Axis};

fn strictly_dominates_ref(row: &[f64], reference: &[f64]) -> bool {
    row.iter().zip(reference).all(|(&x, &r)| x < r)
}

fn to_array(rows: &[Vec<f64>], ncols: usize) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((rows.len(), ncols));
    for (i, row) in rows.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            arr[[i, j]] = v;
        }
    }
    arr
}

/// Hypervolume of a set already known to be mutually non-dominated and
/// duplicate-free (a valid Pareto front), with respect to `reference`.
fn hv_of_front(front: ArrayView2<f64>, reference: &[f64]) -> f64 {
    let d = front.ncols();
    if front.nrows() == 0 {
        return 0.0;
    }
    match d {
        1 => {
            let min_x = front.column(0).iter().cloned().fold(f64::INFINITY, f64::min);
            (reference[0] - min_x).max(0.0)
        }
        2 => hv_2d_sweep(front, reference),
        _ => hv_recursive_slice(front, reference),
    }
}

/// Direct `O(n log n)` sweep for the 2D case: sort ascending by `x0` (the
/// front is then necessarily descending in `x1`) and sum slab rectangles.
fn hv_2d_sweep(front: ArrayView2<f64>, reference: &[f64]) -> f64 {
    let mut rows: Vec<(f64, f64)> = front
        .axis_iter(Axis(0))
        .map(|r| (r[0], r[1]))
        .collect();
    rows.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let mut total = 0.0;
    for i in 0..rows.len() {
        let (x0, x1) = rows[i];
        let next_x0 = if i + 1 < rows.len() {
            rows[i + 1].0
        } else {
            reference[0]
        };
        total += (next_x0 - x0) * (reference[1] - x1);
    }
    total
}

/// `d >= 3`: sweep along the last coordinate, accumulating the `d-1`
/// sub-problem's nondominated front slab by slab.
fn hv_recursive_slice(front: ArrayView2<f64>, reference: &[f64]) -> f64 {
    let d = front.ncols();
    let mut rows: Vec<Vec<f64>> = front.axis_iter(Axis(0)).map(|r| r.to_vec()).collect();
    rows.sort_by(|a, b| a[d - 1].partial_cmp(&b[d - 1]).unwrap());

    let mut total = 0.0;
    let mut active: Vec<Vec<f64>> = Vec::new();
    let mut i = 0;
    while i < rows.len() {
        let z = rows[i][d - 1];
        let mut j = i;
        while j < rows.len() && rows[j][d - 1] == z {
            active.push(rows[j][..d - 1].to_vec());
            j += 1;
        }

        let active_arr = to_array(&active, d - 1);
        let reduced = filter_dominated(active_arr.view(), false);
        let sub_ref = &reference[..d - 1];
        let slab_hv = hv_of_front(reduced.view(), sub_ref);

        let next_z = if j < rows.len() {
            rows[j][d - 1]
        } else {
            reference[d - 1]
        };
        total += slab_hv * (next_z - z);
        i = j;
    }
    total
}

/// Hypervolume indicator: the Lebesgue measure of the region dominated
/// by `x` and dominating `reference`, assuming minimisation.
///
/// # Panics
/// Panics if any row of `x` does not have `reference.len()` columns.
#[must_use]
pub fn hypervolume(x: ArrayView2<f64>, reference: &[f64]) -> f64 {
    assert_eq!(x.ncols(), reference.len());
    let contributing: Vec<Vec<f64>> = x
        .axis_iter(Axis(0))
        .filter(|row| strictly_dominates_ref(row.as_slice().unwrap(), reference))
        .map(|row| row.to_vec())
        .collect();
    if contributing.is_empty() {
        return 0.0;
    }
    let arr = to_array(&contributing, reference.len());
    let front = filter_dominated(arr.view(), false);
    let hv = hv_of_front(front.view(), reference);
    if hv.is_nan() {
        f64::INFINITY
    } else {
        hv
    }
}

/// Individual hypervolume contributions: `hv(X) - hv(X \ {x_i})` for
/// every non-dominated, duplicate-free `x_i`; dominated or duplicated points
/// get exactly `0`. Naive `O(n * hv(n-1))`, acceptable 
#[must_use]
pub fn hv_contributions(x: ArrayView2<f64>, reference: &[f64]) -> Vec<f64> {
    let n = x.nrows();
    let unique_mask = crate::dominance::is_nondominated(x, false);
    let total = hypervolume(x, reference);

    let mut out = vec![0.0; n];
    for i in 0..n {
        if !unique_mask[i] {
            continue;
        }
        let rest: Vec<usize> = (0..n).filter(|&j| j != i).collect();
        let without_i = x.select(Axis(0), &rest);
        out[i] = total - hypervolume(without_i.view(), reference);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn s1_hypervolume() {
        let x = array![[5.0, 5.0], [4.0, 6.0], [2.0, 7.0], [7.0, 4.0]];
        assert_eq!(hypervolume(x.view(), &[10.0, 10.0]), 38.0);
    }

    #[test]
    fn s2_hv_contributions() {
        let x = array![[5.0, 5.0], [4.0, 6.0], [2.0, 7.0], [7.0, 4.0]];
        let c = hv_contributions(x.view(), &[10.0, 10.0]);
        assert_eq!(c, vec![2.0, 1.0, 6.0, 3.0]);
    }

    #[test]
    fn hv_is_zero_without_dominating_points() {
        let x = array![[10.0, 10.0], [11.0, 5.0]];
        assert_eq!(hypervolume(x.view(), &[10.0, 10.0]), 0.0);
    }

    #[test]
    fn hv_is_permutation_invariant() {
        let x = array![[5.0, 5.0], [4.0, 6.0], [2.0, 7.0], [7.0, 4.0]];
        let perm = array![[7.0, 4.0], [2.0, 7.0], [5.0, 5.0], [4.0, 6.0]];
        assert_eq!(
            hypervolume(x.view(), &[10.0, 10.0]),
            hypervolume(perm.view(), &[10.0, 10.0])
        );
    }

    #[test]
    fn hv_is_monotone_when_adding_points() {
        let x = array![[5.0, 5.0], [4.0, 6.0]];
        let y = array![[5.0, 5.0], [4.0, 6.0], [3.0, 3.0]];
        let ref_ = [10.0, 10.0];
        assert!(hypervolume(y.view(), &ref_) >= hypervolume(x.view(), &ref_));
    }

    #[test]
    fn duplicates_and_dominated_points_are_safe() {
        let ref_ = [10.0, 10.0];
        let x = array![[5.0, 5.0], [4.0, 6.0], [2.0, 7.0], [7.0, 4.0]];
        let with_dup = array![
            [5.0, 5.0],
            [4.0, 6.0],
            [2.0, 7.0],
            [7.0, 4.0],
            [5.0, 5.0],
            [9.0, 9.0]
        ];
        assert_eq!(
            hypervolume(x.view(), &ref_),
            hypervolume(with_dup.view(), &ref_)
        );
    }

    #[test]
    fn hv_3d_matches_brute_force_union_of_boxes() {
        // Two points in 3D with a known overlap.
        let x = array![[1.0, 1.0, 1.0], [2.0, 2.0, 0.5]];
        let reference = [3.0, 3.0, 3.0];
        // box1 = [1,3]x[1,3]x[1,3] volume 8; box2 = [2,3]x[2,3]x[0.5,3] volume 1*1*2.5=2.5
        // overlap = [2,3]x[2,3]x[1,3] = 1*1*2 = 2
        // union = 8 + 2.5 - 2 = 8.5
        assert!((hypervolume(x.view(), &reference) - 8.5).abs() < 1e-9);
    }

    #[test]
    fn hv_4d_is_consistent_with_contributions_for_extreme_points() {
        // Orthogonal extreme points in 4D: contributions should sum less than
        // or equal to total hv, and each alone should reproduce a box volume.
        let x = array![
            [1.0, 5.0, 5.0, 5.0],
            [5.0, 1.0, 5.0, 5.0],
            [5.0, 5.0, 1.0, 5.0],
            [5.0, 5.0, 5.0, 1.0],
        ];
        let reference = [10.0, 10.0, 10.0, 10.0];
        let hv = hypervolume(x.view(), &reference);
        let single = array![[1.0, 5.0, 5.0, 5.0]];
        let single_hv = hypervolume(single.view(), &reference);
        assert!((single_hv - 9.0 * 5.0 * 5.0 * 5.0).abs() < 1e-9);
        assert!(hv >= single_hv);
    }
}
