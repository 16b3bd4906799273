//! Pareto dominance primitives: `is_nondominated`, `filter_dominated`,
//! `pareto_rank`, and per-set application. All of these operate on
//! already-minimisation-oriented points (orientation folding happens in the
//! public API surface).

use crate::avl::Avl;
use ndarray::{Array2, ArrayView2};
use std::collections::HashMap;

/// `a ≺ b` (minimisation): componentwise `<=` with at least one strict `<`.
#[must_use]
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    let mut strictly_less = false;
    for (&ai, &bi) in a.iter().zip(b) {
        if ai > bi {
            return false;
        }
        if ai < bi {
            strictly_less = true;
        }
    }
    strictly_less
}

/// `O(d * n^2)` pairwise dominance check, used for `d >= 4` and as the base
/// case for `d == 1`.
fn pairwise_nondominated(x: ArrayView2<f64>, keep_weakly: bool) -> Vec<bool> {
    let n = x.nrows();
    let mut nondom = vec![true; n];
    for i in 0..n {
        if !nondom[i] {
            continue;
        }
        let pi = x.row(i).to_vec();
        for j in 0..n {
            if i == j || !nondom[j] {
                continue;
            }
            let pj = x.row(j).to_vec();
            if dominates(&pj, &pi) {
                nondom[i] = false;
                break;
            }
        }
    }
    if !keep_weakly {
        drop_duplicate_representatives(x, &mut nondom);
    }
    nondom
}

/// Among points marked nondominated, keep only the first (by row order)
/// representative of each group of exactly-equal points.
fn drop_duplicate_representatives(x: ArrayView2<f64>, nondom: &mut [bool]) {
    let mut seen: Vec<Vec<u64>> = Vec::new();
    for i in 0..x.nrows() {
        if !nondom[i] {
            continue;
        }
        let key: Vec<u64> = x.row(i).iter().map(|v| v.to_bits()).collect();
        if seen.contains(&key) {
            nondom[i] = false;
        } else {
            seen.push(key);
        }
    }
}

/// `O(n log n)` sweep for 2D, sorting by `(x0, x1)` ascending and tracking
/// the running minimum `x1` seen so far.
fn sweep_2d(x: ArrayView2<f64>, keep_weakly: bool) -> Vec<bool> {
    let n = x.nrows();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        let a = (x[[i, 0]], x[[i, 1]]);
        let b = (x[[j, 0]], x[[j, 1]]);
        a.partial_cmp(&b)
            .unwrap()
            .then(i.cmp(&j))
    });

    let mut nondom = vec![false; n];
    let mut min_y = f64::INFINITY;
    let mut min_y_x0 = f64::NAN;
    for &i in &order {
        let (x0, y) = (x[[i, 0]], x[[i, 1]]);
        if y < min_y {
            nondom[i] = true;
            min_y = y;
            min_y_x0 = x0;
        } else if y == min_y && x0 == min_y_x0 {
            // Exact duplicate of the point currently defining the front.
            nondom[i] = keep_weakly;
        } else {
            nondom[i] = false;
        }
    }
    nondom
}

/// `O(n log n)` sweep for 3D: sweep along `x0` ascending, maintaining an AVL
/// "staircase" of Pareto-minimal `(x1, x2)` pairs among points processed so
/// far. Ties in `x0` are resolved by running the 2D sweep within the
/// tied group before testing the group against the staircase, since within
/// a group neither point can be dominated purely because of `x0`.
fn sweep_3d(x: ArrayView2<f64>, keep_weakly: bool) -> Vec<bool> {
    let n = x.nrows();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| x[[i, 0]].partial_cmp(&x[[j, 0]]).unwrap().then(i.cmp(&j)));

    let mut nondom = vec![false; n];
    // staircase: key = x1, value = x2; invariant x2 strictly decreases as x1 increases.
    let mut staircase: Avl<f64, f64> = Avl::new();

    let mut k = 0;
    while k < n {
        let mut j = k + 1;
        while j < n && x[[order[j], 0]] == x[[order[k], 0]] {
            j += 1;
        }
        let batch = &order[k..j];

        // 2D dominance within the tied-x0 batch.
        let batch_view: Vec<[f64; 2]> = batch
            .iter()
            .map(|&i| [x[[i, 1]], x[[i, 2]]])
            .collect();
        let mut batch_arr = Array2::<f64>::zeros((batch_view.len(), 2));
        for (r, row) in batch_view.iter().enumerate() {
            batch_arr[[r, 0]] = row[0];
            batch_arr[[r, 1]] = row[1];
        }
        let local_nondom = sweep_2d(batch_arr.view(), keep_weakly);

        for (b, &i) in batch.iter().enumerate() {
            if !local_nondom[b] {
                nondom[i] = false;
                continue;
            }
            let x1 = x[[i, 1]];
            let x2 = x[[i, 2]];
            let dominated_by_staircase = staircase
                .find_by_key(&x1)
                .or_else(|| floor_handle(&staircase, x1))
                .map(|h| *staircase.value(h) <= x2)
                .unwrap_or(false);
            nondom[i] = !dominated_by_staircase;
        }

        // Insert newly confirmed nondominated points of this batch into the staircase.
        for (b, &i) in batch.iter().enumerate() {
            if !nondom[i] {
                continue;
            }
            let x1 = x[[i, 1]];
            let x2 = x[[i, 2]];
            insert_staircase(&mut staircase, x1, x2);
            let _ = b;
        }

        k = j;
    }
    nondom
}

/// Largest key `<= target` in an ascending-by-key AVL, if any.
fn floor_handle<V>(tree: &Avl<f64, V>, target: f64) -> Option<crate::avl::Handle> {
    let mut best = None;
    let mut cur = tree.min();
    while let Some(h) = cur {
        if *tree.key(h) <= target {
            best = Some(h);
            cur = tree.next(h);
        } else {
            break;
        }
    }
    best
}

/// Insert `(x1, x2)` into the staircase, removing any now-dominated entries
/// and skipping the insert if an existing entry already dominates it.
fn insert_staircase(tree: &mut Avl<f64, f64>, x1: f64, x2: f64) {
    if let Some(h) = floor_handle(tree, x1) {
        if *tree.value(h) <= x2 {
            return; // already dominated, nothing to do
        }
    }
    // Remove successors (x1' >= x1) that are now dominated (x2' >= x2).
    let mut to_delete = Vec::new();
    let mut cur = tree.find_by_key(&x1).or_else(|| {
        // first key strictly greater than x1
        let mut c = tree.min();
        while let Some(h) = c {
            if *tree.key(h) > x1 {
                break;
            }
            c = tree.next(h);
        }
        c
    });
    while let Some(h) = cur {
        if *tree.key(h) < x1 {
            cur = tree.next(h);
            continue;
        }
        if *tree.value(h) >= x2 {
            to_delete.push(h);
            cur = tree.next(h);
        } else {
            break;
        }
    }
    for h in to_delete {
        tree.delete(h);
    }
    tree.insert(x1, x2);
}

/// Identify non-dominated points, dispatching on dimensionality to the
/// fastest available sweep.
#[must_use]
pub fn is_nondominated(x: ArrayView2<f64>, keep_weakly: bool) -> Vec<bool> {
    match x.ncols() {
        2 => sweep_2d(x, keep_weakly),
        3 => sweep_3d(x, keep_weakly),
        _ => pairwise_nondominated(x, keep_weakly),
    }
}

/// Rows of `x` where [`is_nondominated`] is `true`.
#[must_use]
pub fn filter_dominated(x: ArrayView2<f64>, keep_weakly: bool) -> Array2<f64> {
    let mask = is_nondominated(x, keep_weakly);
    let keep: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter_map(|(i, &b)| b.then_some(i))
        .collect();
    x.select(ndarray::Axis(0), &keep)
}

/// Assign each row a Pareto rank: `0` for the first front, with duplicates
/// sharing a rank. Implemented as iterated nondominated-front extraction for
/// every dimensionality (the 2D fast path and >=3D fallback are
/// behaviourally identical; see DESIGN.md).
#[must_use]
pub fn pareto_rank(x: ArrayView2<f64>) -> Vec<i32> {
    let n = x.nrows();
    let mut rank = vec![-1i32; n];
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut current_rank = 0i32;

    while !remaining.is_empty() {
        let sub = x.select(ndarray::Axis(0), &remaining);
        let mask = is_nondominated(sub.view(), true);
        let mut next_remaining = Vec::new();
        for (local_idx, &global_idx) in remaining.iter().enumerate() {
            if mask[local_idx] {
                rank[global_idx] = current_rank;
            } else {
                next_remaining.push(global_idx);
            }
        }
        remaining = next_remaining;
        current_rank += 1;
    }
    rank
}

/// Apply [`is_nondominated`] within each group of `sets`, processing groups
/// in first-occurrence order, returning a flat mask aligned
/// with the original row order.
#[must_use]
pub fn is_nondominated_within_sets<S: std::hash::Hash + Eq + Clone>(
    x: ArrayView2<f64>,
    sets: &[S],
    keep_weakly: bool,
) -> Vec<bool> {
    assert_eq!(x.nrows(), sets.len());
    let mut group_order: Vec<S> = Vec::new();
    let mut groups: HashMap<S, Vec<usize>> = HashMap::new();
    for (i, s) in sets.iter().enumerate() {
        if !groups.contains_key(s) {
            group_order.push(s.clone());
        }
        groups.entry(s.clone()).or_default().push(i);
    }

    let mut out = vec![false; x.nrows()];
    for s in &group_order {
        let idxs = &groups[s];
        let sub = x.select(ndarray::Axis(0), idxs);
        let mask = is_nondominated(sub.view(), keep_weakly);
        for (local, &global) in idxs.iter().enumerate() {
            out[global] = mask[local];
        }
    }
    out
}
