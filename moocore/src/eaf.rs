//! Empirical Attainment Function engine: 2D sweep, a slab extension to
//! 3D, and `eafdiff` (with an optional rectangle decomposition) used by
//! [`crate::whv::largest_eafdiff`].

use crate::avl::Avl;
use crate::error::MooError;
use ndarray::{Array2, ArrayView2, Axis};

/// One level of an EAF: the attainment-`percentile` staircase, as a matrix
/// of vertices in the same dimensionality as the input sets.
#[derive(Debug, Clone)]
pub struct EafLevel {
    /// Percentage of sets required to attain this surface, in `(0, 100]`.
    pub percentile: f64,
    /// Staircase vertices, `n x d`.
    pub points: Array2<f64>,
}

/// A weighted axis-aligned rectangle, `(lo, hi, weight)`, as used by
/// `eafdiff(rectangles=true)` and [`crate::whv`]. `hi` may hold `f64::INFINITY`
/// for an open top/right side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// Lower-left corner.
    pub lo: [f64; 2],
    /// Upper-right corner (components may be `f64::INFINITY`).
    pub hi: [f64; 2],
    /// Colour/weight of this cell.
    pub weight: f64,
}

/// Default percentiles `{i * 100/k : i = 1..=k}` for `k` input sets.
fn default_percentiles(k: usize) -> Vec<f64> {
    (1..=k).map(|i| i as f64 * 100.0 / k as f64).collect()
}

/// 2D EAF sweep: merge all `(x, y, set_id)` triples, sweep by
/// `x` ascending, and maintain one AVL handle per set holding its running
/// minimum `y`. The order statistics of the current handle set are the
/// level boundaries at this `x`.
fn eaf_2d(sets: &[ArrayView2<f64>], percentiles: &[f64]) -> Vec<EafLevel> {
    let k = sets.len();
    let levels: Vec<usize> = percentiles
        .iter()
        .map(|&p| ((p * k as f64 / 100.0).ceil() as usize).clamp(1, k))
        .collect();

    let mut entries: Vec<(f64, f64, usize)> = Vec::new();
    for (s, set) in sets.iter().enumerate() {
        for row in set.axis_iter(Axis(0)) {
            entries.push((row[0], row[1], s));
        }
    }
    entries.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let mut handles: Vec<Option<crate::avl::Handle>> = vec![None; k];
    let mut tree: Avl<f64, usize> = Avl::new();
    let mut last_y: Vec<Option<f64>> = vec![None; levels.len()];
    let mut out: Vec<Vec<[f64; 2]>> = vec![Vec::new(); levels.len()];

    let mut i = 0;
    while i < entries.len() {
        let x = entries[i].0;
        let mut j = i;
        while j < entries.len() && entries[j].0 == x {
            let (_, y, s) = entries[j];
            let current = handles[s].map_or(f64::INFINITY, |h| *tree.key(h));
            if y < current {
                if let Some(h) = handles[s].take() {
                    tree.delete(h);
                }
                handles[s] = Some(tree.insert(y, s));
            }
            j += 1;
        }
        for (li, &t) in levels.iter().enumerate() {
            if tree.len() >= t {
                let y = *tree.key(tree.select(t - 1).unwrap());
                if last_y[li] != Some(y) {
                    out[li].push([x, y]);
                    last_y[li] = Some(y);
                }
            }
        }
        i = j;
    }

    percentiles
        .iter()
        .zip(out)
        .map(|(&percentile, pts)| {
            let mut arr = Array2::<f64>::zeros((pts.len(), 2));
            for (r, p) in pts.iter().enumerate() {
                arr[[r, 0]] = p[0];
                arr[[r, 1]] = p[1];
            }
            EafLevel { percentile, points: arr }
        })
        .collect()
}

/// Naive `O(n^2)`-ish slab extension to 3D: sweep `z` ascending, accumulating
/// each set's points seen so far into its own 2D pool, and recompute the
/// full 2D EAF of the cumulative pools at every distinct `z`. Unlike the
/// incrementally-maintained Fonseca-Paquete 3D sweep this repeats work
/// across slabs, but stays correct and reuses [`eaf_2d`] directly.
fn eaf_3d(sets: &[ArrayView2<f64>], percentiles: &[f64]) -> Vec<EafLevel> {
    let k = sets.len();
    let mut zs: Vec<f64> = sets
        .iter()
        .flat_map(|s| s.column(2).to_vec())
        .collect();
    zs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    zs.dedup();

    let mut pools: Vec<Vec<[f64; 2]>> = vec![Vec::new(); k];
    let mut out: Vec<Vec<[f64; 3]>> = vec![Vec::new(); percentiles.len()];
    let mut last_slice: Vec<Vec<[f64; 2]>> = vec![Vec::new(); percentiles.len()];

    for &z in &zs {
        for (s, set) in sets.iter().enumerate() {
            for row in set.axis_iter(Axis(0)) {
                if row[2] == z {
                    pools[s].push([row[0], row[1]]);
                }
            }
        }
        let views: Vec<Array2<f64>> = pools
            .iter()
            .map(|p| {
                let mut a = Array2::<f64>::zeros((p.len(), 2));
                for (r, q) in p.iter().enumerate() {
                    a[[r, 0]] = q[0];
                    a[[r, 1]] = q[1];
                }
                a
            })
            .collect();
        let view_refs: Vec<ArrayView2<f64>> = views.iter().map(|v| v.view()).collect();
        let levels = eaf_2d(&view_refs, percentiles);
        for (li, level) in levels.iter().enumerate() {
            let slice: Vec<[f64; 2]> = level
                .points
                .axis_iter(Axis(0))
                .map(|r| [r[0], r[1]])
                .collect();
            if slice != last_slice[li] {
                for p in &slice {
                    out[li].push([p[0], p[1], z]);
                }
                last_slice[li] = slice;
            }
        }
    }

    percentiles
        .iter()
        .zip(out)
        .map(|(&percentile, pts)| {
            let mut arr = Array2::<f64>::zeros((pts.len(), 3));
            for (r, p) in pts.iter().enumerate() {
                arr[[r, 0]] = p[0];
                arr[[r, 1]] = p[1];
                arr[[r, 2]] = p[2];
            }
            EafLevel { percentile, points: arr }
        })
        .collect()
}

/// Empirical attainment function of `sets` at `percentiles` (defaults
/// to `{i*100/k}` for `i=1..=k` when `None`). Supports `d in {2, 3}` only.
pub fn eaf(sets: &[ArrayView2<f64>], percentiles: Option<&[f64]>) -> Result<Vec<EafLevel>, MooError> {
    let k = sets.len();
    if k == 0 {
        return Err(MooError::InvalidShape("eaf requires at least one set".to_string()));
    }
    let d = sets[0].ncols();
    if sets.iter().any(|s| s.ncols() != d) {
        return Err(MooError::InvalidShape("all sets must share dimension".to_string()));
    }
    let owned;
    let percentiles = match percentiles {
        Some(p) => p,
        None => {
            owned = default_percentiles(k);
            &owned
        }
    };
    match d {
        2 => Ok(eaf_2d(sets, percentiles)),
        3 => Ok(eaf_3d(sets, percentiles)),
        _ => Err(MooError::Unsupported(format!("eaf not supported for d={d}"))),
    }
}

/// For 2D sets `a` and `b`, the per-`x`-slab order statistics of the
/// combined per-set running minima, tagged by origin. Returns `(x, sorted
/// ascending (y, is_from_a))`.
fn combined_order_stats(a: &[ArrayView2<f64>], b: &[ArrayView2<f64>]) -> Vec<(f64, Vec<(f64, bool)>)> {
    let ka = a.len();
    let kb = b.len();
    let mut entries: Vec<(f64, f64, usize, bool)> = Vec::new();
    for (s, set) in a.iter().enumerate() {
        for row in set.axis_iter(Axis(0)) {
            entries.push((row[0], row[1], s, true));
        }
    }
    for (s, set) in b.iter().enumerate() {
        for row in set.axis_iter(Axis(0)) {
            entries.push((row[0], row[1], s, false));
        }
    }
    entries.sort_by(|p, q| p.0.partial_cmp(&q.0).unwrap());

    let mut min_a = vec![f64::INFINITY; ka];
    let mut min_b = vec![f64::INFINITY; kb];
    let mut out = Vec::new();
    let mut i = 0;
    while i < entries.len() {
        let x = entries[i].0;
        let mut j = i;
        while j < entries.len() && entries[j].0 == x {
            let (_, y, s, is_a) = entries[j];
            if is_a {
                min_a[s] = min_a[s].min(y);
            } else {
                min_b[s] = min_b[s].min(y);
            }
            j += 1;
        }
        let mut combined: Vec<(f64, bool)> = min_a
            .iter()
            .filter(|&&v| v.is_finite())
            .map(|&v| (v, true))
            .chain(min_b.iter().filter(|&&v| v.is_finite()).map(|&v| (v, false)))
            .collect();
        combined.sort_by(|p, q| p.0.partial_cmp(&q.0).unwrap());
        out.push((x, combined));
        i = j;
    }
    out
}

/// `eafdiff(A, B)`: colour of each staircase cell is
/// `#sets_from_A_attaining - #sets_from_B_attaining`, scaled to `intervals`
/// out of `|A| + |B|`. With `rectangles=true`, emits axis-aligned rectangles
/// (open on the top when a cell is the topmost in its `x`-slab); otherwise
/// returns one representative point per non-zero cell.
pub fn eafdiff(
    a: &[ArrayView2<f64>],
    b: &[ArrayView2<f64>],
    intervals: usize,
    rectangles: bool,
) -> Result<Vec<Rectangle>, MooError> {
    if a.iter().chain(b).any(|s| s.ncols() != 2) {
        return Err(MooError::Unsupported("eafdiff supports d=2 only".to_string()));
    }
    let total = (a.len() + b.len()) as f64;
    let slabs = combined_order_stats(a, b);

    let mut rects = Vec::new();
    for (idx, (x, combined)) in slabs.iter().enumerate() {
        let next_x = slabs.get(idx + 1).map_or(f64::INFINITY, |s| s.0);

        // Group entries sharing the same y so that ties between A and B
        // contribute to the same cell instead of splitting it in two.
        let mut groups: Vec<(f64, usize, usize)> = Vec::new();
        for &(y, is_a) in combined {
            match groups.last_mut() {
                Some((gy, ga, gb)) if *gy == y => {
                    if is_a {
                        *ga += 1;
                    } else {
                        *gb += 1;
                    }
                }
                _ => groups.push((y, usize::from(is_a), usize::from(!is_a))),
            }
        }

        let mut a_count = 0usize;
        let mut b_count = 0usize;
        let mut lo_y = f64::NEG_INFINITY;
        for (pos, &(y, ga, gb)) in groups.iter().enumerate() {
            a_count += ga;
            b_count += gb;
            let hi_y = if pos + 1 < groups.len() {
                groups[pos + 1].0
            } else {
                f64::INFINITY
            };
            let colour = (a_count as f64 - b_count as f64) * intervals as f64 / total;
            if colour != 0.0 {
                rects.push(Rectangle {
                    lo: [*x, lo_y],
                    hi: [next_x, hi_y],
                    weight: colour,
                });
            }
            lo_y = y;
        }
    }

    if !rectangles {
        // Point representation: one representative corner per cell.
        for r in &mut rects {
            r.hi = r.lo;
        }
    }
    Ok(rects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn two_set_levels_match_hand_derivation() {
        let a = array![[1.0, 5.0], [4.0, 2.0]];
        let b = array![[2.0, 3.0], [5.0, 1.0]];
        let levels = eaf(&[a.view(), b.view()], None).unwrap();
        assert_eq!(levels.len(), 2);

        let level1 = &levels[0];
        assert_eq!(level1.percentile, 50.0);
        assert_eq!(
            level1.points,
            array![[1.0, 5.0], [2.0, 3.0], [4.0, 2.0], [5.0, 1.0]]
        );

        let level2 = &levels[1];
        assert_eq!(level2.percentile, 100.0);
        assert_eq!(level2.points, array![[2.0, 5.0], [4.0, 3.0], [5.0, 2.0]]);
    }

    #[test]
    fn level_100_percent_is_subset_of_each_set_front() {
        let a = array![[1.0, 5.0], [4.0, 2.0]];
        let b = array![[2.0, 3.0], [5.0, 1.0]];
        let levels = eaf(&[a.view(), b.view()], Some(&[100.0])).unwrap();
        assert_eq!(levels.len(), 1);
        assert!(!levels[0].points.is_empty());
    }

    #[test]
    fn eaf_rejects_mismatched_dimensions() {
        let a = array![[1.0, 5.0]];
        let b = array![[1.0, 5.0, 3.0]];
        assert!(matches!(
            eaf(&[a.view(), b.view()], None),
            Err(MooError::InvalidShape(_))
        ));
    }

    #[test]
    fn eaf_unsupported_beyond_3d() {
        let a = array![[1.0, 2.0, 3.0, 4.0]];
        assert!(matches!(eaf(&[a.view()], None), Err(MooError::Unsupported(_))));
    }

    #[test]
    fn eafdiff_is_antisymmetric() {
        let a = array![[1.0, 5.0], [4.0, 2.0]];
        let b = array![[2.0, 3.0], [5.0, 1.0]];
        let ab = eafdiff(&[a.view()], &[b.view()], 2, true).unwrap();
        let ba = eafdiff(&[b.view()], &[a.view()], 2, true).unwrap();
        let sum_ab: f64 = ab.iter().map(|r| r.weight).sum();
        let sum_ba: f64 = ba.iter().map(|r| r.weight).sum();
        assert!((sum_ab + sum_ba).abs() < 1e-9);
    }

    #[test]
    fn eafdiff_of_identical_inputs_is_zero() {
        let a = array![[1.0, 5.0], [4.0, 2.0]];
        let diff = eafdiff(&[a.view()], &[a.view()], 1, true).unwrap();
        assert!(diff.is_empty());
    }
}
