//! Uniform sampling of nondominated sets on standard manifolds:
//! simplex, concave/convex sphere orthants, and convex-simplex, with
//! optional integer quantisation.

use crate::dominance::dominates;
use crate::error::MooError;
use crate::rng::Mt19937;
use ndarray::Array2;

/// Sampling method for [`generate_ndset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manifold {
    /// Standard `d-1` simplex (linear front, `sum x_i = 1`).
    Simplex,
    /// Positive orthant of the unit sphere (`sum x_i^2 = 1`), a concave front.
    ConcaveSphere,
    /// `1 - concave_sphere`: the same sphere, reflected into a convex front.
    ConvexSphere,
    /// Simplex points passed through a coordinatewise square, a convex front.
    ConvexSimplex,
}

fn sample_simplex(d: usize, rng: &mut Mt19937) -> Vec<f64> {
    let mut cuts: Vec<f64> = (0..d - 1).map(|_| rng.next_f64()).collect();
    cuts.push(0.0);
    cuts.push(1.0);
    cuts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    (0..d).map(|i| cuts[i + 1] - cuts[i]).collect()
}

fn sample_concave_sphere(d: usize, rng: &mut Mt19937) -> Vec<f64> {
    let raw: Vec<f64> = (0..d).map(|_| rng.next_normal().abs()).collect();
    let norm = raw.iter().map(|v| v * v).sum::<f64>().sqrt();
    raw.iter().map(|v| v / norm).collect()
}

fn sample_point(d: usize, method: Manifold, rng: &mut Mt19937) -> Vec<f64> {
    match method {
        Manifold::Simplex => sample_simplex(d, rng),
        Manifold::ConcaveSphere => sample_concave_sphere(d, rng),
        Manifold::ConvexSphere => sample_concave_sphere(d, rng).iter().map(|v| 1.0 - v).collect(),
        Manifold::ConvexSimplex => sample_simplex(d, rng).iter().map(|v| v * v).collect(),
    }
}

/// Whether `candidate` can join `accepted` while keeping the whole set a
/// mutual-antichain with no duplicates.
fn compatible(candidate: &[f64], accepted: &[Vec<f64>]) -> bool {
    accepted.iter().all(|p| {
        p != candidate && !dominates(p, candidate) && !dominates(candidate, p)
    })
}

const QUANT_MAX: f64 = 2_147_483_647.0; // 2^31 - 1

fn quantise(p: &[f64]) -> Vec<f64> {
    p.iter().map(|&v| (v * QUANT_MAX).round()).collect()
}

/// `generate_ndset(n, d, method, seed, integer)`: `n`
/// distinct, mutually nondominated points in `[0,1]^d` (or their integer
/// quantisation into `{0, ..., 2^31-1}`), resampling on any collision that
/// would violate distinctness or nondominance.
///
/// # Panics
/// Panics if resampling cannot find a valid point within a generous retry
/// budget — in practice only reachable by requesting more points than the
/// manifold can support in the given dimension.
pub fn generate_ndset(
    n: usize,
    d: usize,
    method: Manifold,
    seed: u32,
    integer: bool,
) -> Result<Array2<f64>, MooError> {
    if d < 2 {
        return Err(MooError::InvalidShape("generate_ndset requires d >= 2".to_string()));
    }
    let mut rng = Mt19937::new(seed);
    let mut accepted: Vec<Vec<f64>> = Vec::with_capacity(n);
    let mut quantised: Vec<Vec<f64>> = Vec::with_capacity(n);

    let max_attempts = (n + 16) * 10_000;
    let mut attempts = 0;
    while accepted.len() < n {
        attempts += 1;
        if attempts > max_attempts {
            return Err(MooError::Unsupported(format!(
                "could not sample {n} mutually nondominated points in {d}D within the retry budget"
            )));
        }
        let candidate = sample_point(d, method, &mut rng);
        let to_check = if integer { quantise(&candidate) } else { candidate.clone() };
        let pool = if integer { &quantised } else { &accepted };
        if compatible(&to_check, pool) {
            accepted.push(candidate);
            quantised.push(to_check);
        }
    }

    let source = if integer { &quantised } else { &accepted };
    let mut arr = Array2::<f64>::zeros((n, d));
    for (i, row) in source.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            arr[[i, j]] = v;
        }
    }
    Ok(arr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dominance::is_nondominated;

    #[test]
    fn simplex_points_are_mutually_nondominated_and_sum_to_one() {
        let points = generate_ndset(20, 3, Manifold::Simplex, 1, false).unwrap();
        assert_eq!(points.nrows(), 20);
        for row in points.rows() {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
        assert!(is_nondominated(points.view(), false).iter().all(|&b| b));
    }

    #[test]
    fn concave_sphere_points_lie_on_unit_sphere() {
        let points = generate_ndset(15, 2, Manifold::ConcaveSphere, 2, false).unwrap();
        for row in points.rows() {
            let sum_sq: f64 = row.iter().map(|v| v * v).sum();
            assert!((sum_sq - 1.0).abs() < 1e-9);
        }
        assert!(is_nondominated(points.view(), false).iter().all(|&b| b));
    }

    #[test]
    fn convex_sphere_is_reflection_of_concave() {
        let points = generate_ndset(15, 2, Manifold::ConvexSphere, 2, false).unwrap();
        assert!(is_nondominated(points.view(), false).iter().all(|&b| b));
        for row in points.rows() {
            for &v in row.iter() {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn convex_simplex_points_are_distinct_and_nondominated() {
        let points = generate_ndset(15, 4, Manifold::ConvexSimplex, 3, false).unwrap();
        assert!(is_nondominated(points.view(), false).iter().all(|&b| b));
    }

    #[test]
    fn integer_quantisation_stays_in_range_and_distinct() {
        let points = generate_ndset(10, 2, Manifold::Simplex, 5, true).unwrap();
        let mut seen = std::collections::HashSet::new();
        for row in points.rows() {
            for &v in row.iter() {
                assert!((0.0..=2_147_483_647.0).contains(&v));
                assert_eq!(v, v.round());
            }
            assert!(seen.insert(row.to_vec().iter().map(|v| v.to_bits()).collect::<Vec<_>>()));
        }
    }

    #[test]
    fn is_deterministic_given_seed() {
        let a = generate_ndset(10, 2, Manifold::Simplex, 42, false).unwrap();
        let b = generate_ndset(10, 2, Manifold::Simplex, 42, false).unwrap();
        assert_eq!(a, b);
    }
}
