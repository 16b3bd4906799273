//! Hypervolume approximation: Monte-Carlo (`DZ2019-MC`) and
//! quasi-Monte-Carlo (`DZ2019-HW`) estimators sharing the same underlying
//! statistic, plus the 2D-only `whv_hype` sampler (weighted, see
//! [`crate::whv`]).

use crate::rng::{halton_weyl, Mt19937};
use ndarray::{ArrayView2, Axis};

fn gamma(x: f64) -> f64 {
    // Lanczos approximation, sufficient precision for the half-integer and
    // integer arguments `hv_approx` calls this with (`d/2 + 1`).
    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        std::f64::consts::PI / ((std::f64::consts::PI * x).sin() * gamma(1.0 - x))
    } else {
        let x = x - 1.0;
        let mut a = COEFFS[0];
        let t = x + G + 0.5;
        for (i, &c) in COEFFS.iter().enumerate().skip(1) {
            a += c / (x + i as f64);
        }
        (2.0 * std::f64::consts::PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * a
    }
}

/// `c_d = pi^(d/2) / (2^d * Gamma(d/2 + 1))`, the volume of the positive
/// orthant of the unit `d`-ball, used by both estimators.
fn c_d(d: usize) -> f64 {
    let d = d as f64;
    std::f64::consts::PI.powf(d / 2.0) / (2f64.powf(d) * gamma(d / 2.0 + 1.0))
}

/// For each sample direction `w` (a unit vector in the non-negative
/// orthant), `s(w) = max_x min_i max(0, (ref_i - x_i) / w_i)`.
fn sample_statistic(data: &[Vec<f64>], w: &[f64]) -> f64 {
    data.iter()
        .map(|x| {
            x.iter()
                .zip(w)
                .map(|(&xi, &wi)| {
                    if wi == 0.0 {
                        if xi > 0.0 {
                            f64::INFINITY
                        } else {
                            0.0
                        }
                    } else {
                        (xi / wi).max(0.0)
                    }
                })
                .fold(f64::INFINITY, f64::min)
        })
        .fold(0.0, f64::max)
}

/// Shared estimator: `hv ~ c_d * mean_k(s_k^d)`, fed `nsamples` unit weight
/// vectors `w_k` from `sample_directions`.
fn estimate(data: &[Vec<f64>], d: usize, nsamples: usize, mut next_w: impl FnMut() -> Vec<f64>) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut acc = 0.0;
    for _ in 0..nsamples {
        let w = next_w();
        let s = sample_statistic(data, &w);
        acc += s.powi(d as i32);
    }
    c_d(d) * (acc / nsamples as f64)
}

fn shifted_and_filtered(x: ArrayView2<f64>, reference: &[f64]) -> Vec<Vec<f64>> {
    x.axis_iter(Axis(0))
        .map(|row| {
            reference
                .iter()
                .zip(row.iter())
                .map(|(&r, &xi)| r - xi)
                .collect::<Vec<f64>>()
        })
        .filter(|row: &Vec<f64>| row.iter().all(|&v| v > 0.0))
        .collect()
}

/// Monte-Carlo hypervolume approximation (`DZ2019-MC`, this):
/// direction vectors are drawn by normalising `|N(0,1)^d|`.
#[must_use]
pub fn hv_approx_mc(x: ArrayView2<f64>, reference: &[f64], nsamples: usize, seed: u32) -> f64 {
    let d = reference.len();
    let data = shifted_and_filtered(x, reference);
    let mut rng = Mt19937::new(seed);
    estimate(&data, d, nsamples, move || {
        let mut w: Vec<f64> = (0..d).map(|_| rng.next_normal().abs()).collect();
        let norm = w.iter().map(|v| v * v).sum::<f64>().sqrt();
        for v in &mut w {
            *v /= norm;
        }
        w
    })
}

/// Quasi-Monte-Carlo hypervolume approximation (`DZ2019-HW`, this):
/// direction vectors come from a Halton-Weyl sequence, normalised the same
/// way; fully deterministic given `d` and `nsamples`.
#[must_use]
pub fn hv_approx_hw(x: ArrayView2<f64>, reference: &[f64], nsamples: usize) -> f64 {
    let d = reference.len();
    let data = shifted_and_filtered(x, reference);
    let mut i = 0u64;
    estimate(&data, d, nsamples, move || {
        // Map the [0,1)^d Halton-Weyl point to a direction in the positive
        // orthant of the unit sphere via the inverse-normal-CDF trick is
        // unnecessary here: we only need *some* deterministic low-discrepancy
        // cover of directions, so treat the point itself as an unnormalised
        // ray and normalise it.
        let h = halton_weyl(d, i);
        i += 1;
        let norm = h.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm == 0.0 {
            vec![1.0 / (d as f64).sqrt(); d]
        } else {
            h.iter().map(|v| v / norm).collect()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mc_approximation_is_close_to_exact_for_simple_case() {
        let x = array![[5.0, 5.0], [4.0, 6.0], [2.0, 7.0], [7.0, 4.0]];
        let approx = hv_approx_mc(x.view(), &[10.0, 10.0], 200_000, 42);
        assert!((approx - 38.0).abs() / 38.0 < 0.02);
    }

    #[test]
    fn hw_approximation_is_close_to_exact_for_simple_case() {
        let x = array![[5.0, 5.0], [4.0, 6.0], [2.0, 7.0], [7.0, 4.0]];
        let approx = hv_approx_hw(x.view(), &[10.0, 10.0], 50_000);
        assert!((approx - 38.0).abs() / 38.0 < 0.02);
    }

    #[test]
    fn mc_approximation_is_deterministic_given_seed() {
        let x = array![[5.0, 5.0], [4.0, 6.0], [2.0, 7.0], [7.0, 4.0]];
        let a = hv_approx_mc(x.view(), &[10.0, 10.0], 1_000, 7);
        let b = hv_approx_mc(x.view(), &[10.0, 10.0], 1_000, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn gamma_matches_known_values() {
        assert!((gamma(1.0) - 1.0).abs() < 1e-9);
        assert!((gamma(0.5) - std::f64::consts::PI.sqrt()).abs() < 1e-9);
        assert!((gamma(5.0) - 24.0).abs() < 1e-6);
    }
}
