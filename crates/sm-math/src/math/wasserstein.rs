//! One-dimensional Wasserstein (earth mover's) distance.
//!
//! # Mathematical Foundation
//!
//! For two empirical distributions U and V on the real line:
//!
//! ```text
//! W_1(U, V) = ∫ |F_U(x) - F_V(x)| dx
//! ```
//!
//! Both CDFs are step functions, so the integral is exact: merge the sorted
//! support points and sum `|F_U - F_V| * Δx` over consecutive gaps. This works for
//! unequal sample sizes without quantile interpolation.
//!
//! # Example
//!
//! ```rust
//! use sm_math::wasserstein_distance;
//!
//! let observed = [1.0, 2.0, 3.0];
//! let shifted = [2.0, 3.0, 4.0];
//! assert!((wasserstein_distance(&observed, &shifted) - 1.0).abs() < 1e-12);
//! ```

use serde::Serialize;

/// Why a distance could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceError {
    /// One of the inputs has no observations.
    EmptyDistribution,
    /// An input contains NaN or an infinity.
    NonFinite,
}

impl std::fmt::Display for DistanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceError::EmptyDistribution => write!(f, "empty distribution"),
            DistanceError::NonFinite => write!(f, "non-finite observation"),
        }
    }
}

impl std::error::Error for DistanceError {}

/// Exact W1 distance between two empirical samples.
///
/// Returns NaN if either input is empty or contains a non-finite value; use
/// [`try_wasserstein_distance`] to get the reason.
pub fn wasserstein_distance(u: &[f64], v: &[f64]) -> f64 {
    try_wasserstein_distance(u, v).unwrap_or(f64::NAN)
}

/// Exact W1 distance, reporting invalid input.
pub fn try_wasserstein_distance(u: &[f64], v: &[f64]) -> Result<f64, DistanceError> {
    if u.is_empty() || v.is_empty() {
        return Err(DistanceError::EmptyDistribution);
    }
    if u.iter().chain(v.iter()).any(|x| !x.is_finite()) {
        return Err(DistanceError::NonFinite);
    }

    let mut u_sorted = u.to_vec();
    let mut v_sorted = v.to_vec();
    u_sorted.sort_by(|a, b| a.total_cmp(b));
    v_sorted.sort_by(|a, b| a.total_cmp(b));

    Ok(cdf_l1(&u_sorted, &v_sorted))
}

/// L1 distance between the step CDFs of two sorted, non-empty samples.
fn cdf_l1(u: &[f64], v: &[f64]) -> f64 {
    let n_u = u.len() as f64;
    let n_v = v.len() as f64;

    // i, j count the points <= the current position in each sample.
    let (mut i, mut j) = (0usize, 0usize);
    let mut prev = u[0].min(v[0]);
    let mut total = 0.0;

    while i < u.len() || j < v.len() {
        let next = match (u.get(i), v.get(j)) {
            (Some(&a), Some(&b)) => a.min(b),
            (Some(&a), None) => a,
            (None, Some(&b)) => b,
            (None, None) => break,
        };

        let gap = next - prev;
        if gap > 0.0 {
            let f_u = i as f64 / n_u;
            let f_v = j as f64 / n_v;
            total += (f_u - f_v).abs() * gap;
        }

        while i < u.len() && u[i] <= next {
            i += 1;
        }
        while j < v.len() && v[j] <= next {
            j += 1;
        }
        prev = next;
    }

    total
}
