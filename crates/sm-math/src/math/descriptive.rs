//! Descriptive statistics over observation slices.
//!
//! Percentiles use linear interpolation between closest ranks
//! (`h = (n - 1) * q`), the same convention as numpy's default.

use serde::{Deserialize, Serialize};

/// Multiplier applied to the interquartile range for Tukey fences.
pub const TUKEY_K: f64 = 1.5;

/// Arithmetic mean. NaN for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Variance with `ddof` delta degrees of freedom (0 = population, 1 = sample).
///
/// NaN when `values.len() <= ddof`.
pub fn variance(values: &[f64], ddof: usize) -> f64 {
    if values.len() <= ddof {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    ss / (values.len() - ddof) as f64
}

/// Population standard deviation (maximum-likelihood estimate).
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values, 0).sqrt()
}

/// Smallest value. NaN for empty input.
pub fn min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .reduce(f64::min)
        .unwrap_or(f64::NAN)
}

/// Largest value. NaN for empty input.
pub fn max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .reduce(f64::max)
        .unwrap_or(f64::NAN)
}

/// Return a sorted copy of `values` (total order, NaN last).
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Percentile `q` in `[0, 100]` of an already sorted slice.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() || q.is_nan() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let h = (sorted.len() - 1) as f64 * (q.clamp(0.0, 100.0) / 100.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Percentile `q` in `[0, 100]` of unsorted values.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    percentile_sorted(&sorted(values), q)
}

/// First and third quartiles plus their spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

impl Quartiles {
    /// Compute quartiles of `values`. `None` for empty input.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let s = sorted(values);
        let q1 = percentile_sorted(&s, 25.0);
        let q3 = percentile_sorted(&s, 75.0);
        Some(Self {
            q1,
            q3,
            iqr: q3 - q1,
        })
    }

    /// Inclusive Tukey fences `[Q1 - k*IQR, Q3 + k*IQR]`.
    pub fn fences(&self) -> TukeyFences {
        TukeyFences {
            lower: self.q1 - TUKEY_K * self.iqr,
            upper: self.q3 + TUKEY_K * self.iqr,
        }
    }

    /// Upper whisker `Q3 + 1.5 * IQR`.
    pub fn upper_whisker(&self) -> f64 {
        self.q3 + TUKEY_K * self.iqr
    }
}

/// Inclusive outlier bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TukeyFences {
    pub lower: f64,
    pub upper: f64,
}

impl TukeyFences {
    /// Whether `value` lies inside the fences (bounds included).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Keep the values inside the fences, preserving order.
    pub fn retain(&self, values: &[f64]) -> Vec<f64> {
        values.iter().copied().filter(|v| self.contains(*v)).collect()
    }
}
