//! Maximum-likelihood parameter estimation for the candidate models.
//!
//! The two-parameter models have closed-form estimates. The shifted
//! three-parameter models (lognormal, gamma) profile shape and scale out for a
//! fixed location, then search the location below the sample minimum on a
//! log-offset bracket: `loc = min - range * exp(t)`. The triangular searches
//! both of its bounds the same way, with the mode profiled out.
//!
//! Estimators return `Err` with a short reason instead of panicking; the caller
//! turns that into a candidate failure.

use sm_math::{
    digamma, golden_section_max, log_gamma, mean, sorted, std_dev, trigamma, Maximum,
};
use std::f64::consts::{LN_2, PI};

/// Bracket for the log-offset of the location below the minimum.
const LOC_OFFSET_BRACKET: (f64, f64) = (-7.0, 6.0);
const LOC_SEARCH_TOL: f64 = 1e-8;
const LOC_SEARCH_MAX_ITER: usize = 200;

/// Bracket for the log-offsets of both triangular bounds outside the sample.
const BOUND_OFFSET_BRACKET: (f64, f64) = (-12.0, 3.0);
const BOUND_SCAN_STEPS: usize = 24;

const SHAPE_NEWTON_TOL: f64 = 1e-12;
const SHAPE_NEWTON_MAX_ITER: usize = 100;

pub type EstimateResult<T> = Result<T, String>;

/// Location and scale of a two-parameter model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationScale {
    pub loc: f64,
    pub scale: f64,
}

/// Shape, location and scale of a three-parameter model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeLocationScale {
    pub shape: f64,
    pub loc: f64,
    pub scale: f64,
}

/// Minimum, maximum and count; rejects empty or constant samples.
fn support(values: &[f64]) -> EstimateResult<(f64, f64, usize)> {
    if values.is_empty() {
        return Err("no observations".to_string());
    }
    let lo = sm_math::min(values);
    let hi = sm_math::max(values);
    if !(hi > lo) {
        return Err("observations have zero range".to_string());
    }
    Ok((lo, hi, values.len()))
}

/// Normal: sample mean and population standard deviation.
pub fn normal(values: &[f64]) -> EstimateResult<LocationScale> {
    if values.is_empty() {
        return Err("no observations".to_string());
    }
    Ok(LocationScale {
        loc: mean(values),
        scale: std_dev(values),
    })
}

/// Shifted exponential: `loc = min`, `scale = mean - min`.
pub fn exponential(values: &[f64]) -> EstimateResult<LocationScale> {
    if values.is_empty() {
        return Err("no observations".to_string());
    }
    let loc = sm_math::min(values);
    Ok(LocationScale {
        loc,
        scale: mean(values) - loc,
    })
}

/// Uniform: `loc = min`, `scale = max - min`.
pub fn uniform(values: &[f64]) -> EstimateResult<LocationScale> {
    if values.is_empty() {
        return Err("no observations".to_string());
    }
    let loc = sm_math::min(values);
    Ok(LocationScale {
        loc,
        scale: sm_math::max(values) - loc,
    })
}

/// Best mode for fixed bounds as `(c, log_likelihood)`.
///
/// With the bounds fixed the likelihood in the mode peaks at one of the order
/// statistics, so every observation is tried as the mode using prefix sums of
/// `ln u` and suffix sums of `ln (1 - u)`. `xs` must be sorted ascending.
fn triangular_profile(xs: &[f64], loc: f64, scale: f64) -> Option<(f64, f64)> {
    if !(scale > 0.0) {
        return None;
    }
    let n = xs.len();
    let u: Vec<f64> = xs.iter().map(|x| (x - loc) / scale).collect();
    if u.iter().any(|v| !(*v > 0.0 && *v < 1.0)) {
        return None;
    }

    let mut ln_u = vec![0.0; n + 1];
    for (i, ui) in u.iter().enumerate() {
        ln_u[i + 1] = ln_u[i] + ui.ln();
    }
    let mut ln_one_minus_u = vec![0.0; n + 1];
    for (i, ui) in u.iter().enumerate().rev() {
        ln_one_minus_u[i] = ln_one_minus_u[i + 1] + (1.0 - ui).ln();
    }

    let mut best: Option<(f64, f64)> = None;
    for (r, &c) in u.iter().enumerate() {
        let ll = ln_u[r] - times_ln(r, c) + ln_one_minus_u[r + 1] - times_ln(n - 1 - r, 1.0 - c);
        if !ll.is_finite() {
            continue;
        }
        match best {
            Some((_, best_ll)) if ll <= best_ll => {}
            _ => best = Some((c, ll)),
        }
    }

    let (c, ll) = best?;
    Some((c, ll + n as f64 * (LN_2 - scale.ln())))
}

/// `count * ln x`, zero when nothing is counted even if `x` is zero.
fn times_ln(count: usize, x: f64) -> f64 {
    if count == 0 {
        0.0
    } else {
        count as f64 * x.ln()
    }
}

/// Triangular: joint estimate of `c`, `loc` and `scale`.
///
/// Both bounds sit outside the sample on log-offsets,
/// `loc = min - range * exp(t_lo)` and `upper = max + range * exp(t_hi)`.
/// The upper bound is profiled out for each lower bound, and the mode for each
/// pair of bounds.
pub fn triangular(values: &[f64]) -> EstimateResult<ShapeLocationScale> {
    let (lo, hi, _) = support(values)?;
    let range = hi - lo;
    let xs = sorted(values);
    let lower = |t: f64| lo - range * t.exp();
    let upper = |t: f64| hi + range * t.exp();

    let best_upper = |t_lo: f64| {
        let loc = lower(t_lo);
        scan_then_refine(
            |t_hi| {
                triangular_profile(&xs, loc, upper(t_hi) - loc)
                    .map_or(f64::NEG_INFINITY, |(_, ll)| ll)
            },
            BOUND_OFFSET_BRACKET,
        )
    };
    let no_likelihood = || "triangular bound search found no finite likelihood".to_string();

    let t_lo = scan_then_refine(
        |t| best_upper(t).map_or(f64::NEG_INFINITY, |m| m.value),
        BOUND_OFFSET_BRACKET,
    )
    .ok_or_else(no_likelihood)?
    .x;
    let t_hi = best_upper(t_lo).ok_or_else(no_likelihood)?.x;

    let loc = lower(t_lo);
    let scale = upper(t_hi) - loc;
    let (shape, _) = triangular_profile(&xs, loc, scale).ok_or_else(no_likelihood)?;
    Ok(ShapeLocationScale { shape, loc, scale })
}

/// Grid scan of `bracket`, then golden sections around the best grid point.
///
/// The scan keeps a multimodal profile from trapping the search in a
/// secondary peak.
fn scan_then_refine<F>(mut f: F, (lo, hi): (f64, f64)) -> Option<Maximum>
where
    F: FnMut(f64) -> f64,
{
    let step = (hi - lo) / BOUND_SCAN_STEPS as f64;
    let mut start: Option<(f64, f64)> = None;
    for i in 0..=BOUND_SCAN_STEPS {
        let t = lo + step * i as f64;
        let value = f(t);
        if !value.is_finite() {
            continue;
        }
        match start {
            Some((_, best)) if value <= best => {}
            _ => start = Some((t, value)),
        }
    }
    let (t0, v0) = start?;

    let refined = golden_section_max(
        &mut f,
        (t0 - step).max(lo),
        (t0 + step).min(hi),
        LOC_SEARCH_TOL,
        LOC_SEARCH_MAX_ITER,
    );
    match refined {
        Some(m) if m.value >= v0 => Some(m),
        _ => Some(Maximum {
            x: t0,
            value: v0,
            iterations: 0,
        }),
    }
}

/// Profile log-likelihood of a lognormal with location `loc`.
///
/// Returns `(mu, sigma, log_likelihood)`.
fn lognormal_profile(values: &[f64], loc: f64) -> Option<(f64, f64, f64)> {
    let logs: Vec<f64> = values.iter().map(|x| (x - loc).ln()).collect();
    if logs.iter().any(|y| !y.is_finite()) {
        return None;
    }
    let mu = mean(&logs);
    let sigma = std_dev(&logs);
    if !(sigma > 0.0) {
        return None;
    }
    let n = logs.len() as f64;
    let ll = -logs.iter().sum::<f64>() - n * sigma.ln() - 0.5 * n * (1.0 + (2.0 * PI).ln());
    Some((mu, sigma, ll))
}

/// Shifted lognormal: shape `s = sigma`, `loc`, `scale = exp(mu)`.
pub fn lognormal(values: &[f64]) -> EstimateResult<ShapeLocationScale> {
    let (lo, hi, _) = support(values)?;
    let loc = search_location(lo, hi - lo, |loc| {
        lognormal_profile(values, loc).map_or(f64::NEG_INFINITY, |(_, _, ll)| ll)
    })?;
    let (mu, sigma, _) = lognormal_profile(values, loc)
        .ok_or_else(|| "lognormal profile undefined at the chosen location".to_string())?;
    Ok(ShapeLocationScale {
        shape: sigma,
        loc,
        scale: mu.exp(),
    })
}

/// Solve `ln a - digamma(a) = s` for the gamma shape by Newton's method,
/// starting from Minka's closed-form approximation.
fn gamma_shape(s: f64) -> Option<f64> {
    if !(s > 0.0) || !s.is_finite() {
        return None;
    }
    let mut a = (3.0 - s + ((s - 3.0).powi(2) + 24.0 * s).sqrt()) / (12.0 * s);
    for _ in 0..SHAPE_NEWTON_MAX_ITER {
        let f = a.ln() - digamma(a) - s;
        let df = 1.0 / a - trigamma(a);
        let mut next = a - f / df;
        if next <= 0.0 {
            next = a / 2.0;
        }
        if !next.is_finite() {
            return None;
        }
        if (next - a).abs() <= SHAPE_NEWTON_TOL * a {
            return Some(next);
        }
        a = next;
    }
    a.is_finite().then_some(a)
}

/// Profile log-likelihood of a gamma with location `loc`.
///
/// Returns `(shape, scale, log_likelihood)`.
fn gamma_profile(values: &[f64], loc: f64) -> Option<(f64, f64, f64)> {
    let shifted: Vec<f64> = values.iter().map(|x| x - loc).collect();
    if shifted.iter().any(|y| !(*y > 0.0)) {
        return None;
    }
    let n = shifted.len() as f64;
    let mean_y = mean(&shifted);
    let mean_ln_y = shifted.iter().map(|y| y.ln()).sum::<f64>() / n;
    let shape = gamma_shape(mean_y.ln() - mean_ln_y)?;
    let scale = mean_y / shape;
    let ll = n * ((shape - 1.0) * mean_ln_y - shape - shape * scale.ln() - log_gamma(shape));
    ll.is_finite().then_some((shape, scale, ll))
}

/// Shifted gamma: shape `a`, `loc`, `scale`.
pub fn gamma(values: &[f64]) -> EstimateResult<ShapeLocationScale> {
    let (lo, hi, _) = support(values)?;
    let loc = search_location(lo, hi - lo, |loc| {
        gamma_profile(values, loc).map_or(f64::NEG_INFINITY, |(_, _, ll)| ll)
    })?;
    let (shape, scale, _) = gamma_profile(values, loc)
        .ok_or_else(|| "gamma profile undefined at the chosen location".to_string())?;
    Ok(ShapeLocationScale { shape, loc, scale })
}

/// Maximize a profile likelihood over locations below `lo`.
fn search_location<F>(lo: f64, range: f64, profile: F) -> EstimateResult<f64>
where
    F: Fn(f64) -> f64,
{
    let (t_lo, t_hi) = LOC_OFFSET_BRACKET;
    let best = golden_section_max(
        |t| profile(lo - range * t.exp()),
        t_lo,
        t_hi,
        LOC_SEARCH_TOL,
        LOC_SEARCH_MAX_ITER,
    )
    .ok_or_else(|| "location search found no finite likelihood".to_string())?;
    Ok(lo - range * best.x.exp())
}
