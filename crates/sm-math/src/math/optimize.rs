//! Bracketed one-dimensional maximization.
//!
//! The three-parameter estimators profile out every parameter but the location
//! and then search the profile likelihood over a bracket with golden sections.

const INV_PHI: f64 = 0.618_033_988_749_894_9; // (sqrt(5) - 1) / 2

/// Result of a bracketed search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maximum {
    /// Argument of the best value found.
    pub x: f64,
    /// Objective at `x`.
    pub value: f64,
    /// Iterations spent.
    pub iterations: usize,
}

/// Maximize a unimodal `f` on `[lo, hi]` by golden-section search.
///
/// Non-finite objective values are treated as `-inf`, so the search walks away
/// from regions where the objective is undefined. Returns `None` if the bracket
/// is invalid or the objective is never finite.
pub fn golden_section_max<F>(mut f: F, lo: f64, hi: f64, tol: f64, max_iter: usize) -> Option<Maximum>
where
    F: FnMut(f64) -> f64,
{
    if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
        return None;
    }

    let mut eval = |x: f64| {
        let v = f(x);
        if v.is_finite() {
            v
        } else {
            f64::NEG_INFINITY
        }
    };

    let (mut a, mut b) = (lo, hi);
    let mut c = b - INV_PHI * (b - a);
    let mut d = a + INV_PHI * (b - a);
    let mut fc = eval(c);
    let mut fd = eval(d);
    let mut iterations = 0;

    while (b - a).abs() > tol * (1.0 + a.abs().max(b.abs())) && iterations < max_iter {
        if fc >= fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INV_PHI * (b - a);
            fc = eval(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INV_PHI * (b - a);
            fd = eval(d);
        }
        iterations += 1;
    }

    let (x, value) = if fc >= fd { (c, fc) } else { (d, fd) };
    if value == f64::NEG_INFINITY {
        return None;
    }
    Some(Maximum {
        x,
        value,
        iterations,
    })
}
