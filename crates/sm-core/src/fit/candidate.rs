//! Candidate distribution registry.
//!
//! [`Candidate`] is the closed set of fitted models. Each variant carries its
//! estimated parameters and knows how to report them in model order and how to
//! draw synthetic observations with `rand_distr`.

use super::estimate;
use rand::distr::Uniform;
use rand::Rng;
use rand_distr::{Distribution, Exp, Gamma, LogNormal, Normal, Triangular};
use sm_common::{CandidateFailureReason, DistributionKind, Parameter};

/// A candidate distribution with fitted parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    Fixed { value: f64 },
    Normal { loc: f64, scale: f64 },
    Exponential { loc: f64, scale: f64 },
    Uniform { loc: f64, scale: f64 },
    Triangular { c: f64, loc: f64, scale: f64 },
    Lognormal { s: f64, loc: f64, scale: f64 },
    Gamma { a: f64, loc: f64, scale: f64 },
}

impl Candidate {
    /// Estimate the parameters of `kind` from `values`.
    ///
    /// Non-finite estimates are reported as [`CandidateFailureReason::NonFinite`].
    pub fn fit(kind: DistributionKind, values: &[f64]) -> Result<Candidate, CandidateFailureReason> {
        let estimation = CandidateFailureReason::Estimation;
        let candidate = match kind {
            DistributionKind::Fixed => {
                if values.is_empty() {
                    return Err(estimation("no observations".to_string()));
                }
                Candidate::Fixed {
                    value: sm_math::mean(values),
                }
            }
            DistributionKind::Normal => {
                let p = estimate::normal(values).map_err(estimation)?;
                Candidate::Normal {
                    loc: p.loc,
                    scale: p.scale,
                }
            }
            DistributionKind::Exponential => {
                let p = estimate::exponential(values).map_err(estimation)?;
                Candidate::Exponential {
                    loc: p.loc,
                    scale: p.scale,
                }
            }
            DistributionKind::Uniform => {
                let p = estimate::uniform(values).map_err(estimation)?;
                Candidate::Uniform {
                    loc: p.loc,
                    scale: p.scale,
                }
            }
            DistributionKind::Triangular => {
                let p = estimate::triangular(values).map_err(estimation)?;
                Candidate::Triangular {
                    c: p.shape,
                    loc: p.loc,
                    scale: p.scale,
                }
            }
            DistributionKind::Lognormal => {
                let p = estimate::lognormal(values).map_err(estimation)?;
                Candidate::Lognormal {
                    s: p.shape,
                    loc: p.loc,
                    scale: p.scale,
                }
            }
            DistributionKind::Gamma => {
                let p = estimate::gamma(values).map_err(estimation)?;
                Candidate::Gamma {
                    a: p.shape,
                    loc: p.loc,
                    scale: p.scale,
                }
            }
        };

        if candidate.is_finite() {
            Ok(candidate)
        } else {
            Err(CandidateFailureReason::NonFinite)
        }
    }

    pub fn kind(&self) -> DistributionKind {
        match self {
            Candidate::Fixed { .. } => DistributionKind::Fixed,
            Candidate::Normal { .. } => DistributionKind::Normal,
            Candidate::Exponential { .. } => DistributionKind::Exponential,
            Candidate::Uniform { .. } => DistributionKind::Uniform,
            Candidate::Triangular { .. } => DistributionKind::Triangular,
            Candidate::Lognormal { .. } => DistributionKind::Lognormal,
            Candidate::Gamma { .. } => DistributionKind::Gamma,
        }
    }

    /// Parameters in model order (shape first, then `loc`, `scale`).
    pub fn parameters(&self) -> Vec<Parameter> {
        match *self {
            Candidate::Fixed { value } => vec![Parameter::new("value", value)],
            Candidate::Normal { loc, scale }
            | Candidate::Exponential { loc, scale }
            | Candidate::Uniform { loc, scale } => {
                vec![Parameter::new("loc", loc), Parameter::new("scale", scale)]
            }
            Candidate::Triangular { c, loc, scale } => vec![
                Parameter::new("c", c),
                Parameter::new("loc", loc),
                Parameter::new("scale", scale),
            ],
            Candidate::Lognormal { s, loc, scale } => vec![
                Parameter::new("s", s),
                Parameter::new("loc", loc),
                Parameter::new("scale", scale),
            ],
            Candidate::Gamma { a, loc, scale } => vec![
                Parameter::new("a", a),
                Parameter::new("loc", loc),
                Parameter::new("scale", scale),
            ],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.parameters().iter().all(|p| p.value.is_finite())
    }

    /// Draw `count` synthetic observations.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<f64>, CandidateFailureReason> {
        let sampling = |e: &dyn std::fmt::Display| CandidateFailureReason::Sampling(e.to_string());

        let draws: Vec<f64> = match *self {
            Candidate::Fixed { value } => vec![value; count],
            Candidate::Normal { loc, scale } => {
                if !(scale > 0.0) {
                    return Err(sampling(&"normal scale must be positive"));
                }
                let dist = Normal::new(loc, scale).map_err(|e| sampling(&e))?;
                draw(&dist, rng, count)
            }
            Candidate::Exponential { loc, scale } => {
                if !(scale > 0.0) {
                    return Err(sampling(&"exponential scale must be positive"));
                }
                let dist = Exp::new(1.0 / scale).map_err(|e| sampling(&e))?;
                shifted(draw(&dist, rng, count), loc)
            }
            Candidate::Uniform { loc, scale } => {
                let dist = Uniform::new_inclusive(loc, loc + scale).map_err(|e| sampling(&e))?;
                draw(&dist, rng, count)
            }
            Candidate::Triangular { c, loc, scale } => {
                let dist = Triangular::new(loc, loc + scale, loc + c * scale)
                    .map_err(|e| sampling(&e))?;
                draw(&dist, rng, count)
            }
            Candidate::Lognormal { s, loc, scale } => {
                if !(scale > 0.0) {
                    return Err(sampling(&"lognormal scale must be positive"));
                }
                if !(s > 0.0) {
                    return Err(sampling(&"lognormal shape must be positive"));
                }
                let dist = LogNormal::new(scale.ln(), s).map_err(|e| sampling(&e))?;
                shifted(draw(&dist, rng, count), loc)
            }
            Candidate::Gamma { a, loc, scale } => {
                let dist = Gamma::new(a, scale).map_err(|e| sampling(&e))?;
                shifted(draw(&dist, rng, count), loc)
            }
        };

        if draws.iter().all(|x| x.is_finite()) {
            Ok(draws)
        } else {
            Err(CandidateFailureReason::NonFinite)
        }
    }
}

fn draw<D, R>(dist: &D, rng: &mut R, count: usize) -> Vec<f64>
where
    D: Distribution<f64>,
    R: Rng + ?Sized,
{
    (0..count).map(|_| dist.sample(rng)).collect()
}

fn shifted(mut values: Vec<f64>, loc: f64) -> Vec<f64> {
    for v in &mut values {
        *v += loc;
    }
    values
}
