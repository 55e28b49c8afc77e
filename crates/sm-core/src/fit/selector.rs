//! Best-candidate selection by Wasserstein distance.

use super::candidate::Candidate;
use super::{FitConfig, SampleFitter};
use crate::logging::event_names;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sm_common::{
    CandidateFailure, CandidateFailureReason, DistributionKind, Error, FitResult, FittedParameters,
    GoodnessScores, Parameter, Result, SampleSet, SampleSummary,
};
use sm_math::{try_wasserstein_distance, Quartiles};

/// Mixes the candidate index into the per-fit seed (splitmix64 increment).
const STREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Fits every registry candidate and keeps the one closest to the data.
#[derive(Debug, Clone, Default)]
pub struct WassersteinFitter {
    config: FitConfig,
}

impl WassersteinFitter {
    pub fn new(config: FitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Fit with a custom estimator in place of [`Candidate::fit`].
    pub fn fit_with<E>(&self, samples: &SampleSet, estimate: E) -> Result<FitResult>
    where
        E: Fn(DistributionKind, &[f64]) -> std::result::Result<Candidate, CandidateFailureReason>,
    {
        samples.ensure_fittable()?;
        let observed = samples.values();

        let values = if self.config.remove_outliers {
            remove_outliers(observed)
        } else {
            observed.to_vec()
        };
        if values.is_empty() {
            return Err(Error::EmptySampleSet {
                key: samples.key.clone(),
            });
        }

        let lowest = sm_math::min(&values);
        if lowest == sm_math::max(&values) {
            tracing::debug!(
                event = event_names::FIT_DEGENERATE,
                key = %samples.key,
                count = values.len(),
                "all observations equal; selecting fixed"
            );
            return Ok(FitResult {
                distribution: DistributionKind::Fixed,
                // Every observation equals the mean; reuse it exactly.
                parameters: FittedParameters::new(vec![Parameter::new("value", lowest)]),
                goodness: GoodnessScores::default(),
                failures: Vec::new(),
                sample_count: values.len(),
                degenerate: true,
            });
        }

        // Describes what was fitted, so trimmed observations do not count.
        let summary = Quartiles::of(&values).map(|q| SampleSummary {
            max: q.upper_whisker(),
            mean: sm_math::mean(&values),
        });

        let draw_count = self.config.sample_count.unwrap_or(values.len());
        let mut scores = Vec::with_capacity(DistributionKind::ALL.len());
        let mut fitted = Vec::with_capacity(DistributionKind::ALL.len());
        let mut failures = Vec::new();

        for kind in DistributionKind::ALL {
            let mut rng = self.candidate_rng(kind);
            let outcome = estimate(kind, values.as_slice())
                .and_then(|candidate| {
                    let draws = candidate.sample(&mut rng, draw_count)?;
                    Ok((candidate, draws))
                })
                .and_then(|(candidate, draws)| {
                    let distance = try_wasserstein_distance(&values, &draws)
                        .map_err(|e| CandidateFailureReason::Sampling(e.to_string()))?;
                    Ok((candidate, distance))
                });

            match outcome {
                Ok((candidate, distance)) => {
                    scores.push((kind, distance));
                    fitted.push(candidate);
                }
                Err(reason) => {
                    tracing::debug!(
                        event = event_names::FIT_CANDIDATE_FAILED,
                        key = %samples.key,
                        candidate = %kind,
                        reason = %reason,
                        "candidate skipped"
                    );
                    failures.push(CandidateFailure::new(kind, reason));
                }
            }
        }

        let goodness = GoodnessScores(scores);
        let Some((best_kind, best_distance)) = goodness.best() else {
            return Err(Error::Fitting {
                key: samples.key.clone(),
                failures,
            });
        };
        let best = fitted
            .iter()
            .find(|c| c.kind() == best_kind)
            .ok_or_else(|| Error::Fitting {
                key: samples.key.clone(),
                failures: failures.clone(),
            })?;

        let mut parameters = FittedParameters::new(best.parameters());
        if best_kind != DistributionKind::Fixed {
            if let Some(summary) = summary {
                parameters = parameters.with_summary(summary);
            }
        }

        tracing::debug!(
            event = event_names::FIT_SELECTED,
            key = %samples.key,
            distribution = %best_kind,
            distance = best_distance,
            surviving = goodness.len(),
            "distribution selected"
        );

        Ok(FitResult {
            distribution: best_kind,
            parameters,
            goodness,
            failures,
            sample_count: values.len(),
            degenerate: false,
        })
    }

    /// Independent stream per candidate so a skipped candidate never shifts
    /// another's draws.
    fn candidate_rng(&self, kind: DistributionKind) -> StdRng {
        let stream = (kind.index() as u64 + 1).wrapping_mul(STREAM_STRIDE);
        StdRng::seed_from_u64(self.config.seed ^ stream)
    }
}

impl SampleFitter for WassersteinFitter {
    fn fit(&self, samples: &SampleSet) -> Result<FitResult> {
        self.fit_with(samples, Candidate::fit)
    }
}

/// Drop observations outside the inclusive Tukey fences, preserving order.
pub fn remove_outliers(values: &[f64]) -> Vec<f64> {
    match Quartiles::of(values) {
        Some(q) => q.fences().retain(values),
        None => Vec::new(),
    }
}
