//! Orchestrators: extraction followed by one fit per key.
//!
//! Keys are independent. A key whose fit fails is reported in the `failures`
//! map of its report and never hides the results of other keys. With
//! `parallel` enabled the per-key fits run on the rayon pool; results are
//! merged into ordered maps, so output does not depend on scheduling.

pub mod activity;
pub mod inter_arrival;
pub mod resource;

pub use activity::{mine_activity_durations, mine_activity_durations_with};
pub use inter_arrival::{mine_inter_arrival, mine_inter_arrival_with, InterArrivalFit};
pub use resource::{mine_resource_durations, mine_resource_durations_with};

use crate::fit::SampleFitter;
use crate::logging::event_names;
use rayon::prelude::*;
use sm_common::{ActivityReport, DistributionFit, FitResult, Result, SampleSet};
use std::collections::BTreeMap;

/// Fit one sample set inside a span carrying its key.
fn fit_key<F: SampleFitter>(fitter: &F, samples: &SampleSet) -> Result<FitResult> {
    let span = tracing::debug_span!("fit_key", key = %samples.key);
    let _guard = span.enter();
    fitter.fit(samples)
}

/// Fit every sample set and assemble an activity report.
pub(crate) fn fit_all<F: SampleFitter>(
    fitter: &F,
    samples: &BTreeMap<String, SampleSet>,
    parallel: bool,
) -> ActivityReport {
    let outcomes: Vec<(&String, Result<FitResult>)> = if parallel {
        samples
            .par_iter()
            .map(|(key, set)| (key, fit_key(fitter, set)))
            .collect()
    } else {
        samples
            .iter()
            .map(|(key, set)| (key, fit_key(fitter, set)))
            .collect()
    };

    let mut report = ActivityReport::default();
    for (key, outcome) in outcomes {
        match outcome {
            Ok(fit) => {
                report
                    .distributions
                    .insert(key.clone(), DistributionFit::from(&fit));
            }
            Err(err) => {
                tracing::warn!(
                    event = event_names::FIT_KEY_FAILED,
                    key = %key,
                    code = err.code(),
                    error = %err,
                    "fit failed for key"
                );
                report.failures.insert(key.clone(), err.to_string());
            }
        }
    }

    tracing::debug!(
        event = event_names::FIT_FINISHED,
        fitted = report.distributions.len(),
        failed = report.failures.len(),
        "keys fitted"
    );
    report
}
