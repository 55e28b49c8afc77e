//! Per-activity duration mining.

use super::fit_all;
use crate::config::MiningConfig;
use crate::extract::extract_durations;
use crate::fit::{SampleFitter, WassersteinFitter};
use crate::logging::event_names;
use sm_common::{ActivityReport, EventLog};

/// Fit a duration distribution for every activity in the log.
///
/// A log with no usable observations yields an empty report.
pub fn mine_activity_durations(log: &EventLog, config: &MiningConfig) -> ActivityReport {
    let fitter = WassersteinFitter::new(config.fit.clone());
    mine_activity_durations_with(log, config, &fitter)
}

/// [`mine_activity_durations`] with a caller-supplied fitter.
pub fn mine_activity_durations_with<F: SampleFitter>(
    log: &EventLog,
    config: &MiningConfig,
    fitter: &F,
) -> ActivityReport {
    let samples = extract_durations(log, config.resource_filter.as_ref());
    if samples.skipped_events > 0 {
        tracing::info!(
            event = event_names::EXTRACT_EVENT_SKIPPED,
            skipped = samples.skipped_events,
            "malformed events skipped"
        );
    }
    fit_all(fitter, &samples.by_activity, config.parallel)
}
