//! Inter-arrival mining: one fit over the gaps between case arrivals.

use crate::config::MiningConfig;
use crate::extract::extract_inter_arrivals;
use crate::fit::{SampleFitter, WassersteinFitter};
use crate::logging::event_names;
use sm_common::{EventLog, FitResult, InterArrivalReport, Result};

/// Fitted inter-arrival distribution with extraction bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct InterArrivalFit {
    pub fit: FitResult,
    /// Cases that contributed an arrival time.
    pub arrivals: usize,
    pub traces_without_start: usize,
}

impl InterArrivalFit {
    pub fn report(&self) -> InterArrivalReport {
        InterArrivalReport::from(&self.fit)
    }
}

/// Fit the case inter-arrival distribution.
///
/// Fails with `EmptySampleSet` when fewer than two cases have a start event,
/// and with `Fitting` when no candidate survives.
pub fn mine_inter_arrival(log: &EventLog, config: &MiningConfig) -> Result<InterArrivalFit> {
    let fitter = WassersteinFitter::new(config.fit.clone());
    mine_inter_arrival_with(log, &fitter)
}

/// [`mine_inter_arrival`] with a caller-supplied fitter.
pub fn mine_inter_arrival_with<F: SampleFitter>(log: &EventLog, fitter: &F) -> Result<InterArrivalFit> {
    let extracted = extract_inter_arrivals(log);
    if extracted.skipped_events > 0 {
        tracing::info!(
            event = event_names::EXTRACT_EVENT_SKIPPED,
            skipped = extracted.skipped_events,
            "malformed events skipped"
        );
    }

    let arrivals = log.len() - extracted.traces_without_start;
    let fit = fitter.fit(&extracted.samples).inspect_err(|err| {
        tracing::warn!(
            event = event_names::FIT_KEY_FAILED,
            key = %extracted.samples.key,
            code = err.code(),
            error = %err,
            "inter-arrival fit failed"
        );
    })?;

    Ok(InterArrivalFit {
        fit,
        arrivals,
        traces_without_start: extracted.traces_without_start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sm_common::{DistributionKind, Error, Lifecycle, LogEvent, Trace};

    fn arrivals_at(offsets: &[i64]) -> EventLog {
        EventLog::new(
            offsets
                .iter()
                .map(|s| {
                    Trace::new(vec![LogEvent::new(
                        "Receive",
                        Lifecycle::Start,
                        Utc.timestamp_opt(1_700_000_000 + s, 0).unwrap(),
                    )])
                })
                .collect(),
        )
    }

    #[test]
    fn single_case_is_empty_sample_set() {
        let err = mine_inter_arrival(&arrivals_at(&[0]), &MiningConfig::default()).unwrap_err();
        assert!(matches!(err, Error::EmptySampleSet { key } if key == "inter_arrival"));
    }

    #[test]
    fn equal_gaps_are_degenerate_fixed() {
        let mined =
            mine_inter_arrival(&arrivals_at(&[0, 60, 120, 180]), &MiningConfig::default()).unwrap();
        assert_eq!(mined.fit.distribution, DistributionKind::Fixed);
        assert_eq!(mined.arrivals, 4);
        let report = mined.report();
        assert_eq!(report.arrival_time_distribution.distribution_params.len(), 1);
        assert_eq!(report.arrival_time_distribution.distribution_params[0].value, 60.0);
    }

    #[test]
    fn report_lists_model_parameters_only() {
        let mined = mine_inter_arrival(
            &arrivals_at(&[0, 30, 45, 130, 170, 400, 410, 650, 900, 905]),
            &MiningConfig::default(),
        )
        .unwrap();
        let report = mined.report();
        assert_eq!(
            report.arrival_time_distribution.distribution_params.len(),
            mined.fit.parameters.model.len()
        );
        assert_eq!(
            report.arrival_time_distribution.distribution_name,
            mined.fit.distribution_name()
        );
    }
}
