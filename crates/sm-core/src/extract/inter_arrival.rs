//! Case inter-arrival extraction.
//!
//! A case arrives at the timestamp of its first `start` event in log order.
//! Arrivals are sorted ascending and consecutive gaps become the samples.

use super::{report_skipped, seconds_between};
use crate::logging::event_names;
use sm_common::{EventLog, Lifecycle, SampleSet};

/// Key of the single inter-arrival sample set.
pub const INTER_ARRIVAL_KEY: &str = "inter_arrival";

/// Inter-arrival gaps plus bookkeeping about the traces they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalSamples {
    pub samples: SampleSet,
    /// Traces without any valid `start` event.
    pub traces_without_start: usize,
    pub skipped_events: usize,
}

/// Extract inter-arrival gaps in seconds, in ascending arrival order.
pub fn extract_inter_arrivals(log: &EventLog) -> ArrivalSamples {
    let mut arrivals = Vec::with_capacity(log.len());
    let mut traces_without_start = 0;
    let mut skipped_events = 0;

    for (trace_index, trace) in log.traces.iter().enumerate() {
        let mut first_start = None;
        for (index, raw) in trace.events.iter().enumerate() {
            match raw.event() {
                Ok(event) if event.lifecycle == Lifecycle::Start => {
                    first_start = Some(event.timestamp);
                    break;
                }
                Ok(_) => {}
                Err(missing) => {
                    report_skipped(trace_index, index, missing);
                    skipped_events += 1;
                }
            }
        }
        match first_start {
            Some(ts) => arrivals.push(ts),
            None => traces_without_start += 1,
        }
    }

    arrivals.sort_unstable();
    let gaps: Vec<f64> = arrivals
        .windows(2)
        .map(|pair| seconds_between(pair[0], pair[1]))
        .collect();

    tracing::debug!(
        event = event_names::EXTRACT_FINISHED,
        arrivals = arrivals.len(),
        gaps = gaps.len(),
        traces_without_start,
        "inter-arrivals extracted"
    );

    ArrivalSamples {
        samples: SampleSet::from_values(INTER_ARRIVAL_KEY, gaps),
        traces_without_start,
        skipped_events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::ev;
    use sm_common::Trace;

    #[test]
    fn gaps_follow_time_not_trace_order() {
        // First starts at 10:00, 10:05, 10:12 listed out of order.
        let log = EventLog::new(vec![
            Trace::new(vec![ev("A", Lifecycle::Start, 300)]),
            Trace::new(vec![ev("A", Lifecycle::Start, 720)]),
            Trace::new(vec![ev("A", Lifecycle::Start, 0)]),
        ]);
        let out = extract_inter_arrivals(&log);
        assert_eq!(out.samples.values(), &[300.0, 420.0]);
        assert_eq!(out.samples.key, INTER_ARRIVAL_KEY);
    }

    #[test]
    fn uses_first_start_in_log_order() {
        let log = EventLog::new(vec![
            Trace::new(vec![
                ev("Z", Lifecycle::Atomic, 0),
                ev("A", Lifecycle::Start, 50),
                ev("B", Lifecycle::Start, 10),
            ]),
            Trace::new(vec![ev("A", Lifecycle::Start, 80)]),
        ]);
        let out = extract_inter_arrivals(&log);
        assert_eq!(out.samples.values(), &[30.0]);
    }

    #[test]
    fn traces_without_start_are_skipped() {
        let log = EventLog::new(vec![
            Trace::new(vec![ev("A", Lifecycle::Complete, 0)]),
            Trace::new(vec![]),
            Trace::new(vec![ev("A", Lifecycle::Start, 5)]),
        ]);
        let out = extract_inter_arrivals(&log);
        assert_eq!(out.traces_without_start, 2);
        assert!(out.samples.is_empty());
    }

    #[test]
    fn malformed_start_is_not_an_arrival() {
        let mut broken = ev("A", Lifecycle::Start, 0);
        broken.activity = None;
        let log = EventLog::new(vec![
            Trace::new(vec![broken, ev("A", Lifecycle::Start, 100)]),
            Trace::new(vec![ev("A", Lifecycle::Start, 160)]),
        ]);
        let out = extract_inter_arrivals(&log);
        assert_eq!(out.skipped_events, 1);
        assert_eq!(out.samples.values(), &[60.0]);
    }
}
