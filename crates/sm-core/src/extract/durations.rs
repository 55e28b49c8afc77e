//! Per-activity duration extraction.
//!
//! Within a trace, events are paired in log order:
//! - `start` records (or overwrites) the pending start of its activity
//! - `complete` with a pending start yields `complete - start` for that activity
//! - anything else yields the gap since the previous valid event, credited to
//!   the previous event's activity; the first event of a trace yields nothing
//!
//! Pending starts never cross trace boundaries.

use super::{report_skipped, seconds_between};
use crate::logging::event_names;
use sm_common::{Event, EventLog, Lifecycle, SampleSet};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Resources whose observations are kept.
pub type ResourceFilter = BTreeSet<String>;

/// Durations grouped by activity, plus how many events were skipped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DurationSamples {
    /// Only activities with at least one observation appear.
    pub by_activity: BTreeMap<String, SampleSet>,
    pub skipped_events: usize,
}

impl DurationSamples {
    pub fn is_empty(&self) -> bool {
        self.by_activity.is_empty()
    }

    pub fn observation_count(&self) -> usize {
        self.by_activity.values().map(SampleSet::len).sum()
    }
}

/// Extract activity durations in seconds.
///
/// With a `filter`, an observation is kept only when the event that closes it
/// was performed by one of the listed resources.
pub fn extract_durations(log: &EventLog, filter: Option<&ResourceFilter>) -> DurationSamples {
    let mut out = DurationSamples::default();

    for (trace_index, trace) in log.traces.iter().enumerate() {
        let mut pending: HashMap<&str, chrono::DateTime<chrono::Utc>> = HashMap::new();
        let mut previous: Option<Event<'_>> = None;

        for (index, raw) in trace.events.iter().enumerate() {
            let event = match raw.event() {
                Ok(event) => event,
                Err(missing) => {
                    report_skipped(trace_index, index, missing);
                    out.skipped_events += 1;
                    continue;
                }
            };

            let observation = match event.lifecycle {
                Lifecycle::Start => {
                    pending.insert(event.activity, event.timestamp);
                    None
                }
                Lifecycle::Complete => match pending.remove(event.activity) {
                    Some(started) => Some((event.activity, seconds_between(started, event.timestamp))),
                    None => since_previous(previous.as_ref(), &event),
                },
                Lifecycle::Atomic => since_previous(previous.as_ref(), &event),
            };

            if let Some((activity, seconds)) = observation {
                if accepts(filter, event.resource) {
                    out.by_activity
                        .entry(activity.to_string())
                        .or_insert_with(|| SampleSet::new(activity))
                        .push(seconds);
                }
            }

            previous = Some(event);
        }
    }

    tracing::debug!(
        event = event_names::EXTRACT_FINISHED,
        activities = out.by_activity.len(),
        observations = out.observation_count(),
        skipped = out.skipped_events,
        "durations extracted"
    );
    out
}

fn since_previous<'a>(previous: Option<&Event<'a>>, current: &Event<'_>) -> Option<(&'a str, f64)> {
    previous.map(|p| (p.activity, seconds_between(p.timestamp, current.timestamp)))
}

fn accepts(filter: Option<&ResourceFilter>, resource: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(allowed) => resource.is_some_and(|r| allowed.contains(r)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::ev;
    use sm_common::{LogEvent, Trace};

    fn log(traces: Vec<Vec<LogEvent>>) -> EventLog {
        EventLog::new(traces.into_iter().map(Trace::new).collect())
    }

    fn values<'a>(samples: &'a DurationSamples, activity: &str) -> &'a [f64] {
        samples.by_activity[activity].values()
    }

    #[test]
    fn start_complete_pair_yields_one_duration() {
        let samples = extract_durations(
            &log(vec![vec![
                ev("A", Lifecycle::Start, 0),
                ev("A", Lifecycle::Complete, 90),
            ]]),
            None,
        );
        assert_eq!(values(&samples, "A"), &[90.0]);
        assert_eq!(samples.by_activity.len(), 1);
    }

    #[test]
    fn atomic_gap_goes_to_previous_activity() {
        let samples = extract_durations(
            &log(vec![vec![
                ev("A", Lifecycle::Atomic, 10),
                ev("B", Lifecycle::Atomic, 25),
            ]]),
            None,
        );
        assert_eq!(values(&samples, "A"), &[15.0]);
        assert!(!samples.by_activity.contains_key("B"));
    }

    #[test]
    fn repeated_start_overwrites_pending() {
        let samples = extract_durations(
            &log(vec![vec![
                ev("A", Lifecycle::Start, 0),
                ev("A", Lifecycle::Start, 40),
                ev("A", Lifecycle::Complete, 100),
            ]]),
            None,
        );
        assert_eq!(values(&samples, "A"), &[60.0]);
    }

    #[test]
    fn interleaved_activities_pair_by_name() {
        let samples = extract_durations(
            &log(vec![vec![
                ev("A", Lifecycle::Start, 0),
                ev("B", Lifecycle::Start, 5),
                ev("A", Lifecycle::Complete, 20),
                ev("B", Lifecycle::Complete, 50),
            ]]),
            None,
        );
        assert_eq!(values(&samples, "A"), &[20.0]);
        assert_eq!(values(&samples, "B"), &[45.0]);
    }

    #[test]
    fn unmatched_complete_falls_back_to_previous_event() {
        let samples = extract_durations(
            &log(vec![vec![
                ev("A", Lifecycle::Start, 0),
                ev("B", Lifecycle::Complete, 30),
            ]]),
            None,
        );
        assert_eq!(values(&samples, "A"), &[30.0]);
        assert!(!samples.by_activity.contains_key("B"));
    }

    #[test]
    fn first_event_of_trace_yields_nothing() {
        let samples = extract_durations(
            &log(vec![
                vec![ev("A", Lifecycle::Start, 0)],
                vec![ev("A", Lifecycle::Complete, 10)],
            ]),
            None,
        );
        assert!(samples.is_empty());
    }

    #[test]
    fn pending_start_does_not_cross_traces() {
        let samples = extract_durations(
            &log(vec![
                vec![ev("X", Lifecycle::Atomic, 0), ev("A", Lifecycle::Start, 5)],
                vec![ev("Y", Lifecycle::Atomic, 100), ev("A", Lifecycle::Complete, 160)],
            ]),
            None,
        );
        // A start only records a pending entry; the second trace cannot see it.
        assert_eq!(values(&samples, "Y"), &[60.0]);
        assert!(!samples.by_activity.contains_key("A"));
        assert!(!samples.by_activity.contains_key("X"));
    }

    #[test]
    fn malformed_events_are_skipped_and_counted() {
        let mut broken = ev("B", Lifecycle::Atomic, 50);
        broken.timestamp = None;
        let samples = extract_durations(
            &log(vec![vec![
                ev("A", Lifecycle::Atomic, 0),
                broken,
                ev("C", Lifecycle::Atomic, 80),
            ]]),
            None,
        );
        assert_eq!(samples.skipped_events, 1);
        // The skipped event never becomes the previous event.
        assert_eq!(values(&samples, "A"), &[80.0]);
    }

    #[test]
    fn resource_filter_checks_closing_event() {
        let trace = vec![
            ev("A", Lifecycle::Start, 0).with_resource("R1"),
            ev("A", Lifecycle::Complete, 10).with_resource("R1"),
            ev("B", Lifecycle::Start, 10).with_resource("R2"),
            ev("B", Lifecycle::Complete, 40).with_resource("R2"),
            ev("C", Lifecycle::Atomic, 45),
        ];
        let filter: ResourceFilter = ["R1".to_string()].into_iter().collect();
        let samples = extract_durations(&log(vec![trace]), Some(&filter));

        assert_eq!(values(&samples, "A"), &[10.0]);
        assert_eq!(samples.by_activity.len(), 1);
    }

    #[test]
    fn input_log_is_unchanged() {
        let original = log(vec![vec![
            ev("A", Lifecycle::Start, 0),
            ev("A", Lifecycle::Complete, 5),
        ]]);
        let copy = original.clone();
        let _ = extract_durations(&original, None);
        assert_eq!(original, copy);
    }
}
