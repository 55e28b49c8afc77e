//! Sample extraction from event logs.
//!
//! Extraction never mutates the log and never fails as a whole: events missing
//! a required attribute are skipped (and counted), everything else contributes
//! observations in seconds.

pub mod durations;
pub mod inter_arrival;
pub mod roster;

pub use durations::{extract_durations, DurationSamples, ResourceFilter};
pub use inter_arrival::{extract_inter_arrivals, ArrivalSamples, INTER_ARRIVAL_KEY};
pub use roster::activity_roster;

use crate::logging::event_names;
use chrono::{DateTime, Utc};
use sm_common::{Error, MissingField};

/// Signed seconds from `earlier` to `later`, with sub-second precision.
pub fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let delta = later - earlier;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

/// Log one skipped event at debug level.
fn report_skipped(trace: usize, index: usize, missing: MissingField) {
    let err = Error::MalformedEvent {
        trace,
        index,
        missing,
    };
    tracing::debug!(
        event = event_names::EXTRACT_EVENT_SKIPPED,
        trace,
        index,
        error = %err,
        "skipping malformed event"
    );
}
