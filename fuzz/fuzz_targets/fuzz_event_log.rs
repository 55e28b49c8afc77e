//! Fuzz target for event log decoding and sample extraction.
//!
//! Any log that decodes must extract without panicking, and every extracted
//! observation must be finite.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sm_common::EventLog;
use sm_core::extract::{activity_roster, extract_durations, extract_inter_arrivals};

fuzz_target!(|data: &[u8]| {
    let Ok(log) = serde_json::from_slice::<EventLog>(data) else {
        return;
    };

    let durations = extract_durations(&log, None);
    for set in durations.by_activity.values() {
        assert!(!set.is_empty());
        assert!(set.values().iter().all(|v| v.is_finite()));
    }

    let arrivals = extract_inter_arrivals(&log);
    assert!(arrivals.samples.values().iter().all(|v| *v >= 0.0));

    let _ = activity_roster(&log);
});
