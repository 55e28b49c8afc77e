//! Activity resource roster: which resources performed each activity.

use sm_common::{EventLog, RosterReport};

/// Group resources by the activities they performed.
///
/// Only the activity name and resource are needed; events lacking either are
/// ignored.
pub fn activity_roster(log: &EventLog) -> RosterReport {
    let mut report = RosterReport::default();
    for event in log.traces.iter().flat_map(|t| t.events.iter()) {
        if let (Some(activity), Some(resource)) = (&event.activity, &event.resource) {
            report
                .roles
                .entry(activity.clone())
                .or_default()
                .insert(resource.clone());
        }
    }
    report
}
