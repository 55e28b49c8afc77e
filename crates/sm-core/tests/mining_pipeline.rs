//! End-to-end mining through the public API: JSON log in, reports out.

use chrono::{DateTime, Duration, TimeZone, Utc};
use sm_common::{DistributionKind, EventLog, Lifecycle, LogEvent, Trace};
use sm_core::config::MiningConfig;
use sm_core::extract::{extract_durations, extract_inter_arrivals};
use sm_core::fit::{FitConfig, SampleFitter, WassersteinFitter};
use sm_core::mining::{
    mine_activity_durations, mine_activity_durations_with, mine_inter_arrival,
    mine_resource_durations,
};
use std::collections::BTreeSet;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

fn at(secs: i64) -> DateTime<Utc> {
    base() + Duration::seconds(secs)
}

/// Twelve cases of Register -> Review -> Approve with varied durations.
fn claims_log() -> EventLog {
    let review = [310, 295, 402, 288, 350, 515, 330, 298, 610, 345, 372, 301];
    let traces = review
        .iter()
        .enumerate()
        .map(|(i, &review_secs)| {
            let arrival = i as i64 * 600 + (i as i64 % 3) * 45;
            let approver = if i % 2 == 0 { "alice" } else { "bob" };
            Trace::new(vec![
                LogEvent::new("Register", Lifecycle::Start, at(arrival)).with_resource("desk"),
                LogEvent::new("Register", Lifecycle::Complete, at(arrival + 60)).with_resource("desk"),
                LogEvent::new("Review", Lifecycle::Start, at(arrival + 90)).with_resource(approver),
                LogEvent::new("Review", Lifecycle::Complete, at(arrival + 90 + review_secs))
                    .with_resource(approver),
                LogEvent::new("Approve", Lifecycle::Atomic, at(arrival + 200 + review_secs))
                    .with_resource(approver),
            ])
            .with_case_id(format!("case-{i}"))
        })
        .collect();
    EventLog::new(traces)
}

#[test]
fn activity_mining_covers_every_key() {
    let report = mine_activity_durations(&claims_log(), &MiningConfig::default());
    assert!(!report.has_failures());

    let keys: Vec<&str> = report.distributions.keys().map(String::as_str).collect();
    // The atomic Approve credits its gap to Review, so Approve has no key.
    assert_eq!(keys, vec!["Register", "Review"]);

    let register = &report.distributions["Register"];
    assert_eq!(register.distribution_name, "fixed");
    assert_eq!(register.parameters.get("value"), Some(60.0));
    assert!(register.parameters.summary.is_none());

    let review = &report.distributions["Review"];
    assert_ne!(review.distribution_name, "fixed");
    let summary = review.parameters.summary.unwrap();
    assert!(summary.mean > 0.0);
}

#[test]
fn decoded_json_log_mines_like_built_log() {
    let text = serde_json::to_string(&claims_log()).unwrap();
    let decoded = EventLog::from_json_str(&text).unwrap();
    let config = MiningConfig {
        parallel: false,
        ..MiningConfig::default()
    };
    assert_eq!(
        mine_activity_durations(&decoded, &config),
        mine_activity_durations(&claims_log(), &config)
    );
}

#[test]
fn xes_style_keys_decode() {
    let text = r#"{"traces":[{"events":[
        {"concept:name":"A","lifecycle:transition":"start","time:timestamp":"2024-03-01T10:00:00Z"},
        {"concept:name":"A","lifecycle:transition":"complete","time:timestamp":"2024-03-01T10:00:42.5Z","org:resource":"R1"}
    ]}]}"#;
    let log = EventLog::from_json_str(text).unwrap();
    let samples = extract_durations(&log, None);
    assert_eq!(samples.by_activity["A"].values(), &[42.5]);
}

#[test]
fn start_complete_pair_yields_one_sample() {
    let log = EventLog::new(vec![Trace::new(vec![
        LogEvent::new("A", Lifecycle::Start, at(0)),
        LogEvent::new("A", Lifecycle::Complete, at(75)),
    ])]);
    let samples = extract_durations(&log, None);
    assert_eq!(samples.by_activity.len(), 1);
    assert_eq!(samples.by_activity["A"].values(), &[75.0]);
}

#[test]
fn atomic_gap_is_credited_to_previous_activity() {
    let log = EventLog::new(vec![Trace::new(vec![
        LogEvent::new("A", Lifecycle::Atomic, at(0)),
        LogEvent::new("B", Lifecycle::Atomic, at(30)),
    ])]);
    let samples = extract_durations(&log, None);
    assert_eq!(samples.by_activity["A"].values(), &[30.0]);
    assert!(!samples.by_activity.contains_key("B"));
}

#[test]
fn inter_arrivals_ignore_trace_order() {
    let case = |secs: i64| {
        Trace::new(vec![
            LogEvent::new("Open", Lifecycle::Start, at(secs)),
            LogEvent::new("Open", Lifecycle::Complete, at(secs + 10)),
        ])
    };
    let log = EventLog::new(vec![case(720), case(0), case(300)]);
    let arrivals = extract_inter_arrivals(&log);
    assert_eq!(arrivals.samples.values(), &[300.0, 420.0]);
}

#[test]
fn inter_arrival_mining_reports_model_parameters() {
    let mined = mine_inter_arrival(&claims_log(), &MiningConfig::default()).unwrap();
    assert_eq!(mined.arrivals, 12);
    assert_eq!(mined.traces_without_start, 0);

    let report = mined.report();
    let params = &report.arrival_time_distribution.distribution_params;
    assert_eq!(params.len(), mined.fit.parameters.model.len());
}

#[test]
fn resource_filter_keeps_only_listed_resource() {
    let config = MiningConfig {
        resource_filter: Some(BTreeSet::from(["alice".to_string()])),
        ..MiningConfig::default()
    };
    let filtered = extract_durations(&claims_log(), config.resource_filter.as_ref());
    // alice closes Review in the six even cases and the Approve gaps credit Review too.
    assert_eq!(filtered.by_activity["Review"].len(), 12);
    assert!(!filtered.by_activity.contains_key("Register"));

    let report = mine_resource_durations(&claims_log(), &config);
    let resources: Vec<&str> = report.resources.keys().map(String::as_str).collect();
    assert_eq!(resources, vec!["alice"]);
}

#[test]
fn resource_mining_splits_by_performer() {
    let report = mine_resource_durations(&claims_log(), &MiningConfig::default());
    let resources: Vec<&str> = report.resources.keys().map(String::as_str).collect();
    assert_eq!(resources, vec!["alice", "bob", "desk"]);
    assert!(report.resources["desk"].distributions.contains_key("Register"));
    assert!(!report.resources["desk"].distributions.contains_key("Review"));
}

#[test]
fn failing_key_does_not_hide_other_keys() {
    let inner = WassersteinFitter::new(FitConfig::default());
    let fitter = |set: &sm_common::SampleSet| {
        if set.key == "Register" {
            Err(sm_common::Error::Fitting {
                key: set.key.clone(),
                failures: Vec::new(),
            })
        } else {
            inner.fit(set)
        }
    };
    let report = mine_activity_durations_with(&claims_log(), &MiningConfig::default(), &fitter);
    assert!(report.failures.contains_key("Register"));
    assert!(report.distributions.contains_key("Review"));
}

#[test]
fn empty_log_yields_empty_success() {
    let report = mine_activity_durations(&EventLog::default(), &MiningConfig::default());
    assert!(report.is_empty());
    assert!(mine_inter_arrival(&EventLog::default(), &MiningConfig::default()).is_err());
}

#[test]
fn degenerate_key_reports_fixed_without_scores() {
    let fit = WassersteinFitter::default()
        .fit(&sm_common::SampleSet::from_values("Stamp", vec![4.0; 9]))
        .unwrap();
    assert_eq!(fit.distribution, DistributionKind::Fixed);
    assert!(fit.degenerate);
    assert!(fit.goodness.is_empty());
}
