//! Event log model.
//!
//! A [`EventLog`] is an ordered list of [`Trace`]s, each an ordered list of
//! [`LogEvent`]s in the order the log recorded them (not necessarily sorted by
//! timestamp). `LogEvent` mirrors what a log parser can hand over: every
//! attribute is optional. [`LogEvent::event`] validates one into a borrowed
//! [`Event`] carrying the attributes extraction needs.
//!
//! The serde form accepts both the plain field names and the XES-style keys
//! (`concept:name`, `lifecycle:transition`, `time:timestamp`, `org:resource`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;

/// Lifecycle transition of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Start of an activity instance.
    Start,
    /// Completion of an activity instance.
    Complete,
    /// Instantaneous event. Any transition other than start/complete
    /// (`schedule`, `assign`, ...) is read as atomic.
    #[serde(other)]
    Atomic,
}

impl Lifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Start => "start",
            Lifecycle::Complete => "complete",
            Lifecycle::Atomic => "atomic",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Lifecycle {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "start" => Lifecycle::Start,
            "complete" => Lifecycle::Complete,
            _ => Lifecycle::Atomic,
        })
    }
}

/// Attribute an event needs for extraction but does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Activity,
    Lifecycle,
    Timestamp,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::Activity => write!(f, "activity name"),
            MissingField::Lifecycle => write!(f, "lifecycle transition"),
            MissingField::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// One recorded event as supplied by the log parser.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogEvent {
    #[serde(default, alias = "concept:name", skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,

    #[serde(
        default,
        alias = "lifecycle:transition",
        skip_serializing_if = "Option::is_none"
    )]
    pub lifecycle: Option<Lifecycle>,

    #[serde(default, alias = "time:timestamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, alias = "org:resource", skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

impl LogEvent {
    /// Create a fully specified event without a resource.
    pub fn new(activity: impl Into<String>, lifecycle: Lifecycle, timestamp: DateTime<Utc>) -> Self {
        Self {
            activity: Some(activity.into()),
            lifecycle: Some(lifecycle),
            timestamp: Some(timestamp),
            resource: None,
        }
    }

    /// Attach the resource that performed the event.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Validate into an [`Event`] view, naming the first missing attribute.
    pub fn event(&self) -> Result<Event<'_>, MissingField> {
        let activity = self.activity.as_deref().ok_or(MissingField::Activity)?;
        let lifecycle = self.lifecycle.ok_or(MissingField::Lifecycle)?;
        let timestamp = self.timestamp.ok_or(MissingField::Timestamp)?;
        Ok(Event {
            activity,
            lifecycle,
            timestamp,
            resource: self.resource.as_deref(),
        })
    }
}

/// A validated event borrowed from its [`LogEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event<'a> {
    pub activity: &'a str,
    pub lifecycle: Lifecycle,
    pub timestamp: DateTime<Utc>,
    pub resource: Option<&'a str>,
}

/// One case's ordered event history.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    #[serde(default)]
    pub events: Vec<LogEvent>,
}

impl Trace {
    pub fn new(events: Vec<LogEvent>) -> Self {
        Self {
            case_id: None,
            events,
        }
    }

    pub fn with_case_id(mut self, case_id: impl Into<String>) -> Self {
        self.case_id = Some(case_id.into());
        self
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// An already-parsed event log.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventLog {
    #[serde(default)]
    pub traces: Vec<Trace>,
}

impl EventLog {
    pub fn new(traces: Vec<Trace>) -> Self {
        Self { traces }
    }

    /// Decode the JSON form of a log.
    pub fn from_reader<R: Read>(reader: R) -> crate::Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Decode the JSON form of a log from a string.
    pub fn from_json_str(s: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn len(&self) -> usize {
        self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Total number of recorded events across all traces.
    pub fn event_count(&self) -> usize {
        self.traces.iter().map(Trace::len).sum()
    }

    /// Distinct resource identifiers observed anywhere in the log, sorted.
    pub fn resources(&self) -> BTreeSet<&str> {
        self.traces
            .iter()
            .flat_map(|t| t.events.iter())
            .filter_map(|e| e.resource.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn lifecycle_parses_unknown_as_atomic() {
        assert_eq!("start".parse::<Lifecycle>().unwrap(), Lifecycle::Start);
        assert_eq!("COMPLETE".parse::<Lifecycle>().unwrap(), Lifecycle::Complete);
        assert_eq!("schedule".parse::<Lifecycle>().unwrap(), Lifecycle::Atomic);

        let decoded: Lifecycle = serde_json::from_str("\"assign\"").unwrap();
        assert_eq!(decoded, Lifecycle::Atomic);
    }

    #[test]
    fn event_view_reports_first_missing_field() {
        let mut e = LogEvent::new("A", Lifecycle::Start, ts(0));
        assert!(e.event().is_ok());

        e.timestamp = None;
        assert_eq!(e.event().unwrap_err(), MissingField::Timestamp);

        e.activity = None;
        assert_eq!(e.event().unwrap_err(), MissingField::Activity);
    }

    #[test]
    fn decodes_xes_style_keys() {
        let json = r#"{
            "traces": [{
                "case_id": "c1",
                "events": [
                    {"concept:name": "Register", "lifecycle:transition": "start",
                     "time:timestamp": "2024-03-01T10:00:00+01:00", "org:resource": "ann"},
                    {"activity": "Register", "lifecycle": "complete",
                     "timestamp": "2024-03-01T09:05:30.250Z"}
                ]
            }]
        }"#;
        let log = EventLog::from_json_str(json).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.event_count(), 2);

        let first = log.traces[0].events[0].event().unwrap();
        assert_eq!(first.activity, "Register");
        assert_eq!(first.resource, Some("ann"));
        assert_eq!(first.timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());

        let second = log.traces[0].events[1].event().unwrap();
        assert_eq!(second.lifecycle, Lifecycle::Complete);
        let gap = (second.timestamp - first.timestamp).num_milliseconds();
        assert_eq!(gap, 330_250);
    }

    #[test]
    fn resources_are_distinct_and_sorted() {
        let log = EventLog::new(vec![
            Trace::new(vec![
                LogEvent::new("A", Lifecycle::Complete, ts(0)).with_resource("r2"),
                LogEvent::new("B", Lifecycle::Complete, ts(1)).with_resource("r1"),
            ]),
            Trace::new(vec![
                LogEvent::new("A", Lifecycle::Complete, ts(2)).with_resource("r2"),
                LogEvent::new("C", Lifecycle::Complete, ts(3)),
            ]),
        ]);
        let resources: Vec<&str> = log.resources().into_iter().collect();
        assert_eq!(resources, vec!["r1", "r2"]);
    }
}
