//! Structured event vocabulary.
//!
//! Every log line emitted by the core carries an `event` field with one of the
//! stable names below, so JSONL consumers can filter without parsing messages.

use serde::Serialize;

/// Severity column of a JSONL line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        [
            (tracing::Level::ERROR, Level::Error),
            (tracing::Level::WARN, Level::Warn),
            (tracing::Level::INFO, Level::Info),
            (tracing::Level::DEBUG, Level::Debug),
        ]
        .into_iter()
        .find_map(|(candidate, mapped)| (candidate == level).then_some(mapped))
        .unwrap_or(Level::Trace)
    }
}

/// Value of the `stage` span field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Startup and configuration.
    Init,
    /// Turning the event log into sample sets.
    Extract,
    /// Fitting candidate distributions.
    Fit,
    /// Writing the payload.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Extract => "extract",
            Stage::Fit => "fit",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

/// Values of the `event` field, grouped by the stage that emits them.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";
    pub const INPUT_ERROR: &str = "run.input_error";
    pub const INTERNAL_ERROR: &str = "run.internal_error";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const EXTRACT_EVENT_SKIPPED: &str = "extract.event_skipped";
    pub const EXTRACT_FINISHED: &str = "extract.finished";

    pub const FIT_DEGENERATE: &str = "fit.degenerate";
    pub const FIT_CANDIDATE_FAILED: &str = "fit.candidate_failed";
    pub const FIT_SELECTED: &str = "fit.selected";
    pub const FIT_KEY_FAILED: &str = "fit.key_failed";
    pub const FIT_FINISHED: &str = "fit.finished";
}
