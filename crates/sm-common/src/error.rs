//! Error types for Simulation Miner.
//!
//! Failures are local to the key or candidate they originate in:
//! - [`CandidateFailure`] records one distribution that could not be fitted or
//!   sampled. It is data carried in the fit result, never propagated.
//! - [`Error::Fitting`] means every candidate failed for one key.
//! - [`Error::EmptySampleSet`] means a key produced no observations.
//! - [`Error::MalformedEvent`] describes an event skipped during extraction.
//!
//! Errors carry stable numeric codes grouped by category so the CLI can report
//! them in machine-readable form.

use crate::distribution::DistributionKind;
use crate::event::MissingField;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for Simulation Miner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Turning events into sample sets.
    Extraction,
    /// Fitting candidate distributions.
    Fitting,
    /// Configuration loading and validation.
    Config,
    /// File I/O and serialization.
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Extraction => write!(f, "extraction"),
            ErrorCategory::Fitting => write!(f, "fitting"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Why a single candidate distribution was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "detail", rename_all = "snake_case")]
pub enum CandidateFailureReason {
    /// Parameter estimation did not converge or hit an invalid domain.
    Estimation(String),
    /// The fitted parameters were rejected by the sampler.
    Sampling(String),
    /// Estimation produced NaN or infinite parameters.
    NonFinite,
}

impl fmt::Display for CandidateFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateFailureReason::Estimation(msg) => write!(f, "estimation failed: {}", msg),
            CandidateFailureReason::Sampling(msg) => write!(f, "sampling failed: {}", msg),
            CandidateFailureReason::NonFinite => write!(f, "non-finite parameter estimate"),
        }
    }
}

/// One candidate that dropped out of selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFailure {
    pub candidate: DistributionKind,
    pub reason: CandidateFailureReason,
}

impl CandidateFailure {
    pub fn new(candidate: DistributionKind, reason: CandidateFailureReason) -> Self {
        Self { candidate, reason }
    }
}

impl fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.candidate, self.reason)
    }
}

/// Unified error type for Simulation Miner.
#[derive(Error, Debug)]
pub enum Error {
    // Extraction errors (10-19)
    #[error("no observations for '{key}'")]
    EmptySampleSet { key: String },

    #[error("trace {trace}, event {index}: missing {missing}")]
    MalformedEvent {
        trace: usize,
        index: usize,
        missing: MissingField,
    },

    #[error("invalid samples: {0}")]
    InvalidSamples(String),

    // Fitting errors (20-29)
    #[error("no distribution could be fitted for '{key}' ({} candidates failed)", failures.len())]
    Fitting {
        key: String,
        failures: Vec<CandidateFailure>,
    },

    // Configuration errors (30-39)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Extraction errors
    /// - 20-29: Fitting errors
    /// - 30-39: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::EmptySampleSet { .. } => 10,
            Error::MalformedEvent { .. } => 11,
            Error::InvalidSamples(_) => 12,
            Error::Fitting { .. } => 20,
            Error::Config(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::EmptySampleSet { .. } | Error::MalformedEvent { .. } | Error::InvalidSamples(_) => {
                ErrorCategory::Extraction
            }
            Error::Fitting { .. } => ErrorCategory::Fitting,
            Error::Config(_) => ErrorCategory::Config,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether the error concerns a single key rather than the whole run.
    pub fn is_key_local(&self) -> bool {
        matches!(
            self,
            Error::EmptySampleSet { .. } | Error::Fitting { .. } | Error::InvalidSamples(_)
        )
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::EmptySampleSet { .. } => {
                "No paired events produced observations for this key. Check lifecycle transitions in the log."
            }
            Error::MalformedEvent { .. } => {
                "The event is missing a required attribute and was skipped. Fix the exporter that produced the log."
            }
            Error::InvalidSamples(_) => {
                "Observations must be finite numbers of seconds. Check timestamps for corrupt values."
            }
            Error::Fitting { .. } => {
                "Every candidate distribution failed. Inspect the samples or retry with outlier removal."
            }
            Error::Config(_) => "Check the configuration file syntax and values.",
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Invalid JSON input. Check syntax with 'jq . <file>'.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_categories() {
        let empty = Error::EmptySampleSet { key: "A".into() };
        assert_eq!(empty.code(), 10);
        assert_eq!(empty.category(), ErrorCategory::Extraction);

        let fitting = Error::Fitting {
            key: "A".into(),
            failures: vec![],
        };
        assert_eq!(fitting.code(), 20);
        assert_eq!(fitting.category(), ErrorCategory::Fitting);

        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.category(), ErrorCategory::Io);
        assert!(!io.is_key_local());
    }

    #[test]
    fn fitting_error_counts_failures() {
        let err = Error::Fitting {
            key: "Approve".into(),
            failures: vec![
                CandidateFailure::new(DistributionKind::Gamma, CandidateFailureReason::NonFinite),
                CandidateFailure::new(
                    DistributionKind::Lognormal,
                    CandidateFailureReason::Sampling("sigma < 0".into()),
                ),
            ],
        };
        assert_eq!(
            err.to_string(),
            "no distribution could be fitted for 'Approve' (2 candidates failed)"
        );
        assert!(err.is_key_local());
    }

    #[test]
    fn malformed_event_message() {
        let err = Error::MalformedEvent {
            trace: 3,
            index: 7,
            missing: MissingField::Timestamp,
        };
        assert_eq!(err.to_string(), "trace 3, event 7: missing timestamp");
    }

    #[test]
    fn candidate_failure_display() {
        let failure = CandidateFailure::new(
            DistributionKind::Triangular,
            CandidateFailureReason::Estimation("zero width".into()),
        );
        assert_eq!(failure.to_string(), "triangular: estimation failed: zero width");
    }
}
