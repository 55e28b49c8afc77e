//! Simulation Miner common types and errors.
//!
//! This crate provides foundational types shared across sm-core modules:
//! - Event log model (lifecycle transitions, events, traces)
//! - Sample sets extracted from a log
//! - The closed set of candidate distribution kinds
//! - Common error types
//! - Output schemas for fitted distributions

pub mod distribution;
pub mod error;
pub mod event;
pub mod output;
pub mod sample;

pub use distribution::DistributionKind;
pub use error::{CandidateFailure, CandidateFailureReason, Error, ErrorCategory, Result};
pub use event::{Event, EventLog, Lifecycle, LogEvent, MissingField, Trace};
pub use output::{
    ActivityReport, ArrivalDistribution, DistributionFit, FitResult, FittedParameters,
    GoodnessScores, InterArrivalReport, OutputFormat, ParamValue, Parameter, ResourceReport,
    RosterReport, SampleSummary,
};
pub use sample::SampleSet;

/// Schema version stamped into CLI JSON payloads.
pub const SCHEMA_VERSION: &str = "1.0.0";
