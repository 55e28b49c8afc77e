//! Output schemas for fitted distributions.
//!
//! Parameter records keep a fixed key order: the model parameters in the order
//! the model declares them, then the descriptive `max` and `mean`. Maps are
//! therefore serialized from ordered vectors rather than hash maps.

use crate::distribution::DistributionKind;
use crate::error::CandidateFailure;
use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Structured JSON (default for machine consumption)
    #[default]
    Json,

    /// One line per key for quick inspection
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// One named model parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Parameter {
    pub name: &'static str,
    pub value: f64,
}

impl Parameter {
    pub const fn new(name: &'static str, value: f64) -> Self {
        Self { name, value }
    }
}

/// Descriptive statistics of the observed samples. Not used for selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Upper whisker `Q3 + 1.5 * IQR`.
    pub max: f64,
    pub mean: f64,
}

/// Parameter record of a fitted distribution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FittedParameters {
    pub model: Vec<Parameter>,
    pub summary: Option<SampleSummary>,
}

impl FittedParameters {
    pub fn new(model: Vec<Parameter>) -> Self {
        Self {
            model,
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: SampleSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Look up a parameter by name, including `max` and `mean`.
    pub fn get(&self, name: &str) -> Option<f64> {
        if let Some(p) = self.model.iter().find(|p| p.name == name) {
            return Some(p.value);
        }
        match (name, self.summary) {
            ("max", Some(s)) => Some(s.max),
            ("mean", Some(s)) => Some(s.mean),
            _ => None,
        }
    }

    /// Model parameter values in declaration order.
    pub fn model_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.model.iter().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.model.len() + if self.summary.is_some() { 2 } else { 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for FittedParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for p in &self.model {
            map.serialize_entry(p.name, &p.value)?;
        }
        if let Some(summary) = &self.summary {
            map.serialize_entry("max", &summary.max)?;
            map.serialize_entry("mean", &summary.mean)?;
        }
        map.end()
    }
}

/// Wasserstein distance per surviving candidate, in evaluation order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoodnessScores(pub Vec<(DistributionKind, f64)>);

impl GoodnessScores {
    pub fn get(&self, kind: DistributionKind) -> Option<f64> {
        self.0.iter().find(|(k, _)| *k == kind).map(|(_, d)| *d)
    }

    /// Smallest distance; the earliest entry wins ties.
    pub fn best(&self) -> Option<(DistributionKind, f64)> {
        let mut best: Option<(DistributionKind, f64)> = None;
        for &(kind, distance) in &self.0 {
            match best {
                Some((_, d)) if distance >= d => {}
                _ => best = Some((kind, distance)),
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for GoodnessScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (kind, distance) in &self.0 {
            map.serialize_entry(kind.as_str(), distance)?;
        }
        map.end()
    }
}

/// Outcome of fitting one sample set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    pub distribution: DistributionKind,
    pub parameters: FittedParameters,
    pub goodness: GoodnessScores,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<CandidateFailure>,
    /// Observations that reached the fitter (after outlier removal).
    pub sample_count: usize,
    /// True when every observation was equal and scoring was skipped.
    pub degenerate: bool,
}

impl FitResult {
    pub fn distribution_name(&self) -> &'static str {
        self.distribution.as_str()
    }
}

/// Distribution name and parameters for one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionFit {
    pub distribution_name: String,
    pub parameters: FittedParameters,
}

impl From<&FitResult> for DistributionFit {
    fn from(fit: &FitResult) -> Self {
        Self {
            distribution_name: fit.distribution_name().to_string(),
            parameters: fit.parameters.clone(),
        }
    }
}

/// Activity → fitted duration distribution.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ActivityReport {
    pub distributions: BTreeMap<String, DistributionFit>,
    /// Keys whose fit failed, with the reason.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, String>,
}

impl ActivityReport {
    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty() && self.failures.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Resource → activity → fitted duration distribution.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResourceReport {
    pub resources: BTreeMap<String, ActivityReport>,
}

impl ResourceReport {
    pub fn has_failures(&self) -> bool {
        self.resources.values().any(ActivityReport::has_failures)
    }

    pub fn fitted_count(&self) -> usize {
        self.resources.values().map(|r| r.distributions.len()).sum()
    }
}

/// A parameter value without its name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamValue {
    pub value: f64,
}

/// Inter-arrival distribution with its parameters as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalDistribution {
    pub distribution_name: String,
    pub distribution_params: Vec<ParamValue>,
}

/// Fitted case inter-arrival distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterArrivalReport {
    pub arrival_time_distribution: ArrivalDistribution,
}

impl From<&FitResult> for InterArrivalReport {
    fn from(fit: &FitResult) -> Self {
        Self {
            arrival_time_distribution: ArrivalDistribution {
                distribution_name: fit.distribution_name().to_string(),
                distribution_params: fit
                    .parameters
                    .model_values()
                    .map(|value| ParamValue { value })
                    .collect(),
            },
        }
    }
}

/// Activity → resources that performed it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterReport {
    pub roles: BTreeMap<String, BTreeSet<String>>,
}
