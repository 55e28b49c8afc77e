//! Distribution fitting.
//!
//! - [`candidate`]: the closed registry of parametric models
//! - [`estimate`]: maximum-likelihood estimators behind each model
//! - [`selector`]: fit all candidates, score by Wasserstein distance, pick one
//!
//! Scoring draws synthetic samples, so every fit is seeded: the same sample set
//! and [`FitConfig`] always select the same distribution with the same scores.

pub mod candidate;
pub mod estimate;
pub mod selector;

pub use candidate::Candidate;
pub use selector::{remove_outliers, WassersteinFitter};

use serde::{Deserialize, Serialize};
use sm_common::{FitResult, Result, SampleSet};

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Options for one fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Drop observations outside the Tukey fences before fitting.
    pub remove_outliers: bool,
    /// Synthetic draws per candidate; defaults to the observation count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<usize>,
    pub seed: u64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            remove_outliers: false,
            sample_count: None,
            seed: DEFAULT_SEED,
        }
    }
}

/// Anything that turns one sample set into a fit result.
///
/// Orchestrators are generic over this so per-key behavior can be swapped.
pub trait SampleFitter: Sync {
    fn fit(&self, samples: &SampleSet) -> Result<FitResult>;
}

impl<F> SampleFitter for F
where
    F: Fn(&SampleSet) -> Result<FitResult> + Sync,
{
    fn fit(&self, samples: &SampleSet) -> Result<FitResult> {
        self(samples)
    }
}
