//! Per-resource duration mining.
//!
//! Every distinct resource in the log gets its own extraction pass filtered to
//! that resource, then one fit per activity. Resources are independent of each
//! other.

use super::fit_all;
use crate::config::MiningConfig;
use crate::extract::{extract_durations, ResourceFilter};
use crate::fit::{SampleFitter, WassersteinFitter};
use rayon::prelude::*;
use sm_common::{ActivityReport, EventLog, ResourceReport};

/// Fit duration distributions per resource and activity.
pub fn mine_resource_durations(log: &EventLog, config: &MiningConfig) -> ResourceReport {
    let fitter = WassersteinFitter::new(config.fit.clone());
    mine_resource_durations_with(log, config, &fitter)
}

/// [`mine_resource_durations`] with a caller-supplied fitter.
///
/// Every resource named in the log gets an entry, empty when its events close
/// no observation. A configured `resource_filter` restricts which resources
/// are mined.
pub fn mine_resource_durations_with<F: SampleFitter>(
    log: &EventLog,
    config: &MiningConfig,
    fitter: &F,
) -> ResourceReport {
    let resources: Vec<&str> = log
        .resources()
        .into_iter()
        .filter(|r| {
            config
                .resource_filter
                .as_ref()
                .map_or(true, |allowed| allowed.contains(*r))
        })
        .collect();

    let mine_one = |resource: &str| -> (String, ActivityReport) {
        let span = tracing::debug_span!("resource", resource = %resource);
        let _guard = span.enter();

        let only: ResourceFilter = [resource.to_string()].into_iter().collect();
        let samples = extract_durations(log, Some(&only));
        // The outer loop already owns the pool; keys within one resource run inline.
        (resource.to_string(), fit_all(fitter, &samples.by_activity, false))
    };

    let mined: Vec<(String, ActivityReport)> = if config.parallel {
        resources.par_iter().map(|r| mine_one(*r)).collect()
    } else {
        resources.iter().map(|r| mine_one(*r)).collect()
    };

    ResourceReport {
        resources: mined.into_iter().collect(),
    }
}
