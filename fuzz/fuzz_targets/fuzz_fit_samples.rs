//! Fuzz target for distribution selection.
//!
//! Arbitrary finite observations must either fit or fail with an error; a
//! successful fit always names a candidate with a finite score.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sm_common::SampleSet;
use sm_core::fit::{FitConfig, SampleFitter, WassersteinFitter};

#[derive(Debug, Arbitrary)]
struct FitInput {
    values: Vec<f64>,
    remove_outliers: bool,
    draws: u8,
    seed: u64,
}

fuzz_target!(|input: FitInput| {
    let values: Vec<f64> = input
        .values
        .into_iter()
        .filter(|v| v.is_finite() && v.abs() < 1.0e12)
        .take(256)
        .collect();
    if values.is_empty() {
        return;
    }

    let fitter = WassersteinFitter::new(FitConfig {
        remove_outliers: input.remove_outliers,
        sample_count: Some(usize::from(input.draws).max(1)),
        seed: input.seed,
    });
    if let Ok(fit) = fitter.fit(&SampleSet::from_values("fuzz", values)) {
        if !fit.degenerate {
            let score = fit.goodness.get(fit.distribution);
            assert!(score.is_some_and(f64::is_finite));
        }
    }
});
