//! Fuzz target for mining configuration parsing.
//!
//! Tests that JSON and TOML config parsing and validation handle arbitrary
//! input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sm_core::config::MiningConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<MiningConfig>(data) {
        let _ = config.validate();
    }
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = toml::from_str::<MiningConfig>(text) {
            let _ = config.validate();
        }
    }
});
