//! Simulation Miner core library.
//!
//! Turns recorded event logs into fitted parametric distributions for process
//! simulation:
//! - [`extract`]: event pairing into duration and inter-arrival samples
//! - [`fit`]: candidate registry and Wasserstein-based selection
//! - [`mining`]: per-activity, per-resource and inter-arrival orchestrators
//! - [`config`], [`logging`], [`exit_codes`]: ambient plumbing for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod exit_codes;
pub mod extract;
pub mod fit;
pub mod logging;
pub mod mining;
