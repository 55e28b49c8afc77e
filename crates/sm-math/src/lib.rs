//! Simulation Miner math utilities.

pub mod math;

pub use math::descriptive::*;
pub use math::optimize::*;
pub use math::stable::*;
pub use math::wasserstein::*;
