//! Core math modules.

pub mod descriptive;
pub mod optimize;
pub mod stable;
pub mod wasserstein;
