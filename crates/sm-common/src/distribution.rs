//! Candidate distribution kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of parametric models a sample set can be classified as.
///
/// Declaration order is evaluation order, and ties in goodness of fit go to the
/// kind declared first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    /// Constant value (the sample mean).
    Fixed,
    /// Normal with `loc` (mean) and `scale` (standard deviation).
    Normal,
    /// Shifted exponential with `loc` and `scale`.
    Exponential,
    /// Uniform on `[loc, loc + scale]`.
    Uniform,
    /// Triangular on `[loc, loc + scale]` with mode at `loc + c * scale`.
    Triangular,
    /// Shifted lognormal with shape `s`, `loc` and `scale = exp(mu)`.
    Lognormal,
    /// Shifted gamma with shape `a`, `loc` and `scale`.
    Gamma,
}

impl DistributionKind {
    /// All kinds in evaluation order.
    pub const ALL: [DistributionKind; 7] = [
        DistributionKind::Fixed,
        DistributionKind::Normal,
        DistributionKind::Exponential,
        DistributionKind::Uniform,
        DistributionKind::Triangular,
        DistributionKind::Lognormal,
        DistributionKind::Gamma,
    ];

    /// Stable name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionKind::Fixed => "fixed",
            DistributionKind::Normal => "normal",
            DistributionKind::Exponential => "exponential",
            DistributionKind::Uniform => "uniform",
            DistributionKind::Triangular => "triangular",
            DistributionKind::Lognormal => "lognormal",
            DistributionKind::Gamma => "gamma",
        }
    }

    /// Position in [`DistributionKind::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Parse a kind name (case-insensitive).
    pub fn parse(s: &str) -> Option<DistributionKind> {
        DistributionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DistributionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistributionKind::parse(s).ok_or_else(|| format!("unknown distribution: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_order_is_stable() {
        let names: Vec<&str> = DistributionKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["fixed", "normal", "exponential", "uniform", "triangular", "lognormal", "gamma"]
        );
        for (i, kind) in DistributionKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn parse_round_trips_names() {
        for kind in DistributionKind::ALL {
            assert_eq!(kind.as_str().parse::<DistributionKind>().unwrap(), kind);
        }
        assert_eq!(DistributionKind::parse(" Gamma "), Some(DistributionKind::Gamma));
        assert!(DistributionKind::parse("weibull").is_none());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&DistributionKind::Lognormal).unwrap();
        assert_eq!(json, "\"lognormal\"");
    }
}
