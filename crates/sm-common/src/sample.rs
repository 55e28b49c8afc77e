//! Sample sets extracted from an event log.

use serde::{Deserialize, Serialize};

/// Observations (seconds) attributed to one key: an activity, a resource,
/// or the inter-arrival series. Order is extraction order; ties allowed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleSet {
    pub key: String,
    pub values: Vec<f64>,
}

impl SampleSet {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: Vec::new(),
        }
    }

    pub fn from_values(key: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Check the set can be handed to the fitter.
    pub fn ensure_fittable(&self) -> crate::Result<()> {
        if self.values.is_empty() {
            return Err(crate::Error::EmptySampleSet {
                key: self.key.clone(),
            });
        }
        if let Some(bad) = self.values.iter().find(|v| !v.is_finite()) {
            return Err(crate::Error::InvalidSamples(format!(
                "'{}' contains non-finite observation {}",
                self.key, bad
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_set_is_not_fittable() {
        let set = SampleSet::new("A");
        assert!(matches!(
            set.ensure_fittable(),
            Err(Error::EmptySampleSet { key }) if key == "A"
        ));
    }

    #[test]
    fn non_finite_values_rejected() {
        let set = SampleSet::from_values("A", vec![1.0, f64::NAN]);
        assert!(matches!(set.ensure_fittable(), Err(Error::InvalidSamples(_))));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut set = SampleSet::new("A");
        set.push(2.0);
        set.push(2.0);
        assert_eq!(set.len(), 2);
        assert!(set.ensure_fittable().is_ok());
    }
}
