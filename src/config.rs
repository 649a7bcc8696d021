//! Search configuration.
use serde::{Deserialize, Serialize};

use crate::error::FeatureSelectionError;

fn default_folds() -> usize {
    5
}

/// Configuration for a plus-L minus-R search.
///
/// `to_add` (L) and `to_remove` (R) must be positive and different; their
/// relative magnitude picks the search branch. Validation is eager so a
/// degenerate configuration never reaches the evaluation oracle.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LrsConfig {
    /// Number of features to greedily add (L).
    pub to_add: usize,
    /// Number of features to greedily remove (R).
    pub to_remove: usize,
    /// Cross-validation folds used per candidate evaluation.
    #[serde(default = "default_folds")]
    pub folds: usize,
    /// Seed for reproducible fold assignment; a random seed when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl LrsConfig {
    pub fn new(to_add: usize, to_remove: usize) -> Result<Self, FeatureSelectionError> {
        let config = LrsConfig {
            to_add,
            to_remove,
            folds: default_folds(),
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration; also used for configs built by deserialization.
    pub fn validate(&self) -> Result<(), FeatureSelectionError> {
        if self.to_add == self.to_remove {
            return Err(FeatureSelectionError::Configuration(
                "L and R must be different".to_string(),
            ));
        }
        if self.to_add == 0 || self.to_remove == 0 {
            return Err(FeatureSelectionError::Configuration(format!(
                "L and R must be positive, got L={} R={}",
                self.to_add, self.to_remove
            )));
        }
        if self.folds < 2 {
            return Err(FeatureSelectionError::Configuration(format!(
                "cross-validation needs at least 2 folds, got {}",
                self.folds
            )));
        }
        Ok(())
    }
}

impl Default for LrsConfig {
    fn default() -> Self {
        LrsConfig {
            to_add: 2,
            to_remove: 1,
            folds: default_folds(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_l_and_r_is_rejected() {
        assert!(LrsConfig::new(3, 3).is_err());
        assert!(LrsConfig::new(3, 1).is_ok());
        assert!(LrsConfig::new(1, 3).is_ok());
    }

    #[test]
    fn zero_counts_and_bad_folds_are_rejected() {
        assert!(LrsConfig::new(0, 2).is_err());
        assert!(LrsConfig::new(2, 0).is_err());
        let config = LrsConfig::new(2, 1).unwrap().with_folds(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_is_valid() {
        assert!(LrsConfig::default().validate().is_ok());
        assert_eq!(LrsConfig::default().folds, 5);
    }
}
