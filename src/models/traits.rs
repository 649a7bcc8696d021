//! Trainable-model contracts consumed by the search engine.
//!
//! The engine only ever sees these traits: it clones a model per evaluation
//! task (`clone_box`), fits it on a training split and asks for predictions on
//! the held-out split. Implementations must be `Send + Sync` so per-candidate
//! evaluations can fan out across threads.
use crate::dataset::{ClassificationDataset, DataPoint, RegressionDataset};
use crate::error::FeatureSelectionError;

/// A trainable classifier predicting class indices.
pub trait Classifier: Send + Sync {
    fn fit(&mut self, data: &ClassificationDataset) -> Result<(), FeatureSelectionError>;

    fn predict(&self, point: &DataPoint) -> Result<usize, FeatureSelectionError>;

    /// Deep copy behind the trait object. Each concurrent evaluation task gets
    /// its own copy so fits never share mutable state.
    fn clone_box(&self) -> Box<dyn Classifier>;

    fn name(&self) -> &str {
        "classifier"
    }
}

impl Clone for Box<dyn Classifier> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A trainable regressor predicting real values.
pub trait Regressor: Send + Sync {
    fn fit(&mut self, data: &RegressionDataset) -> Result<(), FeatureSelectionError>;

    fn predict(&self, point: &DataPoint) -> Result<f64, FeatureSelectionError>;

    fn clone_box(&self) -> Box<dyn Regressor>;

    fn name(&self) -> &str {
        "regressor"
    }
}

impl Clone for Box<dyn Regressor> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
