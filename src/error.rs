use std::error::Error;
use std::fmt;

/// Error type for feature-selection failures.
///
/// The search core is fail-fast: the only error it prevents up front is a
/// degenerate configuration, everything raised by the evaluation oracle
/// propagates unrecovered and aborts the search.
#[derive(Debug)]
pub enum FeatureSelectionError {
    /// Invalid configuration (e.g. `to_add == to_remove`), rejected before any
    /// evaluation work is performed.
    Configuration(String),
    /// The projection was invoked before a search produced a final mask.
    UntrainedTransform,
    /// Failure raised by a model or the cross-validation oracle.
    Evaluation(String),
}

impl fmt::Display for FeatureSelectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FeatureSelectionError::Configuration(msg) => {
                write!(f, "invalid configuration: {}", msg)
            }
            FeatureSelectionError::UntrainedTransform => {
                write!(f, "transform invoked before the search produced a final mask")
            }
            FeatureSelectionError::Evaluation(msg) => write!(f, "evaluation failed: {}", msg),
        }
    }
}

impl Error for FeatureSelectionError {}
