pub mod kernel_regressor;
pub mod nearest_centroid;
pub mod traits;

pub use kernel_regressor::KernelRegressor;
pub use nearest_centroid::NearestCentroid;
pub use traits::{Classifier, Regressor};
