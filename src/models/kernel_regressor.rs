//! Kernel-weighted (Nadaraya-Watson) regressor.
use std::sync::Arc;

use crate::dataset::{DataPoint, Dataset, RegressionDataset};
use crate::error::FeatureSelectionError;
use crate::kernels::{Gauss, KernelFunction};
use crate::models::traits::Regressor;

/// Predicts a kernel-weighted average of the training targets.
///
/// Distances mix squared numeric differences with a unit penalty per
/// categorical mismatch. Queries landing past the kernel cut-off for every
/// training point fall back to the global target mean.
#[derive(Clone)]
pub struct KernelRegressor {
    kernel: Arc<dyn KernelFunction>,
    bandwidth: f64,
    fitted: Option<Fitted>,
}

#[derive(Clone)]
struct Fitted {
    points: Vec<DataPoint>,
    targets: Vec<f64>,
    target_mean: f64,
}

impl KernelRegressor {
    pub fn new(bandwidth: f64) -> Self {
        KernelRegressor {
            kernel: Arc::new(Gauss::new()),
            bandwidth,
            fitted: None,
        }
    }

    pub fn with_kernel(kernel: Arc<dyn KernelFunction>, bandwidth: f64) -> Self {
        KernelRegressor {
            kernel,
            bandwidth,
            fitted: None,
        }
    }

    fn distance(a: &DataPoint, b: &DataPoint) -> f64 {
        let mut dist = 0.0;
        for (x, y) in a.numeric.iter().zip(b.numeric.iter()) {
            let d = x - y;
            dist += d * d;
        }
        for (x, y) in a.categorical.iter().zip(b.categorical.iter()) {
            if x != y {
                dist += 1.0;
            }
        }
        dist.sqrt()
    }
}

impl Regressor for KernelRegressor {
    fn fit(&mut self, data: &RegressionDataset) -> Result<(), FeatureSelectionError> {
        if data.is_empty() {
            return Err(FeatureSelectionError::Evaluation(
                "kernel regressor fit on an empty training split".to_string(),
            ));
        }
        if !(self.bandwidth > 0.0) {
            return Err(FeatureSelectionError::Evaluation(format!(
                "kernel bandwidth must be positive, got {}",
                self.bandwidth
            )));
        }
        let points: Vec<DataPoint> = (0..data.len()).map(|i| data.point(i).clone()).collect();
        let targets = data.targets().to_vec();
        let target_mean = targets.iter().sum::<f64>() / targets.len() as f64;
        self.fitted = Some(Fitted {
            points,
            targets,
            target_mean,
        });
        Ok(())
    }

    fn predict(&self, point: &DataPoint) -> Result<f64, FeatureSelectionError> {
        let fitted = self.fitted.as_ref().ok_or_else(|| {
            FeatureSelectionError::Evaluation("kernel regressor predict before fit".to_string())
        })?;

        let cut_off = self.kernel.cut_off();
        let mut weight_sum = 0.0;
        let mut weighted = 0.0;
        for (train, &target) in fitted.points.iter().zip(fitted.targets.iter()) {
            let u = Self::distance(train, point) / self.bandwidth;
            if u > cut_off {
                continue;
            }
            let w = self.kernel.k(u) * train.weight;
            weight_sum += w;
            weighted += w * target;
        }

        if weight_sum <= 0.0 {
            return Ok(fitted.target_mean);
        }
        Ok(weighted / weight_sum)
    }

    fn clone_box(&self) -> Box<dyn Regressor> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        "kernel-regressor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::Epanechnikov;
    use ndarray::array;

    #[test]
    fn interpolates_locally() {
        let ds = RegressionDataset::from_numeric(
            vec![array![0.0], array![1.0], array![10.0], array![11.0]],
            vec![0.0, 1.0, 10.0, 11.0],
        )
        .unwrap();
        let mut model = KernelRegressor::new(0.5);
        model.fit(&ds).unwrap();
        let low = model.predict(&DataPoint::new(vec![], array![0.4])).unwrap();
        let high = model.predict(&DataPoint::new(vec![], array![10.6])).unwrap();
        assert!(low < 2.0, "expected a prediction near the low cluster, got {low}");
        assert!(high > 9.0, "expected a prediction near the high cluster, got {high}");
    }

    #[test]
    fn falls_back_to_mean_outside_support() {
        let ds = RegressionDataset::from_numeric(
            vec![array![0.0], array![1.0]],
            vec![2.0, 4.0],
        )
        .unwrap();
        let mut model =
            KernelRegressor::with_kernel(Arc::new(Epanechnikov), 0.1);
        model.fit(&ds).unwrap();
        // query far past the cut-off of every training point
        let out = model.predict(&DataPoint::new(vec![], array![100.0])).unwrap();
        assert!((out - 3.0).abs() < 1e-12);
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = KernelRegressor::new(1.0);
        assert!(model.predict(&DataPoint::new(vec![], array![0.0])).is_err());
    }
}
