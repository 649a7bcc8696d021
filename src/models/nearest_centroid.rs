//! Nearest-centroid classifier over mixed feature spaces.
use ndarray::Array1;

use crate::dataset::{ClassificationDataset, DataPoint, Dataset};
use crate::error::FeatureSelectionError;
use crate::models::traits::Classifier;

#[derive(Debug, Clone)]
struct ClassCentroid {
    label: usize,
    numeric_mean: Array1<f64>,
    categorical_mode: Vec<usize>,
}

/// Classifies a point by the nearest per-class centroid.
///
/// Numeric features contribute squared Euclidean distance to the class mean;
/// each categorical feature contributes 1.0 when the point's code differs from
/// the class mode. Ties go to the lowest class label.
#[derive(Debug, Clone, Default)]
pub struct NearestCentroid {
    centroids: Vec<ClassCentroid>,
}

impl NearestCentroid {
    pub fn new() -> Self {
        NearestCentroid::default()
    }

    fn distance(&self, centroid: &ClassCentroid, point: &DataPoint) -> f64 {
        let mut dist = 0.0;
        for (mean, value) in centroid.numeric_mean.iter().zip(point.numeric.iter()) {
            let d = mean - value;
            dist += d * d;
        }
        for (mode, code) in centroid.categorical_mode.iter().zip(point.categorical.iter()) {
            if mode != code {
                dist += 1.0;
            }
        }
        dist
    }
}

impl Classifier for NearestCentroid {
    fn fit(&mut self, data: &ClassificationDataset) -> Result<(), FeatureSelectionError> {
        if data.is_empty() {
            return Err(FeatureSelectionError::Evaluation(
                "nearest-centroid fit on an empty training split".to_string(),
            ));
        }

        let n_num = data.num_numeric();
        let n_cat = data.num_categorical();
        self.centroids.clear();

        for label in 0..data.num_classes() {
            let members: Vec<usize> =
                (0..data.len()).filter(|&i| data.label(i) == label).collect();
            if members.is_empty() {
                continue;
            }

            let mut numeric_mean = Array1::zeros(n_num);
            for &i in &members {
                numeric_mean += &data.point(i).numeric;
            }
            numeric_mean /= members.len() as f64;

            let mut categorical_mode = Vec::with_capacity(n_cat);
            for j in 0..n_cat {
                let arity = data.categories()[j].arity;
                let mut counts = vec![0usize; arity];
                for &i in &members {
                    counts[data.point(i).categorical[j]] += 1;
                }
                let mode = counts
                    .iter()
                    .enumerate()
                    .max_by_key(|&(code, &count)| (count, std::cmp::Reverse(code)))
                    .map(|(code, _)| code)
                    .unwrap_or(0);
                categorical_mode.push(mode);
            }

            self.centroids.push(ClassCentroid {
                label,
                numeric_mean,
                categorical_mode,
            });
        }

        Ok(())
    }

    fn predict(&self, point: &DataPoint) -> Result<usize, FeatureSelectionError> {
        if self.centroids.is_empty() {
            return Err(FeatureSelectionError::Evaluation(
                "nearest-centroid predict before fit".to_string(),
            ));
        }
        let mut best_label = self.centroids[0].label;
        let mut best_dist = f64::INFINITY;
        for centroid in &self.centroids {
            let dist = self.distance(centroid, point);
            if dist < best_dist {
                best_dist = dist;
                best_label = centroid.label;
            }
        }
        Ok(best_label)
    }

    fn clone_box(&self) -> Box<dyn Classifier> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        "nearest-centroid"
    }
}
