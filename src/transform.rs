//! Attribute-removal projection built from a finished search.
//!
//! The final `catToRemove`/`numToRemove` sets are compiled once into keep-index
//! maps; every subsequent projection call just walks those maps. The transform
//! is immutable, deterministic and side-effect free.
use std::collections::BTreeSet;

use ndarray::Array1;

use crate::dataset::{
    CategoricalInfo, ClassificationDataset, DataPoint, Dataset, RegressionDataset,
};

/// Projection from a full feature vector to the retained-feature subspace.
///
/// Relative order of the surviving indices is preserved.
#[derive(Debug, Clone)]
pub struct RemoveAttributeTransform {
    kept_cat: Vec<usize>,
    kept_num: Vec<usize>,
    num_categorical: usize,
    num_numeric: usize,
}

impl RemoveAttributeTransform {
    /// Compile the removal sets (local index spaces) into a frozen projection.
    pub fn new(
        num_categorical: usize,
        num_numeric: usize,
        cat_to_remove: &BTreeSet<usize>,
        num_to_remove: &BTreeSet<usize>,
    ) -> Self {
        let kept_cat = (0..num_categorical)
            .filter(|i| !cat_to_remove.contains(i))
            .collect();
        let kept_num = (0..num_numeric)
            .filter(|i| !num_to_remove.contains(i))
            .collect();
        RemoveAttributeTransform {
            kept_cat,
            kept_num,
            num_categorical,
            num_numeric,
        }
    }

    /// Number of features surviving the projection.
    pub fn output_features(&self) -> usize {
        self.kept_cat.len() + self.kept_num.len()
    }

    pub fn kept_categorical(&self) -> &[usize] {
        &self.kept_cat
    }

    pub fn kept_numerical(&self) -> &[usize] {
        &self.kept_num
    }

    /// Project one data point onto the retained subspace.
    pub fn transform(&self, point: &DataPoint) -> DataPoint {
        debug_assert_eq!(point.categorical.len(), self.num_categorical);
        debug_assert_eq!(point.numeric.len(), self.num_numeric);
        let categorical = self.kept_cat.iter().map(|&i| point.categorical[i]).collect();
        let numeric: Array1<f64> = self.kept_num.iter().map(|&i| point.numeric[i]).collect();
        DataPoint {
            categorical,
            numeric,
            weight: point.weight,
        }
    }

    fn project_categories(&self, categories: &[CategoricalInfo]) -> Vec<CategoricalInfo> {
        self.kept_cat.iter().map(|&i| categories[i].clone()).collect()
    }

    /// Project a whole classification dataset (used by the cross-validation
    /// oracle to score feature subsets).
    pub fn project_classification(&self, ds: &ClassificationDataset) -> ClassificationDataset {
        let points = (0..ds.len()).map(|i| self.transform(ds.point(i))).collect();
        ClassificationDataset::from_parts(
            points,
            ds.labels().to_vec(),
            self.project_categories(ds.categories()),
            self.kept_num.len(),
            ds.num_classes(),
        )
    }

    /// Project a whole regression dataset.
    pub fn project_regression(&self, ds: &RegressionDataset) -> RegressionDataset {
        let points = (0..ds.len()).map(|i| self.transform(ds.point(i))).collect();
        RegressionDataset::from_parts(
            points,
            ds.targets().to_vec(),
            self.project_categories(ds.categories()),
            self.kept_num.len(),
        )
    }
}
