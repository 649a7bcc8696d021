//! Cross-validated scoring oracle.
//!
//! Given a model and a (feature-projected) dataset view, score the model by
//! shuffled k-fold cross-validation. The model is cloned per fold; the passed
//! rng is consumed for fold assignment only, so a fixed seed gives a fixed
//! score. Lower is better for both oracles: weighted error rate for
//! classification, mean squared error for regression.
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dataset::{ClassificationDataset, Dataset, RegressionDataset};
use crate::error::FeatureSelectionError;
use crate::metrics::{ErrorRate, MeanSquaredError};
use crate::models::traits::{Classifier, Regressor};

/// Shuffle `0..n` and deal the indices round-robin into `folds` buckets.
pub fn kfold_indices(n: usize, folds: usize, rng: &mut impl Rng) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let mut buckets = vec![Vec::with_capacity(n / folds + 1); folds];
    for (i, idx) in order.into_iter().enumerate() {
        buckets[i % folds].push(idx);
    }
    buckets
}

fn check_folds(folds: usize, n: usize) -> Result<(), FeatureSelectionError> {
    if folds < 2 {
        return Err(FeatureSelectionError::Evaluation(format!(
            "cross-validation needs at least 2 folds, got {}",
            folds
        )));
    }
    if folds > n {
        return Err(FeatureSelectionError::Evaluation(format!(
            "cannot split {} samples into {} folds",
            n, folds
        )));
    }
    Ok(())
}

/// Cross-validated weighted error rate of `model` on `data`.
pub fn cross_validate_classifier(
    model: &dyn Classifier,
    data: &ClassificationDataset,
    folds: usize,
    rng: &mut impl Rng,
) -> Result<f64, FeatureSelectionError> {
    check_folds(folds, data.len())?;

    let buckets = kfold_indices(data.len(), folds, rng);
    let mut scorer = ErrorRate::new();
    for held_out in 0..folds {
        let train_indices: Vec<usize> = buckets
            .iter()
            .enumerate()
            .filter(|&(f, _)| f != held_out)
            .flat_map(|(_, b)| b.iter().copied())
            .collect();
        let train = data.subset(&train_indices);
        let test = data.subset(&buckets[held_out]);

        let mut fold_model = model.clone_box();
        fold_model.fit(&train)?;
        for i in 0..test.len() {
            let point = test.point(i);
            let predicted = fold_model.predict(point)?;
            scorer.add_result(predicted, test.label(i), point.weight);
        }
    }
    Ok(scorer.score())
}

/// Cross-validated mean squared error of `model` on `data`.
pub fn cross_validate_regressor(
    model: &dyn Regressor,
    data: &RegressionDataset,
    folds: usize,
    rng: &mut impl Rng,
) -> Result<f64, FeatureSelectionError> {
    check_folds(folds, data.len())?;

    let buckets = kfold_indices(data.len(), folds, rng);
    let mut scorer = MeanSquaredError::new();
    for held_out in 0..folds {
        let train_indices: Vec<usize> = buckets
            .iter()
            .enumerate()
            .filter(|&(f, _)| f != held_out)
            .flat_map(|(_, b)| b.iter().copied())
            .collect();
        let train = data.subset(&train_indices);
        let test = data.subset(&buckets[held_out]);

        let mut fold_model = model.clone_box();
        fold_model.fit(&train)?;
        for i in 0..test.len() {
            let point = test.point(i);
            let predicted = fold_model.predict(point)?;
            scorer.add_result(predicted, test.target(i), point.weight);
        }
    }
    Ok(scorer.score())
}
