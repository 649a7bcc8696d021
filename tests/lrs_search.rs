//! End-to-end tests for the plus-L minus-R search on classification data.

use std::collections::BTreeSet;

use ndarray::array;

use featsel::config::LrsConfig;
use featsel::dataset::{
    AnyDataset, CategoricalInfo, ClassificationDataset, DataPoint, RegressionDataset,
};
use featsel::error::FeatureSelectionError;
use featsel::feature_selection::{Evaluator, Lrs, LrsFactory};
use featsel::models::{KernelRegressor, NearestCentroid};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Three features: a categorical that alternates independently of the class,
/// a numeric feature that separates the classes perfectly, and a constant.
/// Global index 1 (numeric local 0) is the only informative feature.
fn mixed_dataset() -> ClassificationDataset {
    let mut ds = ClassificationDataset::new(
        vec![CategoricalInfo::new("noise_cat", 2)],
        2,
        2,
    );
    for i in 0..6 {
        ds.push(
            DataPoint::new(vec![i % 2], array![i as f64 * 0.1, 5.0]),
            0,
        )
        .unwrap();
        ds.push(
            DataPoint::new(vec![i % 2], array![10.0 + i as f64 * 0.1, 5.0]),
            1,
        )
        .unwrap();
    }
    ds
}

fn config(l: usize, r: usize) -> LrsConfig {
    LrsConfig::new(l, r).unwrap().with_folds(3).with_seed(1234)
}

// ---------------------------------------------------------------------------
// Search branch properties
// ---------------------------------------------------------------------------

#[test]
fn l_greater_than_r_keeps_exactly_l_minus_r() {
    init_logging();
    let data = mixed_dataset();
    let mut lrs = Lrs::new(config(2, 1)).unwrap();
    lrs.search_classification(&data, &NearestCentroid::new()).unwrap();

    let total = lrs.selected_categorical().len() + lrs.selected_numerical().len();
    assert_eq!(total, 2 - 1);
    // the informative numeric feature must survive the pruning phase
    assert_eq!(
        lrs.selected_numerical(),
        [0usize].into_iter().collect::<BTreeSet<_>>()
    );
    assert_eq!(lrs.projection().unwrap().output_features(), 1);
    assert_eq!(lrs.best_score(), Some(0.0));
}

#[test]
fn l_less_than_r_keeps_nf_minus_r_plus_l() {
    init_logging();
    let data = mixed_dataset();
    let mut lrs = Lrs::new(config(1, 2)).unwrap();
    lrs.search_classification(&data, &NearestCentroid::new()).unwrap();

    let total = lrs.selected_categorical().len() + lrs.selected_numerical().len();
    assert_eq!(total, 3 - 2 + 1);
    // removing the informative feature would cost half the accuracy, so the
    // backward phase keeps it
    assert!(lrs.selected_numerical().contains(&0));
}

#[test]
fn partition_covers_all_features() {
    init_logging();
    let data = mixed_dataset();
    let mut lrs = Lrs::new(config(2, 1)).unwrap();
    lrs.search_classification(&data, &NearestCentroid::new()).unwrap();

    let projection = lrs.projection().unwrap();
    let kept_cat: BTreeSet<usize> = projection.kept_categorical().iter().copied().collect();
    let kept_num: BTreeSet<usize> = projection.kept_numerical().iter().copied().collect();
    assert_eq!(kept_cat, lrs.selected_categorical());
    assert_eq!(kept_num, lrs.selected_numerical());
    // selected and kept agree, and the projection drops everything else
    assert_eq!(
        projection.output_features(),
        lrs.selected_categorical().len() + lrs.selected_numerical().len()
    );
}

#[test]
fn same_seed_same_selection() {
    init_logging();
    let data = mixed_dataset();

    let run = || {
        let mut lrs = Lrs::new(config(2, 1)).unwrap();
        lrs.search_classification(&data, &NearestCentroid::new()).unwrap();
        (lrs.selected_categorical(), lrs.selected_numerical())
    };
    assert_eq!(run(), run());
}

#[test]
fn transform_projects_future_points() {
    init_logging();
    let data = mixed_dataset();
    let mut lrs = Lrs::new(config(2, 1)).unwrap();
    lrs.search_classification(&data, &NearestCentroid::new()).unwrap();

    let out = lrs
        .transform(&DataPoint::new(vec![1], array![42.0, 5.0]))
        .unwrap();
    assert_eq!(out.num_features(), 1);
    assert_eq!(out.numeric, array![42.0]);

    // repeated calls agree (the mask is frozen)
    let again = lrs
        .transform(&DataPoint::new(vec![1], array![42.0, 5.0]))
        .unwrap();
    assert_eq!(out, again);
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

#[test]
fn equal_l_and_r_is_a_configuration_error() {
    let err = LrsConfig::new(2, 2).unwrap_err();
    assert!(matches!(err, FeatureSelectionError::Configuration(_)));

    let factory = LrsFactory::new(
        Evaluator::Classifier(Box::new(NearestCentroid::new())),
        2,
        2,
    );
    assert!(factory.is_err());
}

#[test]
fn transform_before_search_is_a_usage_error() {
    let lrs = Lrs::new(config(2, 1)).unwrap();
    assert!(!lrs.is_searched());
    let err = lrs
        .transform(&DataPoint::new(vec![0], array![0.0, 0.0]))
        .unwrap_err();
    assert!(matches!(err, FeatureSelectionError::UntrainedTransform));
}

#[test]
fn evaluator_failure_aborts_the_search() {
    init_logging();
    // folds > samples makes every cross-validation call fail
    let data = mixed_dataset();
    let mut lrs = Lrs::new(LrsConfig::new(2, 1).unwrap().with_folds(100).with_seed(0)).unwrap();
    let err = lrs
        .search_classification(&data, &NearestCentroid::new())
        .unwrap_err();
    assert!(matches!(err, FeatureSelectionError::Evaluation(_)));
    // no partial result is left behind
    assert!(!lrs.is_searched());
    assert!(lrs.selected_numerical().is_empty());
}

// ---------------------------------------------------------------------------
// Factory dispatch
// ---------------------------------------------------------------------------

#[test]
fn factory_dispatches_on_dataset_kind() {
    init_logging();
    let factory = LrsFactory::with_config(
        Evaluator::Classifier(Box::new(NearestCentroid::new())),
        config(2, 1),
    )
    .unwrap();

    let lrs = factory
        .fit(&AnyDataset::Classification(mixed_dataset()))
        .unwrap();
    assert!(lrs.is_searched());
    assert_eq!(lrs.projection().unwrap().output_features(), 1);
}

#[test]
fn factory_rejects_kind_mismatch() {
    let factory = LrsFactory::with_config(
        Evaluator::Classifier(Box::new(NearestCentroid::new())),
        config(2, 1),
    )
    .unwrap();

    let regression = RegressionDataset::from_numeric(
        vec![array![0.0], array![1.0], array![2.0]],
        vec![0.0, 1.0, 2.0],
    )
    .unwrap();
    let err = factory.fit(&AnyDataset::Regression(regression)).unwrap_err();
    assert!(matches!(err, FeatureSelectionError::Configuration(_)));

    let factory = LrsFactory::with_config(
        Evaluator::Regressor(Box::new(KernelRegressor::new(1.0))),
        config(2, 1),
    )
    .unwrap();
    let err = factory
        .fit(&AnyDataset::Classification(mixed_dataset()))
        .unwrap_err();
    assert!(matches!(err, FeatureSelectionError::Configuration(_)));
}

// ---------------------------------------------------------------------------
// Accessor semantics
// ---------------------------------------------------------------------------

#[test]
fn accessors_return_fresh_copies_each_call() {
    init_logging();
    let data = mixed_dataset();
    let mut lrs = Lrs::new(config(2, 1)).unwrap();
    lrs.search_classification(&data, &NearestCentroid::new()).unwrap();

    let mut stolen = lrs.selected_numerical();
    stolen.insert(77);
    assert!(!lrs.selected_numerical().contains(&77));
    assert_eq!(lrs.selected_numerical(), lrs.selected_numerical());

    // cloning the engine deep-copies its state
    let copy = lrs.clone();
    assert_eq!(copy.selected_numerical(), lrs.selected_numerical());
}
