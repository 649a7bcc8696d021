//! Pipeline tests: regression search with the kernel regressor, and the CSV
//! loader feeding the factory end to end.

use ndarray::array;

use featsel::config::LrsConfig;
use featsel::dataset::{AnyDataset, Dataset, RegressionDataset};
use featsel::feature_selection::{Evaluator, LrsFactory};
use featsel::io::{read_classification_from_reader, CsvReaderConfig};
use featsel::models::{KernelRegressor, NearestCentroid};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Target equals numeric feature 0; features 1 and 2 carry no signal.
fn regression_dataset() -> RegressionDataset {
    let mut rows = Vec::new();
    let mut targets = Vec::new();
    for i in 0..12 {
        let x0 = i as f64;
        rows.push(array![x0, 5.0, (i % 2) as f64]);
        targets.push(x0);
    }
    RegressionDataset::from_numeric(rows, targets).unwrap()
}

// ---------------------------------------------------------------------------
// Regression search
// ---------------------------------------------------------------------------

#[test]
fn regression_search_keeps_the_predictive_feature() {
    init_logging();
    let data = regression_dataset();
    let factory = LrsFactory::with_config(
        Evaluator::Regressor(Box::new(KernelRegressor::new(1.0))),
        LrsConfig::new(2, 1).unwrap().with_folds(3).with_seed(9),
    )
    .unwrap();

    let lrs = factory.fit(&AnyDataset::Regression(data)).unwrap();
    let selected = lrs.selected_numerical();
    assert_eq!(selected.len(), 1);
    assert!(selected.contains(&0), "expected feature 0, got {:?}", selected);
    assert!(lrs.selected_categorical().is_empty());
}

#[test]
fn regression_search_backward_first_branch() {
    init_logging();
    let data = regression_dataset();
    let factory = LrsFactory::with_config(
        Evaluator::Regressor(Box::new(KernelRegressor::new(1.0))),
        LrsConfig::new(1, 2).unwrap().with_folds(3).with_seed(9),
    )
    .unwrap();

    let lrs = factory.fit(&AnyDataset::Regression(data)).unwrap();
    // nF - R + L = 3 - 2 + 1
    assert_eq!(lrs.selected_numerical().len(), 2);
    assert!(lrs.selected_numerical().contains(&0));
}

// ---------------------------------------------------------------------------
// CSV to search pipeline
// ---------------------------------------------------------------------------

fn csv_fixture() -> String {
    let mut out = String::from("color,signal,filler,class\n");
    for i in 0..8 {
        let color = if i % 2 == 0 { "red" } else { "blue" };
        out.push_str(&format!("{},{:.1},5.0,low\n", color, 0.1 * i as f64));
        out.push_str(&format!("{},{:.1},5.0,high\n", color, 10.0 + 0.1 * i as f64));
    }
    out
}

#[test]
fn csv_loaded_dataset_drives_the_search() {
    init_logging();
    let config = CsvReaderConfig::new("class").with_categorical(&["color"]);
    let data = read_classification_from_reader(csv_fixture().as_bytes(), &config).unwrap();
    assert_eq!(data.num_features(), 3);
    assert_eq!(data.num_categorical(), 1);
    assert_eq!(data.len(), 16);

    let factory = LrsFactory::with_config(
        Evaluator::Classifier(Box::new(NearestCentroid::new())),
        LrsConfig::new(2, 1).unwrap().with_folds(4).with_seed(5),
    )
    .unwrap();
    let lrs = factory.fit(&AnyDataset::Classification(data)).unwrap();

    // only the "signal" column separates low from high
    assert_eq!(lrs.selected_numerical().len(), 1);
    assert!(lrs.selected_numerical().contains(&0));
    assert!(lrs.selected_categorical().is_empty());
    assert_eq!(lrs.projection().unwrap().output_features(), 1);
}
