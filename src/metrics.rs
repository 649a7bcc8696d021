//! Accumulator-style evaluation metrics.
//!
//! Each scorer collects `(predicted, truth, weight)` results one at a time and
//! reports an aggregate via `score()`. Classification scorers take class
//! indices, regression scorers real values. Lower is better for the error
//! metrics; `Precision` and `CoefficientOfDetermination` report "higher is
//! better" quantities and offer a loss view where the search needs one.

/// Weighted misclassification fraction.
#[derive(Debug, Clone, Default)]
pub struct ErrorRate {
    errors: f64,
    total: f64,
}

impl ErrorRate {
    pub fn new() -> Self {
        ErrorRate::default()
    }

    pub fn add_result(&mut self, predicted: usize, truth: usize, weight: f64) {
        if predicted != truth {
            self.errors += weight;
        }
        self.total += weight;
    }

    pub fn score(&self) -> f64 {
        if self.total == 0.0 {
            0.0
        } else {
            self.errors / self.total
        }
    }
}

/// Binary precision, with class 0 taken as the positive class.
#[derive(Debug, Clone, Default)]
pub struct Precision {
    tp: f64,
    fp: f64,
}

impl Precision {
    pub fn new() -> Self {
        Precision::default()
    }

    pub fn add_result(&mut self, predicted: usize, truth: usize, weight: f64) {
        if predicted == 0 {
            if truth == 0 {
                self.tp += weight;
            } else {
                self.fp += weight;
            }
        }
    }

    pub fn score(&self) -> f64 {
        if self.tp + self.fp == 0.0 {
            0.0
        } else {
            self.tp / (self.tp + self.fp)
        }
    }
}

/// Weighted mean squared error, optionally reported as its square root.
#[derive(Debug, Clone, Default)]
pub struct MeanSquaredError {
    sum_sq: f64,
    total_weight: f64,
    rmse: bool,
}

impl MeanSquaredError {
    pub fn new() -> Self {
        MeanSquaredError::default()
    }

    pub fn set_rmse(&mut self, rmse: bool) {
        self.rmse = rmse;
    }

    pub fn add_result(&mut self, predicted: f64, truth: f64, weight: f64) {
        let err = predicted - truth;
        self.sum_sq += err * err * weight;
        self.total_weight += weight;
    }

    pub fn score(&self) -> f64 {
        let mse = if self.total_weight == 0.0 {
            0.0
        } else {
            self.sum_sq / self.total_weight
        };
        if self.rmse {
            mse.sqrt()
        } else {
            mse
        }
    }
}

/// Relative absolute error: total absolute error divided by the absolute error
/// of always predicting the mean of the observed truths.
///
/// The denominator depends on the truth mean, so results are buffered and the
/// ratio computed at `score()` time.
#[derive(Debug, Clone, Default)]
pub struct RelativeAbsoluteError {
    results: Vec<(f64, f64, f64)>,
}

impl RelativeAbsoluteError {
    pub fn new() -> Self {
        RelativeAbsoluteError::default()
    }

    pub fn add_result(&mut self, predicted: f64, truth: f64, weight: f64) {
        self.results.push((predicted, truth, weight));
    }

    pub fn score(&self) -> f64 {
        let total_weight: f64 = self.results.iter().map(|r| r.2).sum();
        if total_weight == 0.0 {
            return 0.0;
        }
        let mean = self
            .results
            .iter()
            .map(|&(_, truth, w)| truth * w)
            .sum::<f64>()
            / total_weight;
        let num: f64 = self
            .results
            .iter()
            .map(|&(pred, truth, w)| (pred - truth).abs() * w)
            .sum();
        let denom: f64 = self
            .results
            .iter()
            .map(|&(_, truth, w)| (mean - truth).abs() * w)
            .sum();
        if denom == 0.0 {
            0.0
        } else {
            num / denom
        }
    }
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
#[derive(Debug, Clone, Default)]
pub struct CoefficientOfDetermination {
    results: Vec<(f64, f64, f64)>,
}

impl CoefficientOfDetermination {
    pub fn new() -> Self {
        CoefficientOfDetermination::default()
    }

    pub fn add_result(&mut self, predicted: f64, truth: f64, weight: f64) {
        self.results.push((predicted, truth, weight));
    }

    pub fn score(&self) -> f64 {
        let total_weight: f64 = self.results.iter().map(|r| r.2).sum();
        if total_weight == 0.0 {
            return 0.0;
        }
        let mean = self
            .results
            .iter()
            .map(|&(_, truth, w)| truth * w)
            .sum::<f64>()
            / total_weight;
        let ss_res: f64 = self
            .results
            .iter()
            .map(|&(pred, truth, w)| (pred - truth).powi(2) * w)
            .sum();
        let ss_tot: f64 = self
            .results
            .iter()
            .map(|&(_, truth, w)| (truth - mean).powi(2) * w)
            .sum();
        if ss_tot == 0.0 {
            0.0
        } else {
            1.0 - ss_res / ss_tot
        }
    }

    /// Loss view (`1 - R^2`) for callers that want lower-is-better.
    pub fn loss(&self) -> f64 {
        1.0 - self.score()
    }
}
