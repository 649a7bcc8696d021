//! Plus-L minus-R (LRS) orchestration.
//!
//! The orchestrator is a small state machine with two linear phases. The sign
//! of `L - R` decides, once and up front, which operator runs first and for
//! how many steps:
//!
//! * `L > R`: add L features forward from an empty selection, restrict the
//!   pool to those L, then prune R of them backward. `L - R` survive.
//! * `L < R`: remove R features backward from the full selection, restrict the
//!   pool to the removed R, then add L of them back. `nF - R + L` survive.
//!
//! The best-score cell is reset at the phase boundary; the final removal sets
//! are frozen into an attribute-removal projection that serves every later
//! `transform` call.
use std::collections::BTreeSet;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LrsConfig;
use crate::dataset::{
    AnyDataset, ClassificationDataset, DataPoint, Dataset, RegressionDataset,
};
use crate::error::FeatureSelectionError;
use crate::eval::{cross_validate_classifier, cross_validate_regressor};
use crate::feature_selection::backward::BackwardEliminator;
use crate::feature_selection::forward::ForwardSelector;
use crate::feature_selection::score::ScoreTracker;
use crate::feature_selection::{GreedyStep, SelectionSets, StepContext, SubsetScorer};
use crate::models::traits::{Classifier, Regressor};
use crate::transform::RemoveAttributeTransform;

pub(crate) struct ClassificationSubsetScorer<'a> {
    model: &'a dyn Classifier,
    data: &'a ClassificationDataset,
}

impl SubsetScorer for ClassificationSubsetScorer<'_> {
    fn score_subset(
        &self,
        cat_to_remove: &BTreeSet<usize>,
        num_to_remove: &BTreeSet<usize>,
        folds: usize,
        seed: u64,
    ) -> Result<f64, FeatureSelectionError> {
        let transform = RemoveAttributeTransform::new(
            self.data.num_categorical(),
            self.data.num_numeric(),
            cat_to_remove,
            num_to_remove,
        );
        let view = transform.project_classification(self.data);
        let mut rng = StdRng::seed_from_u64(seed);
        cross_validate_classifier(self.model, &view, folds, &mut rng)
    }
}

pub(crate) struct RegressionSubsetScorer<'a> {
    model: &'a dyn Regressor,
    data: &'a RegressionDataset,
}

impl SubsetScorer for RegressionSubsetScorer<'_> {
    fn score_subset(
        &self,
        cat_to_remove: &BTreeSet<usize>,
        num_to_remove: &BTreeSet<usize>,
        folds: usize,
        seed: u64,
    ) -> Result<f64, FeatureSelectionError> {
        let transform = RemoveAttributeTransform::new(
            self.data.num_categorical(),
            self.data.num_numeric(),
            cat_to_remove,
            num_to_remove,
        );
        let view = transform.project_regression(self.data);
        let mut rng = StdRng::seed_from_u64(seed);
        cross_validate_regressor(self.model, &view, folds, &mut rng)
    }
}

#[derive(Debug, Clone)]
struct SearchResult {
    transform: RemoveAttributeTransform,
    cat_selected: BTreeSet<usize>,
    num_selected: BTreeSet<usize>,
    best_score: f64,
}

/// Plus-L minus-R feature selection engine.
///
/// Create one from an [`LrsConfig`], run a search against a dataset and an
/// evaluator, then use [`Lrs::transform`] to project future data points onto
/// the retained subspace. Cloning an engine deep-copies all of its sets.
#[derive(Debug, Clone)]
pub struct Lrs {
    config: LrsConfig,
    result: Option<SearchResult>,
}

impl Lrs {
    /// New, unsearched engine. Fails fast on a degenerate configuration.
    pub fn new(config: LrsConfig) -> Result<Self, FeatureSelectionError> {
        config.validate()?;
        Ok(Lrs {
            config,
            result: None,
        })
    }

    /// Run the search on a classification problem.
    pub fn search_classification(
        &mut self,
        data: &ClassificationDataset,
        model: &dyn Classifier,
    ) -> Result<(), FeatureSelectionError> {
        if data.is_empty() {
            return Err(FeatureSelectionError::Configuration(
                "cannot search an empty dataset".to_string(),
            ));
        }
        let scorer = ClassificationSubsetScorer { model, data };
        self.search_impl(data.num_categorical(), data.num_numeric(), &scorer)
    }

    /// Run the search on a regression problem.
    pub fn search_regression(
        &mut self,
        data: &RegressionDataset,
        model: &dyn Regressor,
    ) -> Result<(), FeatureSelectionError> {
        if data.is_empty() {
            return Err(FeatureSelectionError::Configuration(
                "cannot search an empty dataset".to_string(),
            ));
        }
        let scorer = RegressionSubsetScorer { model, data };
        self.search_impl(data.num_categorical(), data.num_numeric(), &scorer)
    }

    pub(crate) fn search_impl(
        &mut self,
        num_categorical: usize,
        num_numeric: usize,
        scorer: &dyn SubsetScorer,
    ) -> Result<(), FeatureSelectionError> {
        let l = self.config.to_add;
        let r = self.config.to_remove;
        let n_f = num_categorical + num_numeric;

        if l > r && l > n_f {
            return Err(FeatureSelectionError::Configuration(format!(
                "cannot add {} features, only {} exist",
                l, n_f
            )));
        }
        if r > l && r > n_f {
            return Err(FeatureSelectionError::Configuration(format!(
                "cannot remove {} features, only {} exist",
                r, n_f
            )));
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let folds = self.config.folds;
        let mut tracker = ScoreTracker::new();

        let mut sets = if l > r {
            let mut sets = SelectionSets::none_selected(num_categorical, num_numeric);
            info!("LRS: forward phase, adding {} of {} features", l, n_f);
            let forward = ForwardSelector::new(Some(l));
            run_phase(&forward, l, &mut sets, scorer, folds, &mut rng, &mut tracker, "forward")?;

            sets.restrict_available_to_selected();
            tracker.reset();
            info!(
                "LRS: backward phase, pruning {} of the {} selected features",
                r,
                sets.selected_len()
            );
            let backward = BackwardEliminator::new(l - r, 0.0);
            run_phase(&backward, r, &mut sets, scorer, folds, &mut rng, &mut tracker, "backward")?;
            sets
        } else {
            let mut sets = SelectionSets::all_selected(num_categorical, num_numeric);
            info!("LRS: backward phase, removing {} of {} features", r, n_f);
            let backward = BackwardEliminator::new(n_f - r, 0.0);
            run_phase(&backward, r, &mut sets, scorer, folds, &mut rng, &mut tracker, "backward")?;

            sets.restrict_available_to_removed();
            tracker.reset();
            info!(
                "LRS: forward phase, adding back {} of the {} removed features",
                l,
                sets.available.len()
            );
            let forward = ForwardSelector::new(Some(n_f - r + l));
            run_phase(&forward, l, &mut sets, scorer, folds, &mut rng, &mut tracker, "forward")?;
            sets
        };

        debug_assert!(sets.partition_ok());
        let transform = RemoveAttributeTransform::new(
            num_categorical,
            num_numeric,
            &sets.cat_to_remove,
            &sets.num_to_remove,
        );
        info!(
            "LRS: search complete, {} of {} features retained (best cv score {:.6})",
            transform.output_features(),
            n_f,
            tracker.best()
        );
        self.result = Some(SearchResult {
            transform,
            cat_selected: std::mem::take(&mut sets.cat_selected),
            num_selected: std::mem::take(&mut sets.num_selected),
            best_score: tracker.best(),
        });
        Ok(())
    }

    /// Whether a search has produced a final mask.
    pub fn is_searched(&self) -> bool {
        self.result.is_some()
    }

    /// Project a data point onto the retained-feature subspace.
    pub fn transform(&self, point: &DataPoint) -> Result<DataPoint, FeatureSelectionError> {
        match &self.result {
            Some(result) => Ok(result.transform.transform(point)),
            None => Err(FeatureSelectionError::UntrainedTransform),
        }
    }

    /// The frozen projection, once a search has completed.
    pub fn projection(&self) -> Result<&RemoveAttributeTransform, FeatureSelectionError> {
        self.result
            .as_ref()
            .map(|r| &r.transform)
            .ok_or(FeatureSelectionError::UntrainedTransform)
    }

    /// Independent copy of the selected categorical feature set (local
    /// indices). Empty before a search.
    pub fn selected_categorical(&self) -> BTreeSet<usize> {
        self.result
            .as_ref()
            .map(|r| r.cat_selected.clone())
            .unwrap_or_default()
    }

    /// Independent copy of the selected numeric feature set (local indices).
    pub fn selected_numerical(&self) -> BTreeSet<usize> {
        self.result
            .as_ref()
            .map(|r| r.num_selected.clone())
            .unwrap_or_default()
    }

    /// Best cross-validated score observed in the final phase.
    pub fn best_score(&self) -> Option<f64> {
        self.result.as_ref().map(|r| r.best_score)
    }
}

#[allow(clippy::too_many_arguments)]
fn run_phase(
    op: &dyn GreedyStep,
    steps: usize,
    sets: &mut SelectionSets,
    scorer: &dyn SubsetScorer,
    folds: usize,
    rng: &mut StdRng,
    tracker: &mut ScoreTracker,
    phase: &str,
) -> Result<(), FeatureSelectionError> {
    for step in 0..steps {
        let ctx = StepContext {
            folds,
            seed: rng.gen(),
        };
        if op.propose(sets, scorer, &ctx, tracker)?.is_none() {
            warn!("{} phase stopped early at step {}/{}", phase, step + 1, steps);
            break;
        }
    }
    Ok(())
}

/// Trainable-model handle for the factory, polymorphic over the two problem
/// kinds.
#[derive(Clone)]
pub enum Evaluator {
    Classifier(Box<dyn Classifier>),
    Regressor(Box<dyn Regressor>),
}

impl Evaluator {
    pub fn name(&self) -> &str {
        match self {
            Evaluator::Classifier(model) => model.name(),
            Evaluator::Regressor(model) => model.name(),
        }
    }
}

/// Factory surface: an evaluator plus add/remove counts, dispatching to the
/// classification or regression search based on the dataset's runtime kind.
#[derive(Clone)]
pub struct LrsFactory {
    evaluator: Evaluator,
    config: LrsConfig,
}

impl LrsFactory {
    /// Fails immediately when `to_add == to_remove`.
    pub fn new(
        evaluator: Evaluator,
        to_add: usize,
        to_remove: usize,
    ) -> Result<Self, FeatureSelectionError> {
        Ok(LrsFactory {
            evaluator,
            config: LrsConfig::new(to_add, to_remove)?,
        })
    }

    pub fn with_config(
        evaluator: Evaluator,
        config: LrsConfig,
    ) -> Result<Self, FeatureSelectionError> {
        config.validate()?;
        Ok(LrsFactory { evaluator, config })
    }

    /// Run the search against `dataset` and return the trained engine.
    pub fn fit(&self, dataset: &AnyDataset) -> Result<Lrs, FeatureSelectionError> {
        let mut lrs = Lrs::new(self.config.clone())?;
        match (dataset, &self.evaluator) {
            (AnyDataset::Classification(data), Evaluator::Classifier(model)) => {
                lrs.search_classification(data, model.as_ref())?;
            }
            (AnyDataset::Regression(data), Evaluator::Regressor(model)) => {
                lrs.search_regression(data, model.as_ref())?;
            }
            (AnyDataset::Classification(_), Evaluator::Regressor(_)) => {
                return Err(FeatureSelectionError::Configuration(
                    "regression evaluator cannot search a classification dataset".to_string(),
                ));
            }
            (AnyDataset::Regression(_), Evaluator::Classifier(_)) => {
                return Err(FeatureSelectionError::Configuration(
                    "classification evaluator cannot search a regression dataset".to_string(),
                ));
            }
        }
        Ok(lrs)
    }
}
