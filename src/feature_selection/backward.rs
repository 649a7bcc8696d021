//! One step of greedy backward elimination.
use log::{debug, warn};
use rayon::prelude::*;

use crate::error::FeatureSelectionError;
use crate::feature_selection::score::ScoreTracker;
use crate::feature_selection::{
    candidate_seed, FeatureIndex, GreedyStep, SelectionSets, StepContext, SubsetScorer,
};

/// Demotes the selected feature whose removal hurts the cross-validated score
/// least.
///
/// The step commits when the round's best score is within `threshold` of the
/// tracker's best, or while the selected set is still larger than
/// `target_size`. The orchestrator runs exact step counts with a threshold of
/// 0.0, which makes every step commit; a standalone caller with a tight
/// threshold sees the step decline once the target size is reached.
#[derive(Debug, Clone)]
pub struct BackwardEliminator {
    /// Size the enclosing phase is shrinking toward.
    pub target_size: usize,
    /// How much worse than the tracked best the post-removal score may be.
    pub threshold: f64,
}

impl BackwardEliminator {
    pub fn new(target_size: usize, threshold: f64) -> Self {
        BackwardEliminator {
            target_size,
            threshold,
        }
    }
}

impl GreedyStep for BackwardEliminator {
    fn propose(
        &self,
        sets: &mut SelectionSets,
        scorer: &dyn SubsetScorer,
        ctx: &StepContext,
        tracker: &mut ScoreTracker,
    ) -> Result<Option<FeatureIndex>, FeatureSelectionError> {
        let candidates: Vec<usize> = sets
            .available
            .iter()
            .copied()
            .filter(|&g| sets.is_selected_global(g))
            .collect();
        if candidates.is_empty() {
            warn!("backward step found no selected candidates left in the pool");
            return Ok(None);
        }

        let n_cat = sets.num_categorical();
        let scored: Vec<(usize, f64)> = candidates
            .par_iter()
            .map(|&global| -> Result<(usize, f64), FeatureSelectionError> {
                let index = FeatureIndex::from_global(global, n_cat);
                let (cat_rm, num_rm) = sets.trial_removals_with(index);
                let score = scorer.score_subset(
                    &cat_rm,
                    &num_rm,
                    ctx.folds,
                    candidate_seed(ctx.seed, global),
                )?;
                Ok((global, score))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (winner, best_score) = scored
            .into_iter()
            .reduce(|best, next| if next.1 < best.1 { next } else { best })
            .expect("candidate list is non-empty");

        if !tracker.within(best_score, self.threshold) && sets.selected_len() <= self.target_size {
            debug!(
                "backward step declined: best removal scores {:.6} vs tracked {:.6} (threshold {}), {} selected at target {}",
                best_score,
                tracker.best(),
                self.threshold,
                sets.selected_len(),
                self.target_size
            );
            return Ok(None);
        }

        let index = FeatureIndex::from_global(winner, n_cat);
        sets.deselect(index);
        tracker.record(best_score);
        debug!(
            "backward step removed feature {} (cv score {:.6}, {} candidates, {} still selected)",
            winner,
            best_score,
            candidates.len(),
            sets.selected_len()
        );
        Ok(Some(index))
    }
}
