//! One step of greedy forward selection.
use log::{debug, warn};
use rayon::prelude::*;

use crate::error::FeatureSelectionError;
use crate::feature_selection::score::ScoreTracker;
use crate::feature_selection::{
    candidate_seed, FeatureIndex, GreedyStep, SelectionSets, StepContext, SubsetScorer,
};

/// Promotes the single best-scoring candidate from the pool to the selected
/// set. Adoption is unconditional: this is a fixed-count greedy walk, the
/// phase decides how many steps run.
///
/// Candidate evaluations are independent until the round winner is chosen, so
/// they fan out in parallel; each gets its own fold seed derived from the step
/// seed plus the candidate index, and ties break to the lowest global index so
/// the outcome never depends on scheduling.
#[derive(Debug, Clone)]
pub struct ForwardSelector {
    /// How far this phase intends to grow the selected set, when known.
    pub limit: Option<usize>,
}

impl ForwardSelector {
    pub fn new(limit: Option<usize>) -> Self {
        ForwardSelector { limit }
    }
}

impl GreedyStep for ForwardSelector {
    fn propose(
        &self,
        sets: &mut SelectionSets,
        scorer: &dyn SubsetScorer,
        ctx: &StepContext,
        tracker: &mut ScoreTracker,
    ) -> Result<Option<FeatureIndex>, FeatureSelectionError> {
        // ascending, so the first strict minimum is also the lowest index
        let candidates: Vec<usize> = sets
            .available
            .iter()
            .copied()
            .filter(|&g| !sets.is_selected_global(g))
            .collect();
        if candidates.is_empty() {
            warn!("forward step found no candidates left in the pool");
            return Ok(None);
        }

        let n_cat = sets.num_categorical();
        let scored: Vec<(usize, f64)> = candidates
            .par_iter()
            .map(|&global| -> Result<(usize, f64), FeatureSelectionError> {
                let index = FeatureIndex::from_global(global, n_cat);
                let (cat_rm, num_rm) = sets.trial_removals_without(index);
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

        if let Some(limit) = self.limit {
            if sets.selected_len() >= limit {
                warn!(
                    "forward step growing past the phase target of {} features",
                    limit
                );
            }
        }

        let index = FeatureIndex::from_global(winner, n_cat);
        sets.select(index);
        tracker.record(best_score);
        debug!(
            "forward step adopted feature {} (cv score {:.6}, {} candidates, {} now selected)",
            winner,
            best_score,
            candidates.len(),
            sets.selected_len()
        );
        Ok(Some(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_selection::tests_support::CostScorer;

    #[test]
    fn adopts_highest_value_candidate() {
        // keeping feature g is worth costs[g]; the scorer charges for what is
        // removed, so the forward step should adopt the priciest feature
        let scorer = CostScorer::with_split(vec![1.0, 0.5, 3.0, 0.2, 2.0], 2);
        let mut sets = SelectionSets::none_selected(2, 3);
        let mut tracker = ScoreTracker::new();
        let ctx = StepContext { folds: 3, seed: 9 };
        let step = ForwardSelector::new(Some(3));

        let adopted = step.propose(&mut sets, &scorer, &ctx, &mut tracker).unwrap();
        assert_eq!(adopted, Some(FeatureIndex::Numeric(0))); // global 2, cost 3.0
        assert!(sets.is_selected_global(2));
        assert!(!sets.available.contains(&2));
        assert!((tracker.best() - (1.0 + 0.5 + 0.2 + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn ties_break_to_lowest_global_index() {
        let scorer = CostScorer::new(vec![1.0, 2.0, 2.0, 1.0]);
        let mut sets = SelectionSets::none_selected(0, 4);
        let mut tracker = ScoreTracker::new();
        let ctx = StepContext { folds: 3, seed: 1 };
        let step = ForwardSelector::new(None);

        let adopted = step.propose(&mut sets, &scorer, &ctx, &mut tracker).unwrap();
        assert_eq!(adopted, Some(FeatureIndex::Numeric(1))); // globals 1 and 2 tie
    }

    #[test]
    fn empty_pool_declines() {
        let scorer = CostScorer::new(vec![1.0]);
        let mut sets = SelectionSets::none_selected(0, 1);
        sets.select(FeatureIndex::Numeric(0));
        let mut tracker = ScoreTracker::new();
        let ctx = StepContext { folds: 3, seed: 0 };
        let step = ForwardSelector::new(None);
        let adopted = step.propose(&mut sets, &scorer, &ctx, &mut tracker).unwrap();
        assert_eq!(adopted, None);
    }
}
