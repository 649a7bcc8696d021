//! Greedy feature-subset search.
//!
//! The plus-L minus-R engine composes two primitive greedy operators, one
//! forward-selection step and one backward-elimination step, over a shared
//! partition of the feature space. This module holds the pieces the operators
//! share: the typed feature index, the partition bookkeeping and the seams the
//! orchestrator drives them through.
use std::collections::BTreeSet;

use crate::error::FeatureSelectionError;

pub mod backward;
pub mod forward;
pub mod lrs;
pub mod score;

pub use backward::BackwardEliminator;
pub use forward::ForwardSelector;
pub use lrs::{Evaluator, Lrs, LrsFactory};
pub use score::ScoreTracker;

/// A feature address that knows which half of the global index space it lives
/// in. Globals in `[0, nCat)` are categorical; `[nCat, nF)` are numeric with
/// local index `global - nCat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureIndex {
    Categorical(usize),
    Numeric(usize),
}

impl FeatureIndex {
    pub fn from_global(global: usize, num_categorical: usize) -> Self {
        if global < num_categorical {
            FeatureIndex::Categorical(global)
        } else {
            FeatureIndex::Numeric(global - num_categorical)
        }
    }

    pub fn to_global(self, num_categorical: usize) -> usize {
        match self {
            FeatureIndex::Categorical(local) => local,
            FeatureIndex::Numeric(local) => local + num_categorical,
        }
    }
}

/// The mutable state of one search: the candidate pool plus the full
/// partition of both local index spaces into selected and to-remove halves.
///
/// The partition invariant holds after construction and after every mutation:
/// `cat_selected ∪ cat_to_remove == [0, nCat)` and
/// `num_selected ∪ num_to_remove == [0, nNum)`, each pair disjoint.
#[derive(Debug, Clone)]
pub struct SelectionSets {
    num_categorical: usize,
    num_numeric: usize,
    /// Global indices still eligible to be moved by the active phase.
    pub available: BTreeSet<usize>,
    pub cat_selected: BTreeSet<usize>,
    pub num_selected: BTreeSet<usize>,
    pub cat_to_remove: BTreeSet<usize>,
    pub num_to_remove: BTreeSet<usize>,
}

impl SelectionSets {
    /// Start with nothing selected: every feature sits in its to-remove set
    /// and every global index is available. This is the forward-first layout.
    pub fn none_selected(num_categorical: usize, num_numeric: usize) -> Self {
        SelectionSets {
            num_categorical,
            num_numeric,
            available: (0..num_categorical + num_numeric).collect(),
            cat_selected: BTreeSet::new(),
            num_selected: BTreeSet::new(),
            cat_to_remove: (0..num_categorical).collect(),
            num_to_remove: (0..num_numeric).collect(),
        }
    }

    /// Start with everything selected. This is the backward-first layout.
    pub fn all_selected(num_categorical: usize, num_numeric: usize) -> Self {
        SelectionSets {
            num_categorical,
            num_numeric,
            available: (0..num_categorical + num_numeric).collect(),
            cat_selected: (0..num_categorical).collect(),
            num_selected: (0..num_numeric).collect(),
            cat_to_remove: BTreeSet::new(),
            num_to_remove: BTreeSet::new(),
        }
    }

    pub fn num_categorical(&self) -> usize {
        self.num_categorical
    }

    pub fn num_numeric(&self) -> usize {
        self.num_numeric
    }

    pub fn num_features(&self) -> usize {
        self.num_categorical + self.num_numeric
    }

    pub fn selected_len(&self) -> usize {
        self.cat_selected.len() + self.num_selected.len()
    }

    pub fn is_selected(&self, index: FeatureIndex) -> bool {
        match index {
            FeatureIndex::Categorical(local) => self.cat_selected.contains(&local),
            FeatureIndex::Numeric(local) => self.num_selected.contains(&local),
        }
    }

    pub fn is_selected_global(&self, global: usize) -> bool {
        self.is_selected(FeatureIndex::from_global(global, self.num_categorical))
    }

    /// Promote a feature from its to-remove set into the selected set and
    /// drop it from the candidate pool.
    pub fn select(&mut self, index: FeatureIndex) {
        match index {
            FeatureIndex::Categorical(local) => {
                self.cat_to_remove.remove(&local);
                self.cat_selected.insert(local);
            }
            FeatureIndex::Numeric(local) => {
                self.num_to_remove.remove(&local);
                self.num_selected.insert(local);
            }
        }
        self.available.remove(&index.to_global(self.num_categorical));
        debug_assert!(self.partition_ok());
    }

    /// Demote a feature from the selected set into its to-remove set and
    /// drop it from the candidate pool.
    pub fn deselect(&mut self, index: FeatureIndex) {
        match index {
            FeatureIndex::Categorical(local) => {
                self.cat_selected.remove(&local);
                self.cat_to_remove.insert(local);
            }
            FeatureIndex::Numeric(local) => {
                self.num_selected.remove(&local);
                self.num_to_remove.insert(local);
            }
        }
        self.available.remove(&index.to_global(self.num_categorical));
        debug_assert!(self.partition_ok());
    }

    /// Restrict the candidate pool to the currently selected features.
    pub fn restrict_available_to_selected(&mut self) {
        self.available.clear();
        self.available.extend(self.cat_selected.iter().copied());
        self.available
            .extend(self.num_selected.iter().map(|&i| i + self.num_categorical));
    }

    /// Restrict the candidate pool to the currently removed features.
    pub fn restrict_available_to_removed(&mut self) {
        self.available.clear();
        self.available.extend(self.cat_to_remove.iter().copied());
        self.available
            .extend(self.num_to_remove.iter().map(|&i| i + self.num_categorical));
    }

    /// Removal sets for a trial where `index` is additionally selected.
    pub(crate) fn trial_removals_without(
        &self,
        index: FeatureIndex,
    ) -> (BTreeSet<usize>, BTreeSet<usize>) {
        let mut cat = self.cat_to_remove.clone();
        let mut num = self.num_to_remove.clone();
        match index {
            FeatureIndex::Categorical(local) => {
                cat.remove(&local);
            }
            FeatureIndex::Numeric(local) => {
                num.remove(&local);
            }
        }
        (cat, num)
    }

    /// Removal sets for a trial where `index` is additionally removed.
    pub(crate) fn trial_removals_with(
        &self,
        index: FeatureIndex,
    ) -> (BTreeSet<usize>, BTreeSet<usize>) {
        let mut cat = self.cat_to_remove.clone();
        let mut num = self.num_to_remove.clone();
        match index {
            FeatureIndex::Categorical(local) => {
                cat.insert(local);
            }
            FeatureIndex::Numeric(local) => {
                num.insert(local);
            }
        }
        (cat, num)
    }

    /// True when both local index spaces are fully and disjointly partitioned.
    pub fn partition_ok(&self) -> bool {
        self.cat_selected.len() + self.cat_to_remove.len() == self.num_categorical
            && self.num_selected.len() + self.num_to_remove.len() == self.num_numeric
            && self.cat_selected.is_disjoint(&self.cat_to_remove)
            && self.num_selected.is_disjoint(&self.num_to_remove)
    }
}

/// Per-step inputs shared by both greedy operators.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    pub folds: usize,
    /// Seed for this step; per-candidate seeds are derived from it so results
    /// do not depend on evaluation order or thread scheduling.
    pub seed: u64,
}

/// Scores a feature subset, described by what gets removed, with k-fold
/// cross-validation. Lower is better.
pub(crate) trait SubsetScorer: Sync {
    fn score_subset(
        &self,
        cat_to_remove: &BTreeSet<usize>,
        num_to_remove: &BTreeSet<usize>,
        folds: usize,
        seed: u64,
    ) -> Result<f64, FeatureSelectionError>;
}

/// One greedy search step: evaluate every eligible candidate, mutate the sets
/// with the round winner and report which feature moved (`None` when the step
/// declined to act).
pub(crate) trait GreedyStep {
    fn propose(
        &self,
        sets: &mut SelectionSets,
        scorer: &dyn SubsetScorer,
        ctx: &StepContext,
        tracker: &mut ScoreTracker,
    ) -> Result<Option<FeatureIndex>, FeatureSelectionError>;
}

/// Mix the step seed with a candidate index so each candidate's fold split is
/// reproducible regardless of which thread evaluates it.
pub(crate) fn candidate_seed(step_seed: u64, global: usize) -> u64 {
    step_seed ^ (global as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}
