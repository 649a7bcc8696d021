//! Best-score bookkeeping shared by the steps of one greedy phase.

/// A single mutable "best score so far" cell (lower is better).
///
/// Passed `&mut` through the steps of a phase, never held in global state; the
/// orchestrator resets it at each phase boundary because the candidate pool,
/// and with it the meaning of "current best", changes between phases.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    best: f64,
}

impl ScoreTracker {
    /// Fresh cell with the "no score observed yet" sentinel.
    pub fn new() -> Self {
        ScoreTracker {
            best: f64::INFINITY,
        }
    }

    pub fn reset(&mut self) {
        self.best = f64::INFINITY;
    }

    pub fn best(&self) -> f64 {
        self.best
    }

    /// Fold a completed step's score into the cell. Monotone: the cell only
    /// ever improves.
    pub fn record(&mut self, score: f64) {
        if score < self.best {
            self.best = score;
        }
    }

    /// Whether `score` is no worse than the best plus `slack`. True whenever
    /// no score has been observed yet.
    pub fn within(&self, score: f64, slack: f64) -> bool {
        score <= self.best + slack
    }
}

impl Default for ScoreTracker {
    fn default() -> Self {
        ScoreTracker::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_sentinel_and_improves_monotonically() {
        let mut tracker = ScoreTracker::new();
        assert_eq!(tracker.best(), f64::INFINITY);
        tracker.record(0.4);
        assert_eq!(tracker.best(), 0.4);
        tracker.record(0.6);
        assert_eq!(tracker.best(), 0.4);
        tracker.record(0.1);
        assert_eq!(tracker.best(), 0.1);
    }

    #[test]
    fn reset_restores_sentinel() {
        let mut tracker = ScoreTracker::new();
        tracker.record(0.2);
        tracker.reset();
        assert_eq!(tracker.best(), f64::INFINITY);
        // anything is within slack of the sentinel
        assert!(tracker.within(1e9, 0.0));
    }

    #[test]
    fn within_respects_slack() {
        let mut tracker = ScoreTracker::new();
        tracker.record(0.5);
        assert!(tracker.within(0.5, 0.0));
        assert!(tracker.within(0.6, 0.1));
        assert!(!tracker.within(0.61, 0.1));
    }
}
