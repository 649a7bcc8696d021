//! featsel: greedy plus-L minus-R feature subset selection.
//!
//! This crate implements LRS feature selection: L features are greedily added
//! to drive cross-validated error down and R features are greedily removed
//! while trying to maintain it, with the branch order and final subset size
//! decided by which of L and R is larger. The search treats the model as an
//! opaque scoring oracle behind the `Classifier`/`Regressor` traits; the crate
//! ships small concrete models, a cross-validation oracle, metric
//! accumulators, and CSV loaders so it is usable end to end.
//!
//! The design favors small, testable modules: per-candidate evaluations fan
//! out in parallel within a step, everything else is strictly sequential and
//! reproducible from a single seed.
pub mod config;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod feature_selection;
pub mod io;
pub mod kernels;
pub mod metrics;
pub mod models;
pub mod transform;
