//! Core traits for swarm-select
//!
//! The engine never trains models itself; callers plug their classifiers in
//! through these traits (or through a plain scoring closure, see
//! [`crate::feature_subset::scorer_fn`]).

use core::fmt;

use crate::dataset::{FeatureMatrix, Label};

/// A classifier that can be fitted on a feature matrix and asked for labels
pub trait Classifier {
    /// Error raised by fitting or prediction
    type Error: fmt::Display;

    /// Fit on `features` (one row per sample) and `labels`
    fn fit(&mut self, features: &FeatureMatrix, labels: &[Label]) -> Result<(), Self::Error>;

    /// Predict one label per row of `features`
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, Self::Error>;
}
