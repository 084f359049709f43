//! Feature-subset search
//!
//! Particles are binary masks over the columns of a feature matrix. A mask is
//! scored by training the caller's model on the selected columns of the first
//! 80% of rows and measuring accuracy on the remaining 20%. The split is
//! positional (no shuffling), so results depend on row order.
//!
//! Positions are stored as exact `0.0`/`1.0` values and re-sampled each
//! iteration as `Bernoulli(sigmoid(velocity))`. Velocity is not clamped.

use core::fmt;

use rand::Rng;

use crate::config::SwarmConfig;
use crate::dataset::{accuracy, distinct_classes, FeatureMatrix, Label};
use crate::fitness::{Evaluation, FailureReason};
use crate::swarm::{self, SearchOutcome, SearchStrategy};
use crate::traits::Classifier;
use crate::{Error, Result};

/// Numerator/denominator of the training share of the ordered split
const TRAIN_SHARE: (usize, usize) = (4, 5);

/// Column-filtered, positionally split data handed to a [`SubsetScorer`]
#[derive(Debug, Clone, Copy)]
pub struct SubsetSplit<'a> {
    /// Original column indices of the selected features, ascending
    pub selected: &'a [usize],
    pub train_features: &'a FeatureMatrix,
    pub train_labels: &'a [Label],
    pub test_features: &'a FeatureMatrix,
    pub test_labels: &'a [Label],
}

/// Fits a model on the training portion and scores it on the held-out portion.
///
/// Scores are expected in `[0, 1]` (accuracy). Errors are absorbed by the
/// search and scored as 0.
pub trait SubsetScorer {
    type Error: fmt::Display;

    fn fit_and_score(&self, split: &SubsetSplit<'_>) -> core::result::Result<f64, Self::Error>;
}

/// [`SubsetScorer`] backed by a closure, see [`scorer_fn`]
#[derive(Debug, Clone, Copy)]
pub struct FnScorer<F>(F);

/// Use a closure as a [`SubsetScorer`]
pub fn scorer_fn<F, E>(f: F) -> FnScorer<F>
where
    F: Fn(&SubsetSplit<'_>) -> core::result::Result<f64, E>,
    E: fmt::Display,
{
    FnScorer(f)
}

impl<F, E> SubsetScorer for FnScorer<F>
where
    F: Fn(&SubsetSplit<'_>) -> core::result::Result<f64, E>,
    E: fmt::Display,
{
    type Error = E;

    fn fit_and_score(&self, split: &SubsetSplit<'_>) -> core::result::Result<f64, E> {
        (self.0)(split)
    }
}

/// Scores a split by held-out accuracy of a freshly built [`Classifier`].
///
/// `factory` is called once per evaluation so no state leaks between particles.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierScorer<F> {
    factory: F,
}

impl<F> ClassifierScorer<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F, C> SubsetScorer for ClassifierScorer<F>
where
    F: Fn() -> C,
    C: Classifier,
{
    type Error = C::Error;

    fn fit_and_score(&self, split: &SubsetSplit<'_>) -> core::result::Result<f64, C::Error> {
        let mut model = (self.factory)();
        model.fit(split.train_features, split.train_labels)?;
        let predicted = model.predict(split.test_features)?;
        Ok(accuracy(&predicted, split.test_labels))
    }
}

/// Decode a raw position into a selection mask.
///
/// An empty selection falls back to selecting the first feature.
pub fn decode_mask(position: &[f64]) -> Vec<bool> {
    // positions only ever hold exactly 0.0 or 1.0
    let mut mask: Vec<bool> = position.iter().map(|&p| p == 1.0).collect();
    if !mask.iter().any(|&m| m) {
        if let Some(first) = mask.first_mut() {
            *first = true;
        }
    }
    mask
}

/// Indices of selected features in a mask
pub fn selected_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &m)| m.then_some(i))
        .collect()
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Feature-subset search problem
#[derive(Debug, Clone)]
pub struct FeatureSubsetSearch<'a, S> {
    features: &'a FeatureMatrix,
    labels: &'a [Label],
    scorer: S,
    feature_names: Option<Vec<String>>,
}

impl<'a, S: SubsetScorer> FeatureSubsetSearch<'a, S> {
    /// Create a search over `features` (N × D) and `labels` (N).
    pub fn new(features: &'a FeatureMatrix, labels: &'a [Label], scorer: S) -> Result<Self> {
        if features.cols() == 0 {
            return Err(Error::EmptyInput("feature matrix has no columns"));
        }
        if features.rows() == 0 {
            return Err(Error::EmptyInput("feature matrix has no rows"));
        }
        if labels.len() != features.rows() {
            return Err(Error::DimensionMismatch {
                expected: features.rows(),
                actual: labels.len(),
            });
        }
        Ok(Self {
            features,
            labels,
            scorer,
            feature_names: None,
        })
    }

    /// Attach column names; the count must match the matrix width.
    pub fn with_feature_names<I, T>(mut self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != self.features.cols() {
            return Err(Error::DimensionMismatch {
                expected: self.features.cols(),
                actual: names.len(),
            });
        }
        self.feature_names = Some(names);
        Ok(self)
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Score an explicit selection of columns.
    ///
    /// An empty selection or an out-of-range column is a failed evaluation.
    pub fn evaluate_selection(&self, selected: &[usize]) -> Evaluation {
        if selected.is_empty() {
            return Evaluation::Failed(FailureReason::EmptySelection);
        }
        let cols = self.features.cols();
        if let Some(&column) = selected.iter().find(|&&c| c >= cols) {
            return Evaluation::Failed(FailureReason::ColumnOutOfRange { column, cols });
        }
        let filtered = self.features.select_columns(selected);
        let n_train = filtered.rows() * TRAIN_SHARE.0 / TRAIN_SHARE.1;
        let (train_features, test_features) = filtered.split_rows(n_train);
        let (train_labels, test_labels) = self.labels.split_at(n_train);

        if distinct_classes(train_labels) < 2 {
            return Evaluation::Failed(FailureReason::SingleClass);
        }
        if test_labels.is_empty() {
            return Evaluation::Failed(FailureReason::EmptyTestSet);
        }

        let split = SubsetSplit {
            selected,
            train_features: &train_features,
            train_labels,
            test_features: &test_features,
            test_labels,
        };
        Evaluation::from_result(self.scorer.fit_and_score(&split))
    }

    /// Run the search with a caller-supplied random source.
    pub fn search_with_rng<R: Rng + ?Sized>(
        &self,
        config: &SwarmConfig,
        rng: &mut R,
    ) -> Result<FeatureSelection> {
        let outcome = swarm::run(config, self, rng)?;
        let mask: Vec<bool> = outcome.best_position.iter().map(|&p| p == 1.0).collect();
        let selected_names = self.feature_names.as_ref().map(|names| {
            selected_indices(&mask)
                .into_iter()
                .map(|i| names[i].clone())
                .collect()
        });
        Ok(FeatureSelection {
            mask,
            score: outcome.best_score,
            selected_names,
            outcome,
        })
    }

    /// Run the search using the config's (optionally seeded) random source.
    pub fn search(&self, config: &SwarmConfig) -> Result<FeatureSelection> {
        let mut rng = config.rng();
        self.search_with_rng(config, &mut rng)
    }
}

impl<S: SubsetScorer> SearchStrategy for FeatureSubsetSearch<'_, S> {
    const MODE: &'static str = "feature_subset";

    fn dimension(&self) -> usize {
        self.features.cols()
    }

    fn initialize<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
        let d = self.dimension();
        let position = (0..d)
            .map(|_| if rng.gen_bool(0.5) { 1.0 } else { 0.0 })
            .collect();
        let velocity = (0..d).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        (position, velocity)
    }

    fn evaluate(&self, position: &[f64]) -> Evaluation {
        let selected = selected_indices(&decode_mask(position));
        self.evaluate_selection(&selected)
    }

    fn reposition<R: Rng + ?Sized>(&self, position: &mut [f64], velocity: &[f64], rng: &mut R) {
        for (p, &v) in position.iter_mut().zip(velocity) {
            *p = if rng.gen::<f64>() < sigmoid(v) { 1.0 } else { 0.0 };
        }
    }

    fn decode(&self, position: &[f64]) -> Vec<f64> {
        decode_mask(position)
            .into_iter()
            .map(|m| if m { 1.0 } else { 0.0 })
            .collect()
    }
}

/// Best feature subset found
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureSelection {
    /// One entry per column; always at least one `true`
    pub mask: Vec<bool>,
    /// Held-out accuracy of the best mask
    pub score: f64,
    /// Names of selected columns, when names were supplied
    pub selected_names: Option<Vec<String>>,
    pub outcome: SearchOutcome,
}

impl FeatureSelection {
    /// Indices of selected columns
    pub fn selected(&self) -> Vec<usize> {
        selected_indices(&self.mask)
    }

    /// Mask as `0`/`1` values
    pub fn mask_bits(&self) -> Vec<u8> {
        self.mask.iter().map(|&m| u8::from(m)).collect()
    }
}
