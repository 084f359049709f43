//! Reference classifiers
//!
//! Small, dependency-free classifiers that plug into feature-subset search via
//! [`swarm_select_core::feature_subset::ClassifierScorer`]. They are useful for
//! tests and examples, not as production screening models.

use std::collections::BTreeMap;

use swarm_select_core::dataset::{FeatureMatrix, Label};
use swarm_select_core::traits::Classifier;

use crate::ModelError;

fn check_training_set(features: &FeatureMatrix, labels: &[Label]) -> Result<(), ModelError> {
    if features.rows() == 0 {
        return Err(ModelError::EmptyTrainingSet);
    }
    if labels.len() != features.rows() {
        return Err(ModelError::LabelCount {
            expected: features.rows(),
            actual: labels.len(),
        });
    }
    Ok(())
}

/// Assigns each sample the label of the closest class mean (Euclidean).
///
/// Ties go to the smallest label.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearestCentroid {
    centroids: Vec<(Label, Vec<f64>)>,
    width: usize,
}

impl NearestCentroid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted `(label, centroid)` pairs in ascending label order
    pub fn centroids(&self) -> &[(Label, Vec<f64>)] {
        &self.centroids
    }

    fn nearest(&self, row: &[f64]) -> Label {
        let mut best = (self.centroids[0].0, f64::INFINITY);
        for (label, centroid) in &self.centroids {
            let distance: f64 = row
                .iter()
                .zip(centroid)
                .map(|(x, c)| (x - c).powi(2))
                .sum();
            if distance < best.1 {
                best = (*label, distance);
            }
        }
        best.0
    }
}

impl Classifier for NearestCentroid {
    type Error = ModelError;

    fn fit(&mut self, features: &FeatureMatrix, labels: &[Label]) -> Result<(), ModelError> {
        check_training_set(features, labels)?;

        let mut sums: BTreeMap<Label, (Vec<f64>, usize)> = BTreeMap::new();
        for (row, &label) in features.iter_rows().zip(labels) {
            let (sum, count) = sums
                .entry(label)
                .or_insert_with(|| (vec![0.0; features.cols()], 0));
            for (s, x) in sum.iter_mut().zip(row) {
                *s += x;
            }
            *count += 1;
        }

        self.width = features.cols();
        self.centroids = sums
            .into_iter()
            .map(|(label, (sum, count))| {
                let n = count as f64;
                (label, sum.into_iter().map(|s| s / n).collect())
            })
            .collect();
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, ModelError> {
        if self.centroids.is_empty() {
            return Err(ModelError::NotFitted);
        }
        if features.cols() != self.width {
            return Err(ModelError::FeatureCount {
                expected: self.width,
                actual: features.cols(),
            });
        }
        Ok(features.iter_rows().map(|row| self.nearest(row)).collect())
    }
}

/// Always predicts the most frequent training label (smallest on ties).
///
/// Baseline that any useful feature subset should beat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MajorityClass {
    majority: Option<Label>,
}

impl MajorityClass {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Classifier for MajorityClass {
    type Error = ModelError;

    fn fit(&mut self, features: &FeatureMatrix, labels: &[Label]) -> Result<(), ModelError> {
        check_training_set(features, labels)?;
        let mut counts: BTreeMap<Label, usize> = BTreeMap::new();
        for &label in labels {
            *counts.entry(label).or_default() += 1;
        }
        // max_by_key keeps the last maximum; iterate descending so ties go to the smallest label
        self.majority = counts
            .into_iter()
            .rev()
            .max_by_key(|&(_, count)| count)
            .map(|(label, _)| label);
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<Label>, ModelError> {
        let label = self.majority.ok_or(ModelError::NotFitted)?;
        Ok(vec![label; features.rows()])
    }
}
