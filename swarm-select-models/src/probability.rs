//! Positive-class probability models
//!
//! These are the per-model outputs the ensemble blend search weighs against
//! each other.

use crate::ModelError;

/// A fitted model that scores one feature vector with a positive-class probability
pub trait ProbabilisticModel: Send + Sync {
    /// Expected input width, if fixed
    fn feature_count(&self) -> Option<usize> {
        None
    }

    /// Probability in `[0, 1]` that `features` belongs to the positive class
    fn positive_probability(&self, features: &[f64]) -> Result<f64, ModelError>;
}

/// Logistic regression with fixed coefficients
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogisticModel {
    /// One coefficient per feature
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LogisticModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self { weights, bias }
    }
}

impl ProbabilisticModel for LogisticModel {
    fn feature_count(&self) -> Option<usize> {
        Some(self.weights.len())
    }

    fn positive_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.weights.len() {
            return Err(ModelError::FeatureCount {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }
        let z: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

/// Returns the same probability for every input
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstantModel(pub f64);

impl ProbabilisticModel for ConstantModel {
    fn positive_probability(&self, _features: &[f64]) -> Result<f64, ModelError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_zero_logit_is_half() {
        let model = LogisticModel::new(vec![1.0, -1.0], 0.0);
        assert_eq!(model.positive_probability(&[2.0, 2.0]).unwrap(), 0.5);
    }

    #[test]
    fn logistic_is_monotonic_in_logit() {
        let model = LogisticModel::new(vec![2.0], -1.0);
        let low = model.positive_probability(&[0.0]).unwrap();
        let high = model.positive_probability(&[3.0]).unwrap();
        assert!(low < 0.5 && high > 0.5);
    }

    #[test]
    fn logistic_checks_width() {
        let model = LogisticModel::new(vec![1.0; 3], 0.0);
        assert_eq!(model.feature_count(), Some(3));
        assert_eq!(
            model.positive_probability(&[1.0]),
            Err(ModelError::FeatureCount {
                expected: 3,
                actual: 1
            })
        );
    }
}
