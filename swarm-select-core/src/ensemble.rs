//! Ensemble blend-weight search
//!
//! Finds non-negative weights (summing to 1) for blending per-model
//! probabilities at inference time. There is no ground truth here, so the
//! fitness is a heuristic:
//!
//! ```text
//! fitness = |blend − 0.5| + 0.1 · std({outputᵢ · weightᵢ})
//! ```
//!
//! The first term rewards decisive blends, the second rewards drawing on more
//! than one model. The heuristic cannot tell a well-calibrated blend from a
//! confidently wrong one.

use rand::Rng;

use crate::config::SwarmConfig;
use crate::fitness::Evaluation;
use crate::swarm::{self, SearchOutcome, SearchStrategy};
use crate::{Error, Result};

/// Iteration ceiling applied regardless of the configured count
pub const MAX_WEIGHT_ITERATIONS: usize = 20;

/// Weight of the diversity term in the blend fitness
pub const DIVERSITY_WEIGHT: f64 = 0.1;

/// Decision threshold applied to the blended probability
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Initial velocity range is `[-INITIAL_VELOCITY, INITIAL_VELOCITY]`
const INITIAL_VELOCITY: f64 = 0.1;

/// Take absolute values and rescale to sum to 1.
///
/// A vector that sums to zero becomes uniform. Idempotent on vectors that are
/// already non-negative and normalized.
pub fn normalize(weights: &mut [f64]) {
    for w in weights.iter_mut() {
        *w = w.abs();
    }
    let total: f64 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        for w in weights.iter_mut() {
            *w /= total;
        }
    } else if !weights.is_empty() {
        let uniform = 1.0 / weights.len() as f64;
        weights.fill(uniform);
    }
}

/// Weighted average of `outputs`
pub fn blend(outputs: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    let weighted: f64 = outputs.iter().zip(weights).map(|(o, w)| o * w).sum();
    if total > 0.0 {
        weighted / total
    } else {
        weighted
    }
}

/// The two terms of the blend fitness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendScore {
    /// Distance of the blend from 0.5
    pub confidence: f64,
    /// Population standard deviation of `outputᵢ · weightᵢ`
    pub diversity: f64,
}

impl BlendScore {
    pub fn compute(outputs: &[f64], weights: &[f64]) -> Self {
        let confidence = (blend(outputs, weights) - DECISION_THRESHOLD).abs();

        let products: Vec<f64> = outputs.iter().zip(weights).map(|(o, w)| o * w).collect();
        let n = products.len() as f64;
        let diversity = if products.is_empty() {
            0.0
        } else {
            let mean = products.iter().sum::<f64>() / n;
            let variance = products.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
            variance.sqrt()
        };

        Self {
            confidence,
            diversity,
        }
    }

    pub fn fitness(&self) -> f64 {
        self.confidence + DIVERSITY_WEIGHT * self.diversity
    }
}

/// Blend fitness of `weights` over `outputs`
pub fn blend_fitness(outputs: &[f64], weights: &[f64]) -> f64 {
    BlendScore::compute(outputs, weights).fitness()
}

/// Uniformly drawn, normalized weights for callers that skip the search.
///
/// This vector is never used to seed a swarm.
pub fn random_default_weights<R: Rng + ?Sized>(model_count: usize, rng: &mut R) -> Vec<f64> {
    let mut weights: Vec<f64> = (0..model_count).map(|_| rng.gen()).collect();
    normalize(&mut weights);
    weights
}

/// Blend-weight search over a fixed set of model outputs
#[derive(Debug, Clone, Copy)]
pub struct EnsembleWeightSearch<'a> {
    outputs: &'a [f64],
}

impl<'a> EnsembleWeightSearch<'a> {
    /// Create a search over per-model outputs (e.g. positive-class probabilities).
    pub fn new(outputs: &'a [f64]) -> Result<Self> {
        if outputs.is_empty() {
            return Err(Error::EmptyInput("no model outputs to blend"));
        }
        if let Some((index, value)) = outputs.iter().enumerate().find(|(_, o)| !o.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "model output {index} is not finite ({value})"
            )));
        }
        Ok(Self { outputs })
    }

    pub fn outputs(&self) -> &[f64] {
        self.outputs
    }

    /// Run the search with a caller-supplied random source.
    pub fn search_with_rng<R: Rng + ?Sized>(
        &self,
        config: &SwarmConfig,
        rng: &mut R,
    ) -> Result<BlendedPrediction> {
        let outcome = swarm::run(config, self, rng)?;
        Ok(BlendedPrediction::new(self.outputs, outcome))
    }

    /// Run the search using the config's (optionally seeded) random source.
    pub fn search(&self, config: &SwarmConfig) -> Result<BlendedPrediction> {
        let mut rng = config.rng();
        self.search_with_rng(config, &mut rng)
    }
}

impl SearchStrategy for EnsembleWeightSearch<'_> {
    const MODE: &'static str = "ensemble_weights";

    fn dimension(&self) -> usize {
        self.outputs.len()
    }

    fn initialize<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
        let m = self.dimension();
        let mut position: Vec<f64> = (0..m).map(|_| rng.gen()).collect();
        normalize(&mut position);
        let velocity = (0..m)
            .map(|_| rng.gen_range(-INITIAL_VELOCITY..=INITIAL_VELOCITY))
            .collect();
        (position, velocity)
    }

    fn evaluate(&self, position: &[f64]) -> Evaluation {
        Evaluation::Scored(blend_fitness(self.outputs, position))
    }

    fn reposition<R: Rng + ?Sized>(&self, position: &mut [f64], velocity: &[f64], _rng: &mut R) {
        for (p, v) in position.iter_mut().zip(velocity) {
            *p += v;
        }
        normalize(position);
    }

    fn decode(&self, position: &[f64]) -> Vec<f64> {
        let mut weights = position.to_vec();
        normalize(&mut weights);
        weights
    }

    fn iteration_budget(&self, config: &SwarmConfig) -> usize {
        config.iteration_count.min(MAX_WEIGHT_ITERATIONS)
    }
}

/// Optimized blend of model outputs
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlendedPrediction {
    /// Non-negative weights summing to 1, one per model
    pub weights: Vec<f64>,
    /// Blend fitness of `weights`
    pub fitness: f64,
    /// Weighted average of the model outputs
    pub probability: f64,
    /// `probability > 0.5`
    pub prediction: bool,
    pub outcome: SearchOutcome,
}

impl BlendedPrediction {
    fn new(outputs: &[f64], outcome: SearchOutcome) -> Self {
        let weights = outcome.best_position.clone();
        let probability = blend(outputs, &weights);
        Self {
            fitness: outcome.best_score,
            probability,
            prediction: probability > DECISION_THRESHOLD,
            weights,
            outcome,
        }
    }
}
