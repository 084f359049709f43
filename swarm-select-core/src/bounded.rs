//! Bounded continuous parameter search
//!
//! Searches a box `[lo₀, hi₀] × … × [lo_k, hi_k]`, e.g. classifier
//! hyperparameters. The objective either maximizes a fitness or minimizes a
//! cost; costs are negated on the way in so the swarm always maximizes.
//! Particles that leave the box are clamped back onto its boundary.

use core::fmt;

use rand::Rng;

use crate::config::SwarmConfig;
use crate::fitness::{Evaluation, FAILURE_SCORE};
use crate::swarm::{self, SearchOutcome, SearchStrategy};
use crate::{Error, Result};

/// Closed interval for one search dimension
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound {
    pub lower: f64,
    pub upper: f64,
}

impl Bound {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Finite, ordered, and narrow enough that `[-2·width, 2·width]` stays finite
    /// for velocity sampling.
    fn is_searchable(&self) -> bool {
        self.lower.is_finite()
            && self.upper.is_finite()
            && self.lower <= self.upper
            && (4.0 * self.width()).is_finite()
    }
}

impl From<(f64, f64)> for Bound {
    fn from((lower, upper): (f64, f64)) -> Self {
        Self { lower, upper }
    }
}

/// Optimization direction of a bounded objective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Objective {
    /// Larger values are better
    Maximize,
    /// Smaller values are better; negated before reaching the swarm
    Minimize,
}

impl Objective {
    fn to_score(self, value: f64) -> f64 {
        match self {
            Objective::Maximize => value,
            Objective::Minimize => -value,
        }
    }
}

/// Bounded search over a parameter box
#[derive(Debug, Clone)]
pub struct BoundedSearch<F> {
    bounds: Vec<Bound>,
    objective: Objective,
    evaluate: F,
    failure_score: f64,
}

impl<F, E> BoundedSearch<F>
where
    F: Fn(&[f64]) -> core::result::Result<f64, E>,
    E: fmt::Display,
{
    /// Search for the parameters that maximize `fitness`.
    pub fn maximize<B: Into<Bound>>(
        bounds: impl IntoIterator<Item = B>,
        fitness: F,
    ) -> Result<Self> {
        Self::new(bounds, Objective::Maximize, fitness)
    }

    /// Search for the parameters that minimize `cost`.
    pub fn minimize<B: Into<Bound>>(bounds: impl IntoIterator<Item = B>, cost: F) -> Result<Self> {
        Self::new(bounds, Objective::Minimize, cost)
    }

    pub fn new<B: Into<Bound>>(
        bounds: impl IntoIterator<Item = B>,
        objective: Objective,
        evaluate: F,
    ) -> Result<Self> {
        let bounds: Vec<Bound> = bounds.into_iter().map(Into::into).collect();
        if bounds.is_empty() {
            return Err(Error::EmptyInput("no parameter bounds"));
        }
        for (dimension, b) in bounds.iter().enumerate() {
            if !b.is_searchable() {
                return Err(Error::InvalidBounds {
                    dimension,
                    lower: b.lower,
                    upper: b.upper,
                });
            }
        }
        Ok(Self {
            bounds,
            objective,
            evaluate,
            failure_score: FAILURE_SCORE,
        })
    }

    /// Score (in maximize terms) assigned to evaluations that fail; must be finite.
    pub fn with_failure_score(mut self, score: f64) -> Result<Self> {
        if !score.is_finite() {
            return Err(Error::InvalidConfig("failure score must be finite"));
        }
        self.failure_score = score;
        Ok(self)
    }

    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Run the search with a caller-supplied random source.
    pub fn search_with_rng<R: Rng + ?Sized>(
        &self,
        config: &SwarmConfig,
        rng: &mut R,
    ) -> Result<BoundedResult> {
        let outcome = swarm::run(config, self, rng)?;
        Ok(BoundedResult {
            position: outcome.best_position.clone(),
            score: outcome.best_score,
            objective_value: self.objective.to_score(outcome.best_score),
            outcome,
        })
    }

    /// Run the search using the config's (optionally seeded) random source.
    pub fn search(&self, config: &SwarmConfig) -> Result<BoundedResult> {
        let mut rng = config.rng();
        self.search_with_rng(config, &mut rng)
    }
}

impl<F, E> SearchStrategy for BoundedSearch<F>
where
    F: Fn(&[f64]) -> core::result::Result<f64, E>,
    E: fmt::Display,
{
    const MODE: &'static str = "bounded";

    fn dimension(&self) -> usize {
        self.bounds.len()
    }

    fn initialize<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
        let position = self
            .bounds
            .iter()
            .map(|b| rng.gen_range(b.lower..=b.upper))
            .collect();
        let velocity = self
            .bounds
            .iter()
            .map(|b| {
                let span = b.width();
                rng.gen_range(-span..=span)
            })
            .collect();
        (position, velocity)
    }

    fn evaluate(&self, position: &[f64]) -> Evaluation {
        match Evaluation::from_result((self.evaluate)(position)) {
            Evaluation::Scored(value) => Evaluation::Scored(self.objective.to_score(value)),
            failed => failed,
        }
    }

    fn reposition<R: Rng + ?Sized>(&self, position: &mut [f64], velocity: &[f64], _rng: &mut R) {
        for ((p, v), b) in position.iter_mut().zip(velocity).zip(&self.bounds) {
            *p = (*p + v).clamp(b.lower, b.upper);
        }
    }

    fn failure_score(&self) -> f64 {
        self.failure_score
    }
}

/// Best point found by a bounded search
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundedResult {
    /// Best parameters, inside the bounds
    pub position: Vec<f64>,
    /// Best score in maximize terms
    pub score: f64,
    /// Best value in the objective's own direction (cost for minimize)
    pub objective_value: f64,
    pub outcome: SearchOutcome,
}
