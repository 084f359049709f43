//! Swarm configuration
//!
//! A [`SwarmConfig`] is fixed for the duration of a search. It is validated
//! before the first iteration so that a bad configuration fails fast instead
//! of producing a meaningless best position.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::swarm::Coefficients;
use crate::{Error, Result};

/// Particle swarm configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SwarmConfig {
    /// Number of particles in the swarm
    pub particle_count: usize,
    /// Number of full sweeps (evaluate all, then move all)
    pub iteration_count: usize,
    /// Inertia weight `w` (momentum)
    pub inertia: f64,
    /// Cognitive coefficient `c1` (attraction to personal best)
    pub cognitive: f64,
    /// Social coefficient `c2` (attraction to global best)
    pub social: f64,
    /// Seed for the pseudo-random source; `None` draws from OS entropy
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub seed: Option<u64>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self::feature_search()
    }
}

impl SwarmConfig {
    /// Defaults used for feature-subset search: 20 particles, 50 iterations.
    pub const fn feature_search() -> Self {
        Self {
            particle_count: 20,
            iteration_count: 50,
            inertia: 0.5,
            cognitive: 1.5,
            social: 1.5,
            seed: None,
        }
    }

    /// Smaller swarm used at inference time for blend-weight search.
    ///
    /// The ensemble search additionally caps iterations at
    /// [`crate::ensemble::MAX_WEIGHT_ITERATIONS`].
    pub const fn weight_search() -> Self {
        Self {
            particle_count: 15,
            iteration_count: 30,
            ..Self::feature_search()
        }
    }

    /// Create a new builder starting from [`SwarmConfig::default`]
    pub fn builder() -> SwarmConfigBuilder {
        SwarmConfigBuilder::new()
    }

    /// Velocity update coefficients `(w, c1, c2)`
    pub fn coefficients(&self) -> Coefficients {
        Coefficients {
            inertia: self.inertia,
            cognitive: self.cognitive,
            social: self.social,
        }
    }

    /// Check counts are positive and coefficients finite.
    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(Error::InvalidConfig("particle_count must be positive"));
        }
        if self.iteration_count == 0 {
            return Err(Error::InvalidConfig("iteration_count must be positive"));
        }
        if !self.inertia.is_finite() {
            return Err(Error::InvalidConfig("inertia must be finite"));
        }
        if !self.cognitive.is_finite() {
            return Err(Error::InvalidConfig("cognitive coefficient must be finite"));
        }
        if !self.social.is_finite() {
            return Err(Error::InvalidConfig("social coefficient must be finite"));
        }
        Ok(())
    }

    /// Pseudo-random source for a run: seeded when `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Builder for SwarmConfig
#[derive(Debug, Default)]
pub struct SwarmConfigBuilder {
    config: SwarmConfig,
}

impl SwarmConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of particles
    pub fn particles(mut self, count: usize) -> Self {
        self.config.particle_count = count;
        self
    }

    /// Set the number of iterations
    pub fn iterations(mut self, count: usize) -> Self {
        self.config.iteration_count = count;
        self
    }

    /// Set the inertia weight
    pub fn inertia(mut self, w: f64) -> Self {
        self.config.inertia = w;
        self
    }

    /// Set the cognitive coefficient
    pub fn cognitive(mut self, c1: f64) -> Self {
        self.config.cognitive = c1;
        self
    }

    /// Set the social coefficient
    pub fn social(mut self, c2: f64) -> Self {
        self.config.social = c2;
        self
    }

    /// Fix the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<SwarmConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
