//! # swarm-select
//!
//! **Particle swarm search for screening classifiers: pick the feature subset,
//! blend the models, tune the parameters.**
//!
//! swarm-select drives three searches over one shared particle swarm loop:
//! binary feature-subset selection scored by held-out accuracy, ensemble
//! blend-weight search over per-model probabilities, and bounded continuous
//! parameter search. Searches are synchronous and self-contained; every call
//! builds its own swarm and returns the best position found.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use swarm_select::prelude::*;
//!
//! let registry = ModelRegistry::new()
//!     .with_model("random_forest", ConstantModel(0.82))?
//!     .with_model("svm", ConstantModel(0.64))?;
//! let engine = ScreeningEngine::new(EngineConfig::default(), registry);
//!
//! let blend = engine.blend(&[])?;
//! println!("{}", SearchReport::from(&blend).to_json_pretty()?);
//! ```
//!
//! ## Feature Flags
//!
//! - `telemetry` (default): `tracing` events from the search loop and config loading
//!
//! ## Crate Structure
//!
//! - [`swarm_select_core`]: Swarm loop and the three search modes
//! - [`swarm_select_models`]: Reference classifiers, probability models and the model registry

#![forbid(unsafe_code)]

// Re-export sub-crates
pub use swarm_select_core as core;
pub use swarm_select_models as models;

// Re-export commonly used items at the top level
pub use swarm_select_core::{
    bounded::{BoundedResult, BoundedSearch, Objective},
    config::SwarmConfig,
    ensemble::{BlendedPrediction, EnsembleWeightSearch},
    feature_subset::{FeatureSelection, FeatureSubsetSearch, SubsetScorer},
    Error, Result,
};
pub use swarm_select_models::{
    registry::{ModelRegistry, RegistryBlend},
    ModelError,
};

/// Engine configuration files
pub mod config;

/// Serializable search reports
pub mod report;

use std::fmt;

use swarm_select_core::dataset::{FeatureMatrix, Label};

use crate::config::EngineConfig;

/// Prelude module for convenient imports
///
/// ```rust,ignore
/// use swarm_select::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::models::prelude::*;

    pub use crate::config::{ConfigError, EngineConfig};
    pub use crate::report::{ReportDetail, SearchMode, SearchReport};
    pub use crate::ScreeningEngine;
}

/// Configured searches plus the models they blend.
///
/// Built once at startup and shared by reference; each call runs an
/// independent search with the matching section of the [`EngineConfig`].
#[derive(Debug)]
pub struct ScreeningEngine {
    config: EngineConfig,
    registry: ModelRegistry,
}

impl ScreeningEngine {
    pub fn new(config: EngineConfig, registry: ModelRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Search for the feature subset that `scorer` rates highest.
    pub fn select_features<S: SubsetScorer>(
        &self,
        features: &FeatureMatrix,
        labels: &[Label],
        scorer: S,
        feature_names: Option<&[String]>,
    ) -> Result<FeatureSelection> {
        let mut search = FeatureSubsetSearch::new(features, labels, scorer)?;
        if let Some(names) = feature_names {
            search = search.with_feature_names(names.iter().cloned())?;
        }
        search.search(&self.config.feature_search)
    }

    /// Score `features` with every registered model and blend the outputs.
    pub fn blend(&self, features: &[f64]) -> std::result::Result<RegistryBlend, ModelError> {
        self.registry.blend(features, &self.config.weight_search)
    }

    /// Search the `bounds` box for parameters that maximize `fitness`.
    pub fn maximize<F, E>(&self, bounds: &[(f64, f64)], fitness: F) -> Result<BoundedResult>
    where
        F: Fn(&[f64]) -> std::result::Result<f64, E>,
        E: fmt::Display,
    {
        BoundedSearch::maximize(bounds.iter().copied(), fitness)?.search(&self.config.bounded)
    }

    /// Search the `bounds` box for parameters that minimize `cost`.
    pub fn minimize<F, E>(&self, bounds: &[(f64, f64)], cost: F) -> Result<BoundedResult>
    where
        F: Fn(&[f64]) -> std::result::Result<f64, E>,
        E: fmt::Display,
    {
        BoundedSearch::minimize(bounds.iter().copied(), cost)?.search(&self.config.bounded)
    }
}
