//! # swarm-select models
//!
//! Model utilities for swarm-select.
//!
//! This crate provides:
//! - Reference classifiers for feature-subset search ([`classifiers`])
//! - Probability models that feed the ensemble blend ([`probability`])
//! - An explicitly constructed, load-once model registry ([`registry`])
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialize/deserialize model parameters

#![forbid(unsafe_code)]

pub mod classifiers;
pub mod probability;
pub mod registry;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifiers::{MajorityClass, NearestCentroid};
    pub use crate::probability::{ConstantModel, LogisticModel, ProbabilisticModel};
    pub use crate::registry::{ModelOutput, ModelRegistry, RegistryBlend};
    pub use crate::ModelError;
}

/// Error type for model fitting, prediction and registry operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// Prediction requested before `fit`
    #[error("model has not been fitted")]
    NotFitted,
    /// Fitting was given no samples
    #[error("training set is empty")]
    EmptyTrainingSet,
    /// Row count and label count differ
    #[error("expected {expected} labels, got {actual}")]
    LabelCount { expected: usize, actual: usize },
    /// Input width differs from what the model was fitted/built with
    #[error("expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    /// A model with this name is already registered
    #[error("model `{0}` is already registered")]
    DuplicateModel(String),
    /// The registry holds no models
    #[error("model registry is empty")]
    EmptyRegistry,
    /// A model produced an unusable probability
    #[error("model `{name}` produced invalid probability {value}")]
    InvalidProbability { name: String, value: f64 },
    /// The blend search rejected its input
    #[error(transparent)]
    Search(#[from] swarm_select_core::Error),
}
