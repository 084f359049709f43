//! # swarm-select core
//!
//! Particle swarm search engine used to tune a screening classifier.
//!
//! This crate provides:
//! - A shared, synchronous particle swarm update loop ([`swarm`])
//! - Feature-subset selection over a labelled feature matrix ([`feature_subset`])
//! - Ensemble blend-weight search over per-model probabilities ([`ensemble`])
//! - Bounded continuous parameter search ([`bounded`])
//! - Typed fitness evaluation results ([`fitness`])
//!
//! Every search builds its own swarm state, runs to completion and returns the
//! best position found. Scores are always "higher is better".
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialize/deserialize configuration and outcomes
//! - `telemetry`: Emit `tracing` events for iterations, failures and results

#![forbid(unsafe_code)]

pub mod bounded;
pub mod config;
pub mod dataset;
pub mod ensemble;
pub mod feature_subset;
pub mod fitness;
pub mod swarm;
pub mod traits;

mod telemetry;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bounded::{BoundedResult, BoundedSearch, Objective};
    pub use crate::config::{SwarmConfig, SwarmConfigBuilder};
    pub use crate::dataset::{FeatureMatrix, Label};
    pub use crate::ensemble::{BlendedPrediction, EnsembleWeightSearch};
    pub use crate::feature_subset::{
        scorer_fn, ClassifierScorer, FeatureSelection, FeatureSubsetSearch, SubsetScorer,
        SubsetSplit,
    };
    pub use crate::fitness::{Evaluation, FailureReason};
    pub use crate::swarm::{SearchOutcome, SearchStrategy};
    pub use crate::traits::Classifier;
}

/// Result type for swarm-select operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for swarm-select core operations.
///
/// All variants are configuration errors: they are raised before the first
/// iteration and never mid-search. Per-particle evaluation failures are
/// absorbed as [`fitness::Evaluation::Failed`] instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Swarm configuration is unusable
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Supplied data does not match the declared dimensionality
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// A search was requested over an empty problem
    #[error("empty input: {0}")]
    EmptyInput(&'static str),
    /// Input values cannot be searched over (e.g. non-finite model outputs)
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A bounded dimension has a malformed interval
    #[error("invalid bounds for dimension {dimension}: [{lower}, {upper}]")]
    InvalidBounds {
        dimension: usize,
        lower: f64,
        upper: f64,
    },
}
