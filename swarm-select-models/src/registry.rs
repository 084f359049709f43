//! Model registry
//!
//! Holds the probability models a service scores requests with. The registry
//! is built once at startup (every name registered exactly once) and then
//! shared by reference with whatever handles requests; there is no global
//! model table.

use rand::Rng;

use swarm_select_core::config::SwarmConfig;
use swarm_select_core::ensemble::{BlendedPrediction, EnsembleWeightSearch, DECISION_THRESHOLD};

use crate::probability::ProbabilisticModel;
use crate::ModelError;

struct Entry {
    name: String,
    model: Box<dyn ProbabilisticModel>,
}

/// Named probability models, in registration order
#[derive(Default)]
pub struct ModelRegistry {
    entries: Vec<Entry>,
}

impl core::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// One model's output for a request
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelOutput {
    pub name: String,
    pub probability: f64,
    /// `probability > 0.5`
    pub prediction: bool,
}

/// Per-model outputs plus their optimized blend
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistryBlend {
    pub models: Vec<ModelOutput>,
    pub blend: BlendedPrediction,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model under a unique name.
    pub fn register<M>(&mut self, name: impl Into<String>, model: M) -> Result<(), ModelError>
    where
        M: ProbabilisticModel + 'static,
    {
        let name = name.into();
        if self.contains(&name) {
            return Err(ModelError::DuplicateModel(name));
        }
        self.entries.push(Entry {
            name,
            model: Box::new(model),
        });
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_model<M>(mut self, name: impl Into<String>, model: M) -> Result<Self, ModelError>
    where
        M: ProbabilisticModel + 'static,
    {
        self.register(name, model)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&dyn ProbabilisticModel> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.model.as_ref())
    }

    /// Score `features` with every model, in registration order.
    pub fn predict_all(&self, features: &[f64]) -> Result<Vec<ModelOutput>, ModelError> {
        if self.entries.is_empty() {
            return Err(ModelError::EmptyRegistry);
        }
        self.entries
            .iter()
            .map(|entry| {
                let probability = entry.model.positive_probability(features)?;
                if !(0.0..=1.0).contains(&probability) {
                    return Err(ModelError::InvalidProbability {
                        name: entry.name.clone(),
                        value: probability,
                    });
                }
                Ok(ModelOutput {
                    name: entry.name.clone(),
                    probability,
                    prediction: probability > DECISION_THRESHOLD,
                })
            })
            .collect()
    }

    /// Positive-class probability from every model, in registration order
    pub fn positive_probabilities(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        Ok(self
            .predict_all(features)?
            .into_iter()
            .map(|o| o.probability)
            .collect())
    }

    /// Score `features` with every model and search for the best blend.
    pub fn blend_with_rng<R: Rng + ?Sized>(
        &self,
        features: &[f64],
        config: &SwarmConfig,
        rng: &mut R,
    ) -> Result<RegistryBlend, ModelError> {
        let models = self.predict_all(features)?;
        let outputs: Vec<f64> = models.iter().map(|o| o.probability).collect();
        let blend = EnsembleWeightSearch::new(&outputs)?.search_with_rng(config, rng)?;
        Ok(RegistryBlend { models, blend })
    }

    /// [`blend_with_rng`](Self::blend_with_rng) using the config's random source
    pub fn blend(&self, features: &[f64], config: &SwarmConfig) -> Result<RegistryBlend, ModelError> {
        let mut rng = config.rng();
        self.blend_with_rng(features, config, &mut rng)
    }
}
