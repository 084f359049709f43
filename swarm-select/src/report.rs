//! Serializable search reports.
//!
//! Flattens the result of any search mode into one JSON-friendly record that a
//! request handler can embed in its response or write to disk.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use swarm_select_core::bounded::BoundedResult;
use swarm_select_core::ensemble::BlendedPrediction;
use swarm_select_core::feature_subset::FeatureSelection;
use swarm_select_models::registry::{ModelOutput, RegistryBlend};

/// Which search produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    FeatureSubset,
    EnsembleWeights,
    Bounded,
}

/// Mode-specific part of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportDetail {
    FeatureSubset {
        /// `0`/`1` per column
        mask: Vec<u8>,
        selected: Vec<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        selected_names: Option<Vec<String>>,
    },
    EnsembleWeights {
        weights: Vec<f64>,
        probability: f64,
        prediction: bool,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        models: Vec<ModelOutput>,
    },
    Bounded {
        position: Vec<f64>,
        objective_value: f64,
    },
}

/// Summary of one completed search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub mode: SearchMode,
    /// Best score ("higher is better")
    pub score: f64,
    pub iterations: usize,
    pub failed_evaluations: usize,
    /// Global best score after each iteration
    pub history: Vec<f64>,
    pub detail: ReportDetail,
}

impl From<&FeatureSelection> for SearchReport {
    fn from(selection: &FeatureSelection) -> Self {
        Self {
            mode: SearchMode::FeatureSubset,
            score: selection.score,
            iterations: selection.outcome.iterations,
            failed_evaluations: selection.outcome.failed_evaluations,
            history: selection.outcome.history.clone(),
            detail: ReportDetail::FeatureSubset {
                mask: selection.mask_bits(),
                selected: selection.selected(),
                selected_names: selection.selected_names.clone(),
            },
        }
    }
}

impl From<&BlendedPrediction> for SearchReport {
    fn from(blend: &BlendedPrediction) -> Self {
        Self {
            mode: SearchMode::EnsembleWeights,
            score: blend.fitness,
            iterations: blend.outcome.iterations,
            failed_evaluations: blend.outcome.failed_evaluations,
            history: blend.outcome.history.clone(),
            detail: ReportDetail::EnsembleWeights {
                weights: blend.weights.clone(),
                probability: blend.probability,
                prediction: blend.prediction,
                models: Vec::new(),
            },
        }
    }
}

impl From<&RegistryBlend> for SearchReport {
    fn from(result: &RegistryBlend) -> Self {
        let mut report = SearchReport::from(&result.blend);
        if let ReportDetail::EnsembleWeights { models, .. } = &mut report.detail {
            models.clone_from(&result.models);
        }
        report
    }
}

impl From<&BoundedResult> for SearchReport {
    fn from(result: &BoundedResult) -> Self {
        Self {
            mode: SearchMode::Bounded,
            score: result.score,
            iterations: result.outcome.iterations,
            failed_evaluations: result.outcome.failed_evaluations,
            history: result.outcome.history.clone(),
            detail: ReportDetail::Bounded {
                position: result.position.clone(),
                objective_value: result.objective_value,
            },
        }
    }
}

impl SearchReport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report as pretty JSON to `path`
    pub fn write_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = self
            .to_json_pretty()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Read a report previously written with [`write_json`](Self::write_json)
    pub fn read_json(path: impl AsRef<Path>) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_select_core::config::SwarmConfig;
    use swarm_select_core::ensemble::EnsembleWeightSearch;

    #[test]
    fn ensemble_report_serializes_tagged_detail() {
        let outputs = [0.8, 0.3];
        let config = SwarmConfig::builder()
            .particles(5)
            .iterations(5)
            .seed(1)
            .build()
            .unwrap();
        let blend = EnsembleWeightSearch::new(&outputs)
            .unwrap()
            .search(&config)
            .unwrap();
        let report = SearchReport::from(&blend);

        let value: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["mode"], "ensemble_weights");
        assert_eq!(value["detail"]["kind"], "ensemble_weights");
        assert_eq!(value["detail"]["weights"].as_array().unwrap().len(), 2);
        assert!(value["detail"].get("models").is_none());
        assert_eq!(value["history"].as_array().unwrap().len(), 5);
    }
}
