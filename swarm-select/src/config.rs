//! Engine configuration file
//!
//! One JSON document configures all three search modes:
//!
//! ```json
//! {
//!   "feature_search": { "particle_count": 20, "iteration_count": 50 },
//!   "weight_search": { "particle_count": 15, "iteration_count": 30, "seed": 7 },
//!   "bounded": { "particle_count": 20, "iteration_count": 30 }
//! }
//! ```
//!
//! Missing sections take their mode's preset, and missing fields inside a
//! section fall back to that same preset. The whole file is validated on load
//! so a bad value is reported before any search runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use swarm_select_core::config::SwarmConfig;

/// Error loading an engine configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid `{section}` section: {source}")]
    Invalid {
        section: &'static str,
        #[source]
        source: swarm_select_core::Error,
    },
}

/// Fields present in one section of the file
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SectionOverrides {
    particle_count: Option<usize>,
    iteration_count: Option<usize>,
    inertia: Option<f64>,
    cognitive: Option<f64>,
    social: Option<f64>,
    seed: Option<u64>,
}

impl SectionOverrides {
    fn apply(self, preset: SwarmConfig) -> SwarmConfig {
        SwarmConfig {
            particle_count: self.particle_count.unwrap_or(preset.particle_count),
            iteration_count: self.iteration_count.unwrap_or(preset.iteration_count),
            inertia: self.inertia.unwrap_or(preset.inertia),
            cognitive: self.cognitive.unwrap_or(preset.cognitive),
            social: self.social.unwrap_or(preset.social),
            seed: self.seed.or(preset.seed),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EngineConfigFile {
    feature_search: SectionOverrides,
    weight_search: SectionOverrides,
    bounded: SectionOverrides,
}

impl From<EngineConfigFile> for EngineConfig {
    fn from(file: EngineConfigFile) -> Self {
        let presets = EngineConfig::default();
        Self {
            feature_search: file.feature_search.apply(presets.feature_search),
            weight_search: file.weight_search.apply(presets.weight_search),
            bounded: file.bounded.apply(presets.bounded),
        }
    }
}

/// Swarm settings for each search mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "EngineConfigFile")]
pub struct EngineConfig {
    pub feature_search: SwarmConfig,
    pub weight_search: SwarmConfig,
    pub bounded: SwarmConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            feature_search: SwarmConfig::feature_search(),
            weight_search: SwarmConfig::weight_search(),
            bounded: SwarmConfig {
                iteration_count: 30,
                ..SwarmConfig::feature_search()
            },
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;

        #[cfg(feature = "telemetry")]
        tracing::debug!(path = %path.display(), "loaded engine config");

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sections = [
            ("feature_search", &self.feature_search),
            ("weight_search", &self.weight_search),
            ("bounded", &self.bounded),
        ];
        for (section, config) in sections {
            config
                .validate()
                .map_err(|source| ConfigError::Invalid { section, source })?;
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(prefix: &str) -> PathBuf {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("swarm_select_{prefix}_{pid}_{nanos}.json"))
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.weight_search.particle_count, 15);
        assert_eq!(config.bounded.iteration_count, 30);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"weight_search": {"iteration_count": 10, "seed": 42}}"#,
        )
        .unwrap();
        assert_eq!(config.weight_search.iteration_count, 10);
        assert_eq!(config.weight_search.particle_count, 15);
        assert_eq!(config.weight_search.seed, Some(42));
        assert_eq!(config.feature_search, SwarmConfig::feature_search());
    }

    #[test]
    fn invalid_section_is_named() {
        let err = EngineConfig::from_json_str(r#"{"bounded": {"particle_count": 0}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                section: "bounded",
                ..
            }
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"feature_search": {"particles": 5}}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_roundtrips_through_file() {
        let path = temp_path("engine_config");
        let mut config = EngineConfig::default();
        config.feature_search.seed = Some(9);
        fs::write(&path, config.to_json_pretty().unwrap()).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = temp_path("missing");
        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
