//! Application configuration

use crate::cli::Cli;
use beachsafe_classifiers::{ArtifactConfig, ClassifierConfig, StaticConditions};
use beachsafe_telemetry::HistoryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the `beachsafe` binary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Artifacts, training, and the default crowd level
    #[serde(flatten)]
    pub classifier: ClassifierConfig,

    /// Prediction history
    #[serde(default)]
    pub history: HistoryConfig,

    /// Conditions used by the map survey
    #[serde(default)]
    pub conditions: StaticConditions,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &Path, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(dir) = &cli.model_dir {
            config.classifier.artifacts = ArtifactConfig::in_dir(dir);
        }

        if let Some(history) = &cli.history {
            config.history.path = history.clone();
        }

        Ok(config)
    }

    /// Parse YAML configuration
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn artifacts(&self) -> &ArtifactConfig {
        &self.classifier.artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beachsafe_core::CrowdLevel;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
artifacts:
  model_path: ./models/forest.json
  encoders_path: ./models/encoders.json
training:
  n_estimators: 50
default_crowd: Low
history:
  path: ./var/log.csv
  window_days: 14
conditions:
  weather: Rain
  tide: High
  overrides:
    Baga:
      weather: Thunderstorm
      tide: High
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();

        assert_eq!(
            config.artifacts().model_path,
            PathBuf::from("./models/forest.json")
        );
        assert_eq!(config.classifier.training.n_estimators, 50);
        assert_eq!(config.classifier.default_crowd, CrowdLevel::Low);
        assert_eq!(config.history.window_days, 14);
        assert_eq!(config.conditions.weather, "Rain");
        assert_eq!(config.conditions.overrides["Baga"].weather, "Thunderstorm");
    }

    #[test]
    fn test_missing_file_uses_defaults_and_overrides() {
        let cli = Cli::parse_from([
            "beachsafe",
            "--config",
            "/nonexistent/beachsafe.yaml",
            "--model-dir",
            "/srv/models",
            "--history",
            "/srv/log.csv",
            "vocab",
        ]);

        let config = AppConfig::load(&cli.config, &cli).unwrap();
        assert_eq!(
            config.artifacts().encoders_path,
            PathBuf::from("/srv/models/label_encoders.json")
        );
        assert_eq!(config.history.path, PathBuf::from("/srv/log.csv"));
        assert_eq!(config.classifier.default_crowd, CrowdLevel::Medium);
        assert_eq!(config.conditions, StaticConditions::default());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(AppConfig::from_yaml("history: [1, 2").is_err());
    }
}
