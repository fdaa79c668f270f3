//! Configuration for artifacts, training, and inference

use crate::forest::ForestParams;
use beachsafe_core::{CrowdLevel, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the classifier stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Artifact locations
    #[serde(default)]
    pub artifacts: ArtifactConfig,

    /// Offline training settings
    #[serde(default)]
    pub training: TrainingConfig,

    /// Crowd level used when none is estimated (map survey)
    #[serde(default = "default_crowd")]
    pub default_crowd: CrowdLevel,
}

/// Locations of the two persisted blobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Trained forest blob
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Column encoder blob
    #[serde(default = "default_encoders_path")]
    pub encoders_path: PathBuf,
}

/// Offline training settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// CSV dataset with Beach, Weather, Crowd_Level, Tide, Hazard, Safety columns
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Number of trees
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,

    /// Maximum tree depth
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Seed for the split shuffle and bootstrap sampling
    #[serde(default = "default_random_state")]
    pub random_state: u64,

    /// Fraction of rows held out for evaluation
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactConfig::default(),
            training: TrainingConfig::default(),
            default_crowd: default_crowd(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            encoders_path: default_encoders_path(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            n_estimators: default_n_estimators(),
            max_depth: None,
            random_state: default_random_state(),
            test_fraction: default_test_fraction(),
        }
    }
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content).map_err(|e| {
            Error::config(format!(
                "failed to parse {}: {e}",
                path.as_ref().display()
            ))
        })
    }
}

impl ArtifactConfig {
    /// Both artifacts inside one directory, with the default file names
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            model_path: dir.join("beach_safety_model.json"),
            encoders_path: dir.join("label_encoders.json"),
        }
    }
}

impl TrainingConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(Error::config("n_estimators must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(Error::config(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        Ok(())
    }

    /// Forest hyperparameters
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            random_state: self.random_state,
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model/beach_safety_model.json")
}

fn default_encoders_path() -> PathBuf {
    PathBuf::from("model/label_encoders.json")
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/goa_beach_safety_dataset.csv")
}

fn default_n_estimators() -> usize {
    100
}

fn default_random_state() -> u64 {
    42
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_crowd() -> CrowdLevel {
    CrowdLevel::Medium
}
