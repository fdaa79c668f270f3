//! Loading and saving of the trained model and encoder artifacts

use crate::config::ArtifactConfig;
use crate::encoder::EncoderRegistry;
use crate::forest::RandomForest;
use beachsafe_core::{Column, Error, FeatureVector, Result, SafetyLabel};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Descriptive metadata stored alongside the forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name/identifier
    pub name: String,

    /// Artifact format version
    pub version: String,

    /// Number of trees
    pub n_estimators: usize,

    /// Number of input features
    pub n_features: usize,

    /// Number of Safety classes
    pub n_classes: usize,

    /// Rows the forest was fitted on
    pub trained_rows: usize,
}

/// The model blob as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Model metadata
    pub metadata: ModelMetadata,

    /// Trained forest
    pub forest: RandomForest,
}

/// Trained model and encoders, loaded together
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    /// Model blob
    pub model: ModelArtifact,

    /// Column encoders
    pub encoders: EncoderRegistry,
}

impl ModelArtifacts {
    /// Load both artifacts, validate them, and widen the encoders.
    ///
    /// Any missing, unreadable, or inconsistent blob is an
    /// [`Error::Artifact`]; callers must not serve predictions without a
    /// successful load.
    pub fn load(config: &ArtifactConfig) -> Result<Self> {
        let model: ModelArtifact = read_blob(&config.model_path, "model")?;
        let encoders: EncoderRegistry = read_blob(&config.encoders_path, "encoder")?;

        let mut artifacts = Self { model, encoders };
        artifacts.validate()?;

        let widened = artifacts.encoders.widen_with_fallback();
        info!(
            model = %artifacts.model.metadata.name,
            trees = artifacts.model.forest.n_estimators(),
            widened = widened.len(),
            "Loaded model artifacts"
        );

        Ok(artifacts)
    }

    /// Write both artifacts, creating parent directories as needed
    pub fn save(&self, config: &ArtifactConfig) -> Result<()> {
        write_blob(&config.model_path, &self.model)?;
        write_blob(&config.encoders_path, &self.encoders)?;
        info!(
            model = %config.model_path.display(),
            encoders = %config.encoders_path.display(),
            "Saved model artifacts"
        );
        Ok(())
    }

    /// Check the model and encoders agree with each other
    pub fn validate(&self) -> Result<()> {
        self.encoders.validate()?;
        self.model.forest.validate()?;

        let forest = &self.model.forest;
        if forest.n_features() != FeatureVector::WIDTH {
            return Err(Error::artifact(format!(
                "model expects {} features, inference supplies {}",
                forest.n_features(),
                FeatureVector::WIDTH
            )));
        }

        // Every code the forest can emit must decode to a real label
        let safety = self
            .encoders
            .get(Column::Safety)
            .ok_or_else(|| Error::artifact("missing encoder for column Safety"))?;
        let n_classes = forest.n_classes();
        if n_classes > safety.len() {
            return Err(Error::artifact(format!(
                "model emits {} classes but the Safety vocabulary has {}",
                n_classes,
                safety.len()
            )));
        }
        for code in 0..n_classes as u32 {
            let category = self.encoders.decode(Column::Safety, code)?;
            category.parse::<SafetyLabel>().map_err(|e| {
                Error::artifact(format!("Safety class {code} is not a safety label: {e}"))
            })?;
        }

        Ok(())
    }
}

fn read_blob<T: for<'de> Deserialize<'de>>(path: &Path, kind: &str) -> Result<T> {
    if !path.exists() {
        return Err(Error::artifact(format!(
            "{kind} file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::artifact(format!("failed to read {kind} file {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), bytes = content.len(), "Read {} artifact", kind);

    serde_json::from_str(&content).map_err(|e| {
        Error::artifact(format!("failed to parse {kind} file {}: {e}", path.display()))
    })
}

fn write_blob<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::CategoryEncoder;
    use crate::forest::ForestParams;

    fn artifacts() -> ModelArtifacts {
        let mut encoders = EncoderRegistry::new();
        encoders.insert(Column::Beach, CategoryEncoder::fit(["Baga", "Agonda"]));
        encoders.insert(Column::Weather, CategoryEncoder::fit(["Sunny", "Stormy"]));
        encoders.insert(Column::CrowdLevel, CategoryEncoder::fit(["Low", "High"]));
        encoders.insert(Column::Tide, CategoryEncoder::fit(["Low", "High"]));
        encoders.insert(Column::Hazard, CategoryEncoder::fit(["None", "Glass"]));
        encoders.insert(Column::Safety, CategoryEncoder::fit(["Green", "Red"]));

        // Stormy (code 0) is Red (code 1)
        let x = vec![
            vec![0.0, 0.0, 0.0, 0.0, 0.0],
            vec![1.0, 0.0, 1.0, 1.0, 1.0],
            vec![0.0, 1.0, 0.0, 0.0, 0.0],
            vec![1.0, 1.0, 1.0, 1.0, 1.0],
        ];
        let y = vec![1, 1, 0, 0];
        let params = ForestParams {
            n_estimators: 3,
            ..Default::default()
        };
        let forest = RandomForest::fit(&x, &y, 2, &params).unwrap();

        ModelArtifacts {
            model: ModelArtifact {
                metadata: ModelMetadata {
                    name: "test".into(),
                    version: "1".into(),
                    n_estimators: 3,
                    n_features: 5,
                    n_classes: 2,
                    trained_rows: 4,
                },
                forest,
            },
            encoders,
        }
    }

    fn config_in(dir: &Path) -> ArtifactConfig {
        ArtifactConfig {
            model_path: dir.join("model").join("beach_safety_model.json"),
            encoders_path: dir.join("model").join("label_encoders.json"),
        }
    }

    #[test]
    fn test_save_then_load_widens_encoders() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let original = artifacts();
        original.save(&config).unwrap();

        // On-disk vocabulary is the trained one
        let on_disk: EncoderRegistry =
            serde_json::from_str(&std::fs::read_to_string(&config.encoders_path).unwrap())
                .unwrap();
        assert!(!on_disk.get(Column::Beach).unwrap().contains("None"));

        let loaded = ModelArtifacts::load(&config).unwrap();
        for column in Column::ALL {
            assert!(loaded.encoders.get(column).unwrap().contains("None"));
        }
        assert_eq!(loaded.model.metadata, original.model.metadata);
    }

    #[test]
    fn test_missing_file_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        artifacts().save(&config).unwrap();
        std::fs::remove_file(&config.encoders_path).unwrap();

        let err = ModelArtifacts::load(&config).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
        assert!(err.to_string().contains("encoder file not found"));
    }

    #[test]
    fn test_corrupt_file_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        artifacts().save(&config).unwrap();
        std::fs::write(&config.model_path, "{ not json").unwrap();

        let err = ModelArtifacts::load(&config).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
    }

    #[test]
    fn test_safety_vocabulary_must_cover_model_classes() {
        let mut broken = artifacts();
        broken
            .encoders
            .insert(Column::Safety, CategoryEncoder::fit(["Green"]));
        assert!(matches!(broken.validate(), Err(Error::Artifact(_))));

        let mut mislabelled = artifacts();
        mislabelled
            .encoders
            .insert(Column::Safety, CategoryEncoder::fit(["Green", "Purple"]));
        assert!(matches!(mislabelled.validate(), Err(Error::Artifact(_))));
    }
}
