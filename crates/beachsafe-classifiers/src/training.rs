//! Offline training: dataset loading, encoder fitting, and forest fitting

use crate::artifact::{ModelArtifact, ModelArtifacts, ModelMetadata};
use crate::config::TrainingConfig;
use crate::encoder::{CategoryEncoder, EncoderRegistry};
use crate::forest::RandomForest;
use beachsafe_core::{Column, Error, FeatureVector, Result, SafetyLabel};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Name stored in the model metadata
pub const MODEL_NAME: &str = "beach-safety-forest";

/// One labelled row of the training dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    #[serde(rename = "Beach")]
    pub beach: String,
    #[serde(rename = "Weather")]
    pub weather: String,
    #[serde(rename = "Crowd_Level")]
    pub crowd: String,
    #[serde(rename = "Tide")]
    pub tide: String,
    #[serde(rename = "Hazard")]
    pub hazard: String,
    #[serde(rename = "Safety")]
    pub safety: String,
}

impl TrainingRecord {
    fn value(&self, column: Column) -> &str {
        match column {
            Column::Beach => &self.beach,
            Column::Weather => &self.weather,
            Column::CrowdLevel => &self.crowd,
            Column::Tide => &self.tide,
            Column::Hazard => &self.hazard,
            Column::Safety => &self.safety,
        }
    }
}

/// Outcome of a training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Trained forest and encoders, not yet widened with the fallback category
    pub artifacts: ModelArtifacts,

    /// Rows used for fitting
    pub train_rows: usize,

    /// Rows held out
    pub test_rows: usize,

    /// Accuracy on the fitting rows
    pub train_accuracy: f32,

    /// Accuracy on the held-out rows, if any were held out
    pub test_accuracy: Option<f32>,
}

/// Read the labelled CSV dataset
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<TrainingRecord>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::dataset(format!("failed to open {}: {e}", path.display())))?;

    let records = reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| {
                Error::dataset(format!("{}: bad row {}: {e}", path.display(), i + 1))
            })
        })
        .collect::<Result<Vec<TrainingRecord>>>()?;

    info!(path = %path.display(), rows = records.len(), "Loaded training dataset");
    Ok(records)
}

/// Fit encoders and a forest on labelled records
pub fn train(records: &[TrainingRecord], config: &TrainingConfig) -> Result<TrainingReport> {
    config.validate()?;

    if records.is_empty() {
        return Err(Error::dataset("dataset has no rows"));
    }
    if let Some(bad) = records
        .iter()
        .find(|r| r.safety.parse::<SafetyLabel>().is_err())
    {
        return Err(Error::dataset(format!(
            "Safety value {:?} is not one of Green, Yellow, Red",
            bad.safety
        )));
    }

    let mut encoders = EncoderRegistry::new();
    for column in Column::ALL {
        encoders.insert(
            column,
            CategoryEncoder::fit(records.iter().map(|r| r.value(column))),
        );
    }

    let mut x = Vec::with_capacity(records.len());
    let mut y = Vec::with_capacity(records.len());
    for record in records {
        let features = encoders.encode_features(
            &record.beach,
            &record.weather,
            &record.crowd,
            &record.tide,
            &record.hazard,
        );
        x.push(features.as_f32().to_vec());
        y.push(encoders.encode(Column::Safety, &record.safety));
    }

    let mut indices: Vec<usize> = (0..records.len()).collect();
    let mut rng = StdRng::seed_from_u64(config.random_state);
    indices.shuffle(&mut rng);

    let n_test = ((records.len() as f64 * config.test_fraction).round() as usize)
        .min(records.len() - 1);
    let (test_idx, train_idx) = indices.split_at(n_test);

    let pick = |idx: &[usize]| -> (Vec<Vec<f32>>, Vec<u32>) {
        idx.iter().map(|&i| (x[i].clone(), y[i])).unzip()
    };
    let (x_train, y_train) = pick(train_idx);
    let (x_test, y_test) = pick(test_idx);

    let n_classes = encoders
        .get(Column::Safety)
        .map(CategoryEncoder::len)
        .unwrap_or_default();
    let forest = RandomForest::fit(&x_train, &y_train, n_classes, &config.forest_params())?;

    let train_accuracy = forest.score(&x_train, &y_train)?;
    let test_accuracy = if x_test.is_empty() {
        None
    } else {
        Some(forest.score(&x_test, &y_test)?)
    };

    info!(
        train_rows = x_train.len(),
        test_rows = x_test.len(),
        train_accuracy,
        test_accuracy = ?test_accuracy,
        "Trained safety model"
    );

    let metadata = ModelMetadata {
        name: MODEL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        n_estimators: forest.n_estimators(),
        n_features: FeatureVector::WIDTH,
        n_classes,
        trained_rows: x_train.len(),
    };

    Ok(TrainingReport {
        artifacts: ModelArtifacts {
            model: ModelArtifact { metadata, forest },
            encoders,
        },
        train_rows: x_train.len(),
        test_rows: x_test.len(),
        train_accuracy,
        test_accuracy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(beach: &str, weather: &str, tide: &str, safety: &str) -> TrainingRecord {
        TrainingRecord {
            beach: beach.into(),
            weather: weather.into(),
            crowd: "Low".into(),
            tide: tide.into(),
            hazard: "None".into(),
            safety: safety.into(),
        }
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            n_estimators: 5,
            test_fraction: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_load_dataset_reads_headers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Beach,Weather,Crowd_Level,Tide,Hazard,Safety").unwrap();
        writeln!(file, "Baga,Sunny,High,High,Glass,Red").unwrap();
        writeln!(file, "Agonda,Sunny,Low,Low,None,Green").unwrap();

        let records = load_dataset(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].crowd, "High");
        assert_eq!(records[1].safety, "Green");
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let err = load_dataset("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn test_train_fits_sorted_encoders() {
        let records = vec![
            record("Baga", "Stormy", "High", "Red"),
            record("Agonda", "Sunny", "Low", "Green"),
            record("Colva", "Rainy", "Low", "Yellow"),
        ];
        let report = train(&records, &small_config()).unwrap();
        let encoders = &report.artifacts.encoders;

        assert_eq!(
            encoders.vocabulary(Column::Beach).unwrap(),
            &["Agonda", "Baga", "Colva"]
        );
        assert_eq!(
            encoders.vocabulary(Column::Safety).unwrap(),
            &["Green", "Red", "Yellow"]
        );
        // Saved vocabulary is the trained one
        assert!(!encoders.get(Column::Weather).unwrap().contains("None"));
        assert_eq!(report.test_accuracy, None);
        assert_eq!(report.artifacts.model.metadata.n_classes, 3);
        assert!(report.artifacts.validate().is_ok());
    }

    #[test]
    fn test_train_holds_out_rows() {
        let records: Vec<_> = (0..20)
            .map(|i| {
                if i % 2 == 0 {
                    record("Baga", "Stormy", "High", "Red")
                } else {
                    record("Baga", "Sunny", "Low", "Green")
                }
            })
            .collect();
        let config = TrainingConfig {
            test_fraction: 0.25,
            ..small_config()
        };

        let report = train(&records, &config).unwrap();
        assert_eq!(report.test_rows, 5);
        assert_eq!(report.train_rows, 15);
        assert_eq!(report.test_accuracy, Some(1.0));
    }

    #[test]
    fn test_train_rejects_bad_data() {
        assert!(matches!(
            train(&[], &small_config()),
            Err(Error::Dataset(_))
        ));

        let records = vec![record("Baga", "Sunny", "Low", "Purple")];
        assert!(matches!(
            train(&records, &small_config()),
            Err(Error::Dataset(_))
        ));
    }
}
