//! Inference facade: the single entry point for safety predictions.
//!
//! `SafetyPredictor` owns an immutable inference context (encoders plus a
//! trained classifier) built once at start-up. Prediction never fails from
//! the caller's point of view: unknown categories encode to the fallback
//! category, and any other failure while encoding, classifying, or decoding
//! yields [`SafetyLabel::CONSERVATIVE`].

use crate::artifact::ModelArtifacts;
use crate::classifier::{most_probable, Prediction, PredictionSource, SafetyClassifier};
use crate::config::ArtifactConfig;
use crate::encoder::EncoderRegistry;
use beachsafe_core::metrics::{PREDICTIONS_TOTAL, PREDICTION_FALLBACKS_TOTAL, PREDICTION_LATENCY_US};
use beachsafe_core::{Column, Error, FeatureVector, Result, SafetyLabel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Raw inputs for one prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeachConditions {
    pub beach: String,
    pub weather: String,
    pub crowd: String,
    pub tide: String,
    pub hazard: String,
}

impl BeachConditions {
    /// Bundle the five raw category strings
    pub fn new(
        beach: impl Into<String>,
        weather: impl Into<String>,
        crowd: impl Into<String>,
        tide: impl Into<String>,
        hazard: impl Into<String>,
    ) -> Self {
        Self {
            beach: beach.into(),
            weather: weather.into(),
            crowd: crowd.into(),
            tide: tide.into(),
            hazard: hazard.into(),
        }
    }
}

struct InferenceContext {
    encoders: EncoderRegistry,
    classifier: Arc<dyn SafetyClassifier>,
}

/// Total, thread-safe safety predictor.
///
/// Cloning is cheap and shares the same read-only context.
#[derive(Clone)]
pub struct SafetyPredictor {
    context: Arc<InferenceContext>,
}

impl SafetyPredictor {
    /// Build a predictor from encoders and a classifier.
    ///
    /// The encoders are used as given; artifacts loaded through
    /// [`ModelArtifacts::load`] have already been widened with the fallback
    /// category.
    pub fn new(encoders: EncoderRegistry, classifier: Arc<dyn SafetyClassifier>) -> Self {
        Self {
            context: Arc::new(InferenceContext {
                encoders,
                classifier,
            }),
        }
    }

    /// Build a predictor around loaded artifacts
    pub fn from_artifacts(artifacts: ModelArtifacts) -> Self {
        Self::new(artifacts.encoders, Arc::new(artifacts.model.forest))
    }

    /// Load artifacts from disk; fails fast when they are missing or corrupt
    pub fn load(config: &ArtifactConfig) -> Result<Self> {
        ModelArtifacts::load(config).map(Self::from_artifacts)
    }

    /// Encoders backing this predictor
    pub fn encoders(&self) -> &EncoderRegistry {
        &self.context.encoders
    }

    /// Classifier backing this predictor
    pub fn classifier(&self) -> &dyn SafetyClassifier {
        self.context.classifier.as_ref()
    }

    /// Predict the safety label for five raw category strings.
    ///
    /// Total for any input, including empty and unseen strings.
    pub fn predict_safety(
        &self,
        beach: &str,
        weather: &str,
        crowd: &str,
        tide: &str,
        hazard: &str,
    ) -> SafetyLabel {
        self.predict_detailed(beach, weather, crowd, tide, hazard).label
    }

    /// Predict for a bundle of conditions
    pub fn predict(&self, conditions: &BeachConditions) -> Prediction {
        self.predict_detailed(
            &conditions.beach,
            &conditions.weather,
            &conditions.crowd,
            &conditions.tide,
            &conditions.hazard,
        )
    }

    /// Predict and report how the label was obtained
    pub fn predict_detailed(
        &self,
        beach: &str,
        weather: &str,
        crowd: &str,
        tide: &str,
        hazard: &str,
    ) -> Prediction {
        let start = Instant::now();

        let features = self.context.encoders.encode_features(
            beach.trim(),
            weather.trim(),
            crowd.trim(),
            tide.trim(),
            hazard.trim(),
        );

        let prediction = match self.classify(&features) {
            Ok((label, probabilities)) => {
                debug!(beach, %label, codes = ?features.codes(), "Predicted safety");
                Prediction {
                    label,
                    source: PredictionSource::Model,
                    features: Some(features),
                    probabilities: Some(probabilities),
                    latency_us: 0,
                }
            }
            Err(e) => {
                warn!(beach, error = %e, "Prediction fallback: using conservative estimate");
                metrics::counter!(PREDICTION_FALLBACKS_TOTAL).increment(1);
                Prediction {
                    label: SafetyLabel::CONSERVATIVE,
                    source: PredictionSource::Fallback {
                        reason: e.to_string(),
                    },
                    features: Some(features),
                    probabilities: None,
                    latency_us: 0,
                }
            }
        };

        let latency_us = start.elapsed().as_micros() as u64;
        metrics::counter!(PREDICTIONS_TOTAL, "label" => prediction.label.as_str()).increment(1);
        metrics::histogram!(PREDICTION_LATENCY_US).record(latency_us as f64);

        Prediction {
            latency_us,
            ..prediction
        }
    }

    /// Classify encoded features and decode the most probable class code
    fn classify(&self, features: &FeatureVector) -> Result<(SafetyLabel, Vec<f32>)> {
        let probabilities = self.context.classifier.predict_proba(features)?;
        let code = most_probable(&probabilities)?;

        let category = self.context.encoders.decode(Column::Safety, code)?;
        let label = category
            .parse::<SafetyLabel>()
            .map_err(|e| Error::classifier(format!("class {code} decoded to {category}: {e}")))?;

        Ok((label, probabilities))
    }
}

impl std::fmt::Debug for SafetyPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafetyPredictor")
            .field("classifier", &self.context.classifier.name())
            .field("columns", &self.context.encoders.columns())
            .finish()
    }
}
