//! BeachSafe Classifiers
//!
//! Beach safety prediction from five categorical conditions.
//!
//! - Per-column category encoders with an explicit fallback category
//! - A seeded random-forest classifier behind the [`SafetyClassifier`] trait
//! - The total [`SafetyPredictor`] facade, which never fails a prediction
//! - Offline training, the rule-based crowd estimate, and the map survey

pub mod artifact;
pub mod classifier;
pub mod conditions;
pub mod config;
pub mod crowd;
pub mod encoder;
pub mod forest;
pub mod predictor;
pub mod survey;
pub mod training;

pub use artifact::{ModelArtifact, ModelArtifacts, ModelMetadata};
pub use classifier::{most_probable, Prediction, PredictionSource, SafetyClassifier};
pub use conditions::{
    normalize_weather, BeachLocation, ConditionSource, Observation, StaticConditions,
    BEACH_LOCATIONS,
};
pub use config::{ArtifactConfig, ClassifierConfig, TrainingConfig};
pub use crowd::{estimate_crowd, estimate_crowd_now, CrowdEstimate, Season};
pub use encoder::{CategoryEncoder, EncoderRegistry};
pub use forest::{ForestParams, RandomForest};
pub use predictor::{BeachConditions, SafetyPredictor};
pub use survey::{survey_beaches, BeachStatus};
pub use training::{load_dataset, train, TrainingRecord, TrainingReport};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Prediction, SafetyClassifier};
    pub use crate::conditions::{ConditionSource, StaticConditions};
    pub use crate::config::{ArtifactConfig, ClassifierConfig};
    pub use crate::predictor::{BeachConditions, SafetyPredictor};
    pub use beachsafe_core::prelude::*;
}
