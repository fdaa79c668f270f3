//! Safety survey of every known beach, for the map view

use crate::conditions::{
    normalize_weather, resolve, BeachLocation, ConditionSource, BEACH_LOCATIONS,
};
use crate::predictor::SafetyPredictor;
use beachsafe_core::{CrowdLevel, SafetyLabel, FALLBACK_CATEGORY};
use futures::future::join_all;
use serde::Serialize;
use tracing::info;

/// Map marker data for one beach
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeachStatus {
    pub beach: String,
    pub lat: f64,
    pub lon: f64,
    /// Model weather category
    pub weather: String,
    pub tide: String,
    pub safety: SafetyLabel,
}

impl BeachStatus {
    /// Marker colour
    pub fn color(&self) -> &'static str {
        self.safety.marker_color()
    }

    /// Marker icon name
    pub fn icon(&self) -> &'static str {
        self.safety.marker_icon()
    }
}

async fn survey_one(
    predictor: &SafetyPredictor,
    source: &dyn ConditionSource,
    beach: &BeachLocation,
    crowd: CrowdLevel,
) -> BeachStatus {
    let observation = resolve(source, beach).await;
    let weather = normalize_weather(&observation.weather);
    let safety = predictor.predict_safety(
        beach.name,
        weather,
        crowd.as_str(),
        &observation.tide,
        FALLBACK_CATEGORY,
    );

    BeachStatus {
        beach: beach.name.to_string(),
        lat: beach.lat,
        lon: beach.lon,
        weather: weather.to_string(),
        tide: observation.tide,
        safety,
    }
}

/// Predict safety for every known beach concurrently, assuming no hazard.
///
/// Results follow [`BEACH_LOCATIONS`] order.
pub async fn survey_beaches(
    predictor: &SafetyPredictor,
    source: &dyn ConditionSource,
    default_crowd: CrowdLevel,
) -> Vec<BeachStatus> {
    let statuses = join_all(
        BEACH_LOCATIONS
            .iter()
            .map(|beach| survey_one(predictor, source, beach, default_crowd)),
    )
    .await;

    let red = statuses
        .iter()
        .filter(|s| s.safety == SafetyLabel::Red)
        .count();
    info!(
        source = source.name(),
        beaches = statuses.len(),
        red,
        "Surveyed beaches"
    );

    statuses
}
