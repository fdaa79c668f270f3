//! Known beaches and the conditions feeding the map survey

use async_trait::async_trait;
use beachsafe_core::{Result, TideLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Provider weather category used when a source cannot answer
pub const UNKNOWN_WEATHER: &str = "Unknown";

/// Live weather categories and the model category each maps to
pub const WEATHER_ALIASES: &[(&str, &str)] = &[
    ("Clear", "Sunny"),
    ("Clouds", "Cloudy"),
    ("Rain", "Rainy"),
    ("Drizzle", "Rainy"),
    ("Thunderstorm", "Stormy"),
    ("Mist", "Cloudy"),
    ("Haze", "Cloudy"),
    ("Fog", "Cloudy"),
    ("Unknown", "Sunny"),
];

/// Map a provider weather category to the model's vocabulary; unmapped
/// values become "Sunny"
pub fn normalize_weather(raw: &str) -> &'static str {
    let raw = raw.trim();
    WEATHER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw)
        .map(|(_, model)| *model)
        .unwrap_or("Sunny")
}

/// A known beach with its coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeachLocation {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

const fn beach(name: &'static str, lat: f64, lon: f64) -> BeachLocation {
    BeachLocation { name, lat, lon }
}

/// Beaches shown on the map
pub const BEACH_LOCATIONS: &[BeachLocation] = &[
    beach("Baga", 15.559, 73.753),
    beach("Calangute", 15.543, 73.755),
    beach("Anjuna", 15.575, 73.741),
    beach("Palolem", 15.009, 74.023),
    beach("Agonda", 15.043, 73.985),
    beach("Candolim", 15.518, 73.762),
    beach("Vagator", 15.591, 73.738),
    beach("Morjim", 15.628, 73.717),
    beach("Arambol", 15.686, 73.703),
    beach("Colva", 15.278, 73.919),
    beach("Betalbatim", 15.287, 73.922),
    beach("Majorda", 15.305, 73.926),
    beach("Bogmalo", 15.384, 73.832),
    beach("Miramar", 15.482, 73.805),
    beach("Sinquerim", 15.508, 73.768),
    beach("Ashwem", 15.642, 73.715),
    beach("Mandrem", 15.664, 73.709),
    beach("Chapora", 15.600, 73.736),
];

/// Look up a known beach by name
pub fn find_beach(name: &str) -> Option<&'static BeachLocation> {
    BEACH_LOCATIONS.iter().find(|b| b.name == name)
}

/// Raw weather and tide for one beach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Provider weather category, before normalization
    pub weather: String,
    pub tide: String,
}

impl Observation {
    pub fn new(weather: impl Into<String>, tide: impl Into<String>) -> Self {
        Self {
            weather: weather.into(),
            tide: tide.into(),
        }
    }

    /// Used when a source fails
    pub fn unavailable() -> Self {
        Self::new(UNKNOWN_WEATHER, TideLevel::Low.as_str())
    }
}

/// Supplier of current conditions for a beach
#[async_trait]
pub trait ConditionSource: Send + Sync {
    /// Current weather and tide at the beach
    async fn observe(&self, beach: &BeachLocation) -> Result<Observation>;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Observe a beach, degrading to [`Observation::unavailable`] on error
pub async fn resolve(source: &dyn ConditionSource, beach: &BeachLocation) -> Observation {
    match source.observe(beach).await {
        Ok(observation) => observation,
        Err(e) => {
            warn!(
                source = source.name(),
                beach = beach.name,
                error = %e,
                "Condition source failed, using defaults"
            );
            Observation::unavailable()
        }
    }
}

/// Conditions from configuration, with optional per-beach overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticConditions {
    /// Weather reported for beaches without an override
    #[serde(default = "default_weather")]
    pub weather: String,

    /// Tide reported for beaches without an override
    #[serde(default = "default_tide")]
    pub tide: String,

    /// Per-beach observations
    #[serde(default)]
    pub overrides: HashMap<String, Observation>,
}

impl Default for StaticConditions {
    fn default() -> Self {
        Self {
            weather: default_weather(),
            tide: default_tide(),
            overrides: HashMap::new(),
        }
    }
}

impl StaticConditions {
    pub fn new(weather: impl Into<String>, tide: impl Into<String>) -> Self {
        Self {
            weather: weather.into(),
            tide: tide.into(),
            overrides: HashMap::new(),
        }
    }

    /// Report `observation` for one beach
    pub fn with_override(mut self, beach: impl Into<String>, observation: Observation) -> Self {
        self.overrides.insert(beach.into(), observation);
        self
    }
}

#[async_trait]
impl ConditionSource for StaticConditions {
    async fn observe(&self, beach: &BeachLocation) -> Result<Observation> {
        Ok(self
            .overrides
            .get(beach.name)
            .cloned()
            .unwrap_or_else(|| Observation::new(&self.weather, &self.tide)))
    }

    fn name(&self) -> &str {
        "static"
    }
}

fn default_weather() -> String {
    "Clear".to_string()
}

fn default_tide() -> String {
    TideLevel::Low.as_str().to_string()
}
