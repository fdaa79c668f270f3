//! Core types for BeachSafe

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder category substituted for any unrecognised input value
pub const FALLBACK_CATEGORY: &str = "None";

/// Beach safety status produced by inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SafetyLabel {
    /// Safe conditions
    Green,
    /// Swim with caution
    Yellow,
    /// Dangerous conditions
    Red,
}

impl SafetyLabel {
    /// All labels in severity order
    pub const ALL: [SafetyLabel; 3] = [SafetyLabel::Green, SafetyLabel::Yellow, SafetyLabel::Red];

    /// Label returned when inference cannot complete
    pub const CONSERVATIVE: SafetyLabel = SafetyLabel::Yellow;

    /// Category string as stored in the Safety encoder
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Red => "Red",
        }
    }

    /// Human-readable swimming advisory
    pub fn advisory(&self) -> &'static str {
        match self {
            Self::Red => "Danger: Unsafe conditions! Avoid swimming.",
            Self::Yellow => "Caution: Swim with care, check conditions.",
            Self::Green => "Safe: Good conditions for swimming",
        }
    }

    /// Map marker colour
    pub fn marker_color(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "orange",
            Self::Green => "green",
        }
    }

    /// Map marker icon name
    pub fn marker_icon(&self) -> &'static str {
        match self {
            Self::Red => "exclamation-triangle",
            Self::Yellow => "exclamation-circle",
            Self::Green => "check-circle",
        }
    }
}

impl fmt::Display for SafetyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SafetyLabel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Green" => Ok(Self::Green),
            "Yellow" => Ok(Self::Yellow),
            "Red" => Ok(Self::Red),
            other => Err(format!("unknown safety label: {other}")),
        }
    }
}

/// Crowd level category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrowdLevel {
    Low,
    Medium,
    High,
}

impl CrowdLevel {
    /// Category string as stored in the Crowd_Level encoder
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrowdLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            other => Err(format!("unknown crowd level: {other}")),
        }
    }
}

/// Tide level category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TideLevel {
    Low,
    High,
}

impl TideLevel {
    /// Category string as stored in the Tide encoder
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::High => "High",
        }
    }
}

impl fmt::Display for TideLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A categorical column of the model.
///
/// The first five are features, `Safety` is the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    Beach,
    Weather,
    #[serde(rename = "Crowd_Level")]
    CrowdLevel,
    Tide,
    Hazard,
    Safety,
}

impl Column {
    /// Feature columns in the order the classifier was trained on
    pub const FEATURES: [Column; 5] = [
        Column::Beach,
        Column::Weather,
        Column::CrowdLevel,
        Column::Tide,
        Column::Hazard,
    ];

    /// Every column an artifact must carry an encoder for
    pub const ALL: [Column; 6] = [
        Column::Beach,
        Column::Weather,
        Column::CrowdLevel,
        Column::Tide,
        Column::Hazard,
        Column::Safety,
    ];

    /// Column header as it appears in datasets and artifacts
    pub fn name(&self) -> &'static str {
        match self {
            Self::Beach => "Beach",
            Self::Weather => "Weather",
            Self::CrowdLevel => "Crowd_Level",
            Self::Tide => "Tide",
            Self::Hazard => "Hazard",
            Self::Safety => "Safety",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown column: {s}"))
    }
}

/// Encoded model input: one category code per feature column, in
/// `Column::FEATURES` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureVector([u32; 5]);

impl FeatureVector {
    /// Number of feature slots
    pub const WIDTH: usize = 5;

    /// Build a vector from codes already in feature order
    pub fn from_codes(codes: [u32; 5]) -> Self {
        Self(codes)
    }

    /// Code for a feature column, `None` for the label column
    pub fn get(&self, column: Column) -> Option<u32> {
        Column::FEATURES
            .iter()
            .position(|c| *c == column)
            .map(|idx| self.0[idx])
    }

    /// Codes in feature order
    pub fn codes(&self) -> &[u32; 5] {
        &self.0
    }

    /// Codes as floats, the representation tree thresholds compare against
    pub fn as_f32(&self) -> [f32; 5] {
        self.0.map(|c| c as f32)
    }
}
