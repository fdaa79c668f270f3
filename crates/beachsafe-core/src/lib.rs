//! BeachSafe Core
//!
//! Core types and utilities shared across BeachSafe components.
//!
//! This crate provides:
//! - The safety label, crowd level, and tide level enumerations
//! - The model's column set and the ordered five-slot feature vector
//! - Error types and result handling
//! - Metric names

pub mod error;
pub mod metrics;
pub mod types;

pub use error::{Error, Result};
pub use types::{Column, CrowdLevel, FeatureVector, SafetyLabel, TideLevel, FALLBACK_CATEGORY};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Column, CrowdLevel, FeatureVector, SafetyLabel, TideLevel};
}
