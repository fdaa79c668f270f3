//! BeachSafe Telemetry
//!
//! Prediction history and metrics for BeachSafe.
//!
//! Provides:
//! - An append-only CSV log of predictions
//! - Daily Green/Yellow/Red counts over a trailing window
//! - Metric names and descriptions

pub mod history;
pub mod metrics;
pub mod trends;

pub use history::{HistoryConfig, PredictionLog, PredictionRecord, TIMESTAMP_FORMAT};
pub use trends::{summarize_trends, DailyTrend};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::history::{HistoryConfig, PredictionLog, PredictionRecord};
    pub use crate::trends::{summarize_trends, DailyTrend};
}
